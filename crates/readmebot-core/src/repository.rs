use async_trait::async_trait;

use crate::error::ReadmeBotError;
use crate::types::{
    BranchHead, CommitMessage, FileChange, FileUpdate, NewPullRequest, PullRequestHandle,
    PullRequestInfo, ReadmeSnapshot,
};

/// Everything readmebot needs from a source-control host.
///
/// The GitHub implementation lives in `readmebot-pipeline`; tests substitute an
/// in-memory double. Reads fail with [`ReadmeBotError::RepositoryRead`], writes
/// with [`ReadmeBotError::RepositoryWrite`] unless a more specific variant is
/// documented on the method.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Read a text file at the head of `branch`.
    async fn get_file_content(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<ReadmeSnapshot, ReadmeBotError>;

    /// Look up a pull request by number.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestInfo, ReadmeBotError>;

    /// Files changed by a pull request, in host order.
    async fn list_changed_files(&self, number: u64) -> Result<Vec<FileChange>, ReadmeBotError>;

    /// Commit messages of a pull request, oldest first.
    async fn list_commits(&self, number: u64) -> Result<Vec<CommitMessage>, ReadmeBotError>;

    /// Current head of a branch.
    async fn get_branch(&self, name: &str) -> Result<BranchHead, ReadmeBotError>;

    /// Create branch `name` pointing at `from_commit`.
    ///
    /// Fails with [`ReadmeBotError::BranchExists`] if the name is taken.
    async fn create_branch_ref(
        &self,
        name: &str,
        from_commit: &str,
    ) -> Result<BranchHead, ReadmeBotError>;

    /// Commit new file content, returning the file's new revision token.
    ///
    /// Fails with [`ReadmeBotError::StaleReadme`] if `update.revision` no
    /// longer matches the file on `update.branch`.
    async fn update_file(&self, update: &FileUpdate) -> Result<String, ReadmeBotError>;

    /// Open a pull request.
    async fn create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<PullRequestHandle, ReadmeBotError>;
}
