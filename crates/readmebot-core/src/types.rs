use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix shared by every branch readmebot creates.
pub const BRANCH_PREFIX: &str = "update-readme-";

/// Number of run-id characters kept in the branch name.
pub const SHORT_RUN_ID_LEN: usize = 7;

/// A repository on the source-control host, written `owner/name`.
///
/// # Examples
///
/// ```
/// use readmebot_core::RepositoryId;
///
/// let repo: RepositoryId = "octocat/hello-world".parse().unwrap();
/// assert_eq!(repo.owner, "octocat");
/// assert_eq!(repo.name, "hello-world");
/// assert_eq!(repo.to_string(), "octocat/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryId {
    /// Owning user or organisation.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for RepositoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((owner, name)) = s.trim().split_once('/') else {
            return Err(format!("'{s}' is not in owner/repo form"));
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(format!("'{s}' is not in owner/repo form"));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One file touched by a pull request.
///
/// `patch` is empty when the host omits it (binary or very large files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path of the changed file.
    pub filename: String,
    /// Unified diff text for the file.
    pub patch: String,
}

/// The README as read at the start of a run.
///
/// `revision` is the host's optimistic-concurrency token for the file and must
/// be handed back unchanged when the file is updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeSnapshot {
    /// Path of the file inside the repository.
    pub path: String,
    /// Decoded UTF-8 text.
    pub content: String,
    /// Revision token (the blob SHA on GitHub).
    pub revision: String,
}

/// Message of one commit in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitMessage(pub String);

impl CommitMessage {
    /// Borrow the message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommitMessage {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The model's proposal: the new README plus why it changed.
///
/// Deserialisation is strict. Both fields are required and any extra field
/// is rejected, so a value of this type always has exactly this shape.
///
/// # Examples
///
/// ```
/// use readmebot_core::SuggestionResult;
///
/// let ok: Result<SuggestionResult, _> =
///     serde_json::from_str(r##"{"updated_readme":"# Hi\n","reason":"typo"}"##);
/// assert!(ok.is_ok());
///
/// let missing: Result<SuggestionResult, _> =
///     serde_json::from_str(r##"{"updated_readme":"# Hi\n"}"##);
/// assert!(missing.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionResult {
    /// Full replacement README text.
    pub updated_readme: String,
    /// Short explanation of the change.
    pub reason: String,
}

/// Everything the publisher needs to turn a suggestion into a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// File to update.
    pub path: String,
    /// New file content.
    pub content: String,
    /// Revision token read before the suggestion was generated.
    pub base_revision: String,
    /// Branch the new branch is cut from and the PR targets.
    pub base_branch: String,
    /// Branch to create.
    pub new_branch: String,
    /// Commit message for the file update.
    pub commit_message: String,
    /// Pull request title.
    pub title: String,
    /// Pull request body.
    pub body: String,
}

/// Minimal view of an existing pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    /// PR number.
    pub number: u64,
    /// Title, empty if the host returned none.
    pub title: String,
    /// Head commit SHA.
    pub head_sha: String,
}

/// The current head of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchHead {
    /// Branch name without `refs/heads/`.
    pub name: String,
    /// Commit the branch points at.
    pub commit_sha: String,
}

/// A single-file commit onto an existing branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    /// File path.
    pub path: String,
    /// New content.
    pub content: String,
    /// Commit message.
    pub message: String,
    /// Revision the caller expects the file to be at.
    pub revision: String,
    /// Branch to commit on.
    pub branch: String,
}

/// Parameters for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
    /// Source branch.
    pub head: String,
    /// Target branch.
    pub base: String,
}

/// A pull request created by readmebot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHandle {
    /// PR number.
    pub number: u64,
    /// Web URL, when the host returned one.
    pub url: Option<String>,
}

impl fmt::Display for PullRequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "#{} {url}", self.number),
            None => write!(f, "#{}", self.number),
        }
    }
}

/// Derive the branch name for a run identifier.
///
/// Only the first [`SHORT_RUN_ID_LEN`] characters are used, so two runs
/// collide only when their identifiers share that prefix.
///
/// # Examples
///
/// ```
/// use readmebot_core::branch_name_for_run;
///
/// assert_eq!(
///     branch_name_for_run("0123456789abcdef"),
///     "update-readme-0123456"
/// );
/// assert_eq!(branch_name_for_run("abc"), "update-readme-abc");
/// ```
pub fn branch_name_for_run(run_id: &str) -> String {
    let short: String = run_id.chars().take(SHORT_RUN_ID_LEN).collect();
    format!("{BRANCH_PREFIX}{short}")
}
