use readmebot_core::{
    branch_name_for_run, FileUpdate, NewPullRequest, PublishRequest, PullRequestHandle,
    ReadmeBotError, RepositoryClient,
};
use tracing::{info, warn};

/// Commit message used for the README update.
pub const COMMIT_MESSAGE: &str = "AI Commit: Proposed README update based on recent code changes";

/// Title of the pull request opened for the suggestion.
pub const PR_TITLE: &str = "AI PR: Proposed README update based on recent code changes";

/// Body of the pull request opened for the suggestion.
pub const PR_BODY: &str =
    "This PR proposes an update to the README file based on recent code changes.";

/// Where and under which name a suggestion is published.
///
/// # Examples
///
/// ```
/// use readmebot_pipeline::publisher::PublishSettings;
///
/// let settings = PublishSettings::new("4f2a9c1e7b3d");
/// assert_eq!(settings.base_branch, "main");
/// assert_eq!(settings.branch_name(), "update-readme-4f2a9c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    /// Branch to cut from and target.
    pub base_branch: String,
    /// README path.
    pub readme_path: String,
    /// Unique identifier of this run.
    pub run_id: String,
}

impl PublishSettings {
    /// Settings for `main` / `README.md`.
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            base_branch: "main".into(),
            readme_path: "README.md".into(),
            run_id: run_id.into(),
        }
    }

    /// Name of the branch this run creates.
    pub fn branch_name(&self) -> String {
        branch_name_for_run(&self.run_id)
    }
}

/// Creates the branch, commit and pull request for a suggestion.
///
/// The four steps run strictly in order and the first failure stops the
/// sequence. A branch created before a later failure is left in place and
/// reported with a warning.
pub struct Publisher {
    settings: PublishSettings,
}

impl Publisher {
    /// Create a publisher.
    pub fn new(settings: PublishSettings) -> Self {
        Self { settings }
    }

    /// The settings this publisher was built with.
    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    /// Build the full request for new README content.
    pub fn request_for(&self, updated_content: &str, base_readme_revision: &str) -> PublishRequest {
        PublishRequest {
            path: self.settings.readme_path.clone(),
            content: updated_content.to_string(),
            base_revision: base_readme_revision.to_string(),
            base_branch: self.settings.base_branch.clone(),
            new_branch: self.settings.branch_name(),
            commit_message: COMMIT_MESSAGE.to_string(),
            title: PR_TITLE.to_string(),
            body: PR_BODY.to_string(),
        }
    }

    /// Publish `updated_content` as a pull request against the base branch.
    ///
    /// `base_readme_revision` must be the revision token read together with
    /// the README the suggestion was based on.
    ///
    /// # Errors
    ///
    /// [`ReadmeBotError::BranchExists`] if this run's branch is taken,
    /// [`ReadmeBotError::StaleReadme`] if the README moved since it was read,
    /// and read/write errors from the repository client.
    pub async fn publish(
        &self,
        repo: &dyn RepositoryClient,
        updated_content: &str,
        base_readme_revision: &str,
    ) -> Result<PullRequestHandle, ReadmeBotError> {
        let request = self.request_for(updated_content, base_readme_revision);
        publish_request(repo, &request).await
    }
}

/// Execute a prepared [`PublishRequest`].
///
/// # Errors
///
/// See [`Publisher::publish`].
pub async fn publish_request(
    repo: &dyn RepositoryClient,
    request: &PublishRequest,
) -> Result<PullRequestHandle, ReadmeBotError> {
    let base = repo.get_branch(&request.base_branch).await?;
    info!(branch = %base.name, commit = %base.commit_sha, "resolved base branch");

    let branch = repo
        .create_branch_ref(&request.new_branch, &base.commit_sha)
        .await?;
    info!(branch = %branch.name, "created branch");

    let result = commit_and_open(repo, request).await;
    if let Err(err) = &result {
        warn!(
            branch = %branch.name,
            error = %err,
            "publish failed after the branch was created; delete the branch manually before re-running"
        );
    }
    result
}

async fn commit_and_open(
    repo: &dyn RepositoryClient,
    request: &PublishRequest,
) -> Result<PullRequestHandle, ReadmeBotError> {
    let revision = repo
        .update_file(&FileUpdate {
            path: request.path.clone(),
            content: request.content.clone(),
            message: request.commit_message.clone(),
            revision: request.base_revision.clone(),
            branch: request.new_branch.clone(),
        })
        .await?;
    info!(path = %request.path, %revision, "committed README update");

    let pr = repo
        .create_pull_request(&NewPullRequest {
            title: request.title.clone(),
            body: request.body.clone(),
            head: request.new_branch.clone(),
            base: request.base_branch.clone(),
        })
        .await?;
    info!(number = pr.number, "opened pull request");

    Ok(pr)
}
