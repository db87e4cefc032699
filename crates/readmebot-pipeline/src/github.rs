use async_trait::async_trait;
use readmebot_core::{
    BranchHead, CommitMessage, FileChange, FileUpdate, NewPullRequest, PullRequestHandle,
    PullRequestInfo, ReadmeBotError, ReadmeSnapshot, RepositoryClient, RepositoryId,
};
use octocrab::models::repos::Object;
use octocrab::params::repos::Reference;
use tracing::debug;

const COMMITS_PER_PAGE: u8 = 100;

/// GitHub implementation of [`RepositoryClient`] for one repository.
///
/// # Examples
///
/// ```no_run
/// use readmebot_core::RepositoryId;
/// use readmebot_pipeline::github::GitHubClient;
///
/// # #[tokio::main] async fn main() {
/// let repo: RepositoryId = "octocat/hello-world".parse().unwrap();
/// let client = GitHubClient::new("ghp_xxxx", &repo, None).unwrap();
/// # }
/// ```
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client authenticated with a personal or workflow token.
    ///
    /// `api_url` overrides `https://api.github.com` (GitHub Enterprise).
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeBotError::Input`] if `api_url` is not a valid URI, or
    /// [`ReadmeBotError::RepositoryRead`] if the client cannot be built.
    pub fn new(
        token: &str,
        repository: &RepositoryId,
        api_url: Option<&str>,
    ) -> Result<Self, ReadmeBotError> {
        let mut builder = octocrab::Octocrab::builder().personal_token(token.to_string());
        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| ReadmeBotError::Input(vec![format!("GITHUB_API_URL: {e}")]))?;
        }
        let octocrab = builder.build().map_err(|e| {
            ReadmeBotError::RepositoryRead(format!("failed to create GitHub client: {e}"))
        })?;

        Ok(Self {
            octocrab,
            owner: repository.owner.clone(),
            repo: repository.name.clone(),
        })
    }
}

fn status_code(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

fn describe(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => source.message.clone(),
        other => other.to_string(),
    }
}

/// GitHub answers 422 both for an existing ref and for a bad sha or ref name.
fn is_existing_ref(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            source.status_code.as_u16() == 422 && source.message == "Reference already exists"
        }
        _ => false,
    }
}

fn read_error(what: &str, err: &octocrab::Error) -> ReadmeBotError {
    match status_code(err) {
        Some(404) => ReadmeBotError::RepositoryRead(format!("{what} not found")),
        Some(status) => {
            ReadmeBotError::RepositoryRead(format!(
                "{what}: GitHub API error {status}: {}",
                describe(err)
            ))
        }
        None => ReadmeBotError::RepositoryRead(format!("{what}: {}", describe(err))),
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn get_file_content(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<ReadmeSnapshot, ReadmeBotError> {
        let mut items = self
            .octocrab
            .repos(&self.owner, &self.repo)
            .get_content()
            .path(path)
            .r#ref(branch)
            .send()
            .await
            .map_err(|e| read_error(&format!("{path}@{branch}"), &e))?;

        let mut items = items.take_items();
        if items.len() != 1 {
            return Err(ReadmeBotError::RepositoryRead(format!(
                "{path} is a directory, not a file"
            )));
        }
        let item = items.remove(0);
        if item.r#type != "file" {
            return Err(ReadmeBotError::RepositoryRead(format!(
                "{path} is a {}, not a file",
                item.r#type
            )));
        }
        let content = item.decoded_content().ok_or_else(|| {
            ReadmeBotError::RepositoryRead(format!("{path} is not UTF-8 text"))
        })?;

        debug!(path, revision = %item.sha, bytes = content.len(), "read file");
        Ok(ReadmeSnapshot {
            path: path.to_string(),
            content,
            revision: item.sha,
        })
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestInfo, ReadmeBotError> {
        let pr = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .get(number)
            .await
            .map_err(|e| read_error(&format!("pull request #{number}"), &e))?;

        Ok(PullRequestInfo {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            head_sha: pr.head.sha,
        })
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<FileChange>, ReadmeBotError> {
        let first_page = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .list_files(number)
            .await
            .map_err(|e| read_error(&format!("files of pull request #{number}"), &e))?;
        let entries = self
            .octocrab
            .all_pages(first_page)
            .await
            .map_err(|e| read_error(&format!("files of pull request #{number}"), &e))?;

        Ok(entries
            .into_iter()
            .map(|entry| FileChange {
                filename: entry.filename,
                patch: entry.patch.unwrap_or_default(),
            })
            .collect())
    }

    async fn list_commits(&self, number: u64) -> Result<Vec<CommitMessage>, ReadmeBotError> {
        let first_page = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .pr_commits(number)
            .per_page(COMMITS_PER_PAGE)
            .send()
            .await
            .map_err(|e| read_error(&format!("commits of pull request #{number}"), &e))?;
        let commits = self
            .octocrab
            .all_pages(first_page)
            .await
            .map_err(|e| read_error(&format!("commits of pull request #{number}"), &e))?;

        Ok(commits
            .into_iter()
            .map(|c| CommitMessage(c.commit.message))
            .collect())
    }

    async fn get_branch(&self, name: &str) -> Result<BranchHead, ReadmeBotError> {
        let head = self
            .octocrab
            .repos(&self.owner, &self.repo)
            .get_ref(&Reference::Branch(name.to_string()))
            .await
            .map_err(|e| read_error(&format!("branch '{name}'"), &e))?;

        match head.object {
            Object::Commit { sha, .. } => Ok(BranchHead {
                name: name.to_string(),
                commit_sha: sha,
            }),
            _ => Err(ReadmeBotError::RepositoryRead(format!(
                "branch '{name}' does not point at a commit"
            ))),
        }
    }

    async fn create_branch_ref(
        &self,
        name: &str,
        from_commit: &str,
    ) -> Result<BranchHead, ReadmeBotError> {
        let result = self
            .octocrab
            .repos(&self.owner, &self.repo)
            .create_ref(&Reference::Branch(name.to_string()), from_commit)
            .await;

        match result {
            Ok(_) => Ok(BranchHead {
                name: name.to_string(),
                commit_sha: from_commit.to_string(),
            }),
            Err(e) if is_existing_ref(&e) => Err(ReadmeBotError::BranchExists(name.to_string())),
            Err(e) => Err(ReadmeBotError::RepositoryWrite(format!(
                "failed to create branch '{name}': {}",
                describe(&e)
            ))),
        }
    }

    async fn update_file(&self, update: &FileUpdate) -> Result<String, ReadmeBotError> {
        let result = self
            .octocrab
            .repos(&self.owner, &self.repo)
            .update_file(
                &update.path,
                &update.message,
                &update.content,
                &update.revision,
            )
            .branch(&update.branch)
            .send()
            .await;

        match result {
            Ok(file_update) => Ok(file_update.content.sha),
            Err(e) if status_code(&e) == Some(409) => Err(ReadmeBotError::StaleReadme {
                path: update.path.clone(),
                revision: update.revision.clone(),
            }),
            Err(e) => Err(ReadmeBotError::RepositoryWrite(format!(
                "failed to update {} on '{}': {}",
                update.path,
                update.branch,
                describe(&e)
            ))),
        }
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<PullRequestHandle, ReadmeBotError> {
        let pr = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .create(&request.title, &request.head, &request.base)
            .body(&request.body)
            .send()
            .await
            .map_err(|e| {
                ReadmeBotError::RepositoryWrite(format!(
                    "failed to open pull request: {}",
                    describe(&e)
                ))
            })?;

        Ok(PullRequestHandle {
            number: pr.number,
            url: pr.html_url.map(|url| url.to_string()),
        })
    }
}
