use readmebot_core::{
    PullRequestHandle, ReadmeBotError, RepositoryClient, RunConfig, RunMode, SuggestionResult,
};
use tracing::info;

use crate::generator::SuggestionGenerator;
use crate::llm::LanguageModel;
use crate::publisher::{PublishSettings, Publisher};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A pull request with the suggestion was opened.
    Published(PullRequestHandle),
    /// The model proposed the README as it already is; nothing was written.
    Unchanged,
    /// Dry run: the suggestion was generated but not published.
    DryRun(SuggestionResult),
}

/// Drives one read → generate → publish pass for a pull request.
///
/// The repository and model are injected so the same pass runs against
/// GitHub in production and against doubles in tests.
pub struct Orchestrator<R, M> {
    config: RunConfig,
    repo: R,
    generator: SuggestionGenerator<M>,
}

impl<R: RepositoryClient, M: LanguageModel> Orchestrator<R, M> {
    /// Assemble an orchestrator from validated configuration and its collaborators.
    pub fn new(config: RunConfig, repo: R, model: M) -> Self {
        Self {
            config,
            repo,
            generator: SuggestionGenerator::new(model),
        }
    }

    /// Borrow the repository client.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Run the pipeline once.
    ///
    /// Every step is awaited before the next starts and the first error is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Any [`ReadmeBotError`] raised by the repository, the generator or the
    /// publisher.
    pub async fn run(&self) -> Result<RunOutcome, ReadmeBotError> {
        let config = &self.config;
        info!(
            repository = %config.repository,
            pr = config.pr_number,
            "starting README suggestion run"
        );

        let readme = self
            .repo
            .get_file_content(&config.readme_path, &config.base_branch)
            .await?;
        let pr = self.repo.get_pull_request(config.pr_number).await?;
        info!(pr = pr.number, title = %pr.title, head = %pr.head_sha, "loaded pull request");

        let diffs = self.repo.list_changed_files(pr.number).await?;
        let commits = self.repo.list_commits(pr.number).await?;

        let suggestion = self.generator.generate(&diffs, &readme, &commits).await?;
        info!(reason = %suggestion.reason, "README suggestion generated");

        let run_id = match &config.mode {
            RunMode::DryRun => return Ok(RunOutcome::DryRun(suggestion)),
            RunMode::Publish { run_id } => run_id,
        };

        if suggestion.updated_readme == readme.content {
            info!("suggested README is identical to the current one; nothing to publish");
            return Ok(RunOutcome::Unchanged);
        }

        let publisher = Publisher::new(PublishSettings {
            base_branch: config.base_branch.clone(),
            readme_path: config.readme_path.clone(),
            run_id: run_id.clone(),
        });
        let handle = publisher
            .publish(&self.repo, &suggestion.updated_readme, &readme.revision)
            .await?;

        Ok(RunOutcome::Published(handle))
    }
}
