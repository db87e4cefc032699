use std::fmt;

use crate::error::ReadmeBotError;
use crate::types::RepositoryId;

/// Raw configuration values as they arrive from flags and the environment.
///
/// Nothing here is validated; [`RunConfig::from_inputs`] does that in one pass.
///
/// # Examples
///
/// ```
/// use readmebot_core::{ConfigInputs, RunConfig};
///
/// let inputs = ConfigInputs {
///     github_token: Some("ghp_xxxx".into()),
///     repository: Some("octocat/hello-world".into()),
///     pr_number: Some("42".into()),
///     openai_api_key: Some("sk-xxxx".into()),
///     run_id: Some("0123456789abcdef".into()),
///     ..ConfigInputs::default()
/// };
/// let config = RunConfig::from_inputs(inputs).unwrap();
/// assert_eq!(config.pr_number, 42);
/// assert_eq!(config.base_branch, "main");
/// ```
#[derive(Default, Clone)]
pub struct ConfigInputs {
    /// `GITHUB_TOKEN`
    pub github_token: Option<String>,
    /// `REPO_PATH`, as `owner/repo`.
    pub repository: Option<String>,
    /// `PR_NUMBER`
    pub pr_number: Option<String>,
    /// `OPENAI_API_KEY`
    pub openai_api_key: Option<String>,
    /// `COMMIT_SHA`, the run identifier used for the branch name.
    pub run_id: Option<String>,
    /// `OPENAI_MODEL`
    pub model: Option<String>,
    /// `OPENAI_BASE_URL`
    pub llm_base_url: Option<String>,
    /// `GITHUB_API_URL`
    pub github_api_url: Option<String>,
    /// Branch the README is read from and the PR targets.
    pub base_branch: Option<String>,
    /// README path inside the repository.
    pub readme_path: Option<String>,
    /// Generate and print the suggestion without writing anything.
    pub dry_run: bool,
}

impl fmt::Debug for ConfigInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigInputs")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("repository", &self.repository)
            .field("pr_number", &self.pr_number)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("run_id", &self.run_id)
            .field("model", &self.model)
            .field("llm_base_url", &self.llm_base_url)
            .field("github_api_url", &self.github_api_url)
            .field("base_branch", &self.base_branch)
            .field("readme_path", &self.readme_path)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Language model settings.
///
/// # Examples
///
/// ```
/// use readmebot_core::LlmConfig;
///
/// let config = LlmConfig::new("sk-test");
/// assert_eq!(config.model, "gpt-4o-mini");
/// assert_eq!(config.base_url, "https://api.openai.com");
/// ```
#[derive(Clone)]
pub struct LlmConfig {
    /// Model identifier.
    pub model: String,
    /// Bearer credential for the provider.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API, without `/v1`.
    pub base_url: String,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_base_url() -> String {
    "https://api.openai.com".into()
}

impl LlmConfig {
    /// Default model and endpoint with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            model: default_model(),
            api_key: api_key.into(),
            base_url: default_base_url(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Whether a run publishes its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Create a branch, commit and pull request.
    Publish {
        /// Unique identifier of the triggering event (a commit SHA in CI).
        run_id: String,
    },
    /// Stop after generating the suggestion.
    DryRun,
}

/// Validated configuration for a single run.
#[derive(Clone)]
pub struct RunConfig {
    /// Target repository.
    pub repository: RepositoryId,
    /// Pull request the suggestion is based on.
    pub pr_number: u64,
    /// GitHub credential.
    pub github_token: String,
    /// Custom GitHub API root (GitHub Enterprise, test servers).
    pub github_api_url: Option<String>,
    /// Model settings.
    pub llm: LlmConfig,
    /// Branch the README is read from and the new PR targets.
    pub base_branch: String,
    /// README path inside the repository.
    pub readme_path: String,
    /// Publish or dry run.
    pub mode: RunMode,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("repository", &self.repository)
            .field("pr_number", &self.pr_number)
            .field("github_token", &"<redacted>")
            .field("github_api_url", &self.github_api_url)
            .field("llm", &self.llm)
            .field("base_branch", &self.base_branch)
            .field("readme_path", &self.readme_path)
            .field("mode", &self.mode)
            .finish()
    }
}

impl RunConfig {
    /// Validate raw inputs, reporting every problem at once.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeBotError::Input`] listing each missing or malformed
    /// field when at least one is found.
    pub fn from_inputs(inputs: ConfigInputs) -> Result<Self, ReadmeBotError> {
        let mut problems = Vec::new();

        let github_token = required(inputs.github_token, "GITHUB_TOKEN", &mut problems);
        let openai_api_key = required(inputs.openai_api_key, "OPENAI_API_KEY", &mut problems);

        let repository = required(inputs.repository, "REPO_PATH", &mut problems).and_then(|raw| {
            raw.parse::<RepositoryId>()
                .map_err(|e| problems.push(format!("REPO_PATH: {e}")))
                .ok()
        });

        let pr_number = required(inputs.pr_number, "PR_NUMBER", &mut problems).and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    problems.push(format!("PR_NUMBER: '{raw}' is not a positive integer"));
                    None
                }
            }
        });

        let mode = if inputs.dry_run {
            Some(RunMode::DryRun)
        } else {
            required(inputs.run_id, "COMMIT_SHA", &mut problems).and_then(|raw| {
                let run_id = raw.trim().to_string();
                if is_valid_run_id(&run_id) {
                    Some(RunMode::Publish { run_id })
                } else {
                    problems.push(format!(
                        "COMMIT_SHA: '{raw}' may only contain letters, digits, '.', '_' and '-'"
                    ));
                    None
                }
            })
        };

        let base_branch = optional(inputs.base_branch).unwrap_or_else(|| "main".into());
        let readme_path = optional(inputs.readme_path).unwrap_or_else(|| "README.md".into());

        match (github_token, openai_api_key, repository, pr_number, mode) {
            (Some(github_token), Some(api_key), Some(repository), Some(pr_number), Some(mode))
                if problems.is_empty() =>
            {
                Ok(Self {
                    repository,
                    pr_number,
                    github_token,
                    github_api_url: optional(inputs.github_api_url),
                    llm: LlmConfig {
                        model: optional(inputs.model).unwrap_or_else(default_model),
                        api_key,
                        base_url: optional(inputs.llm_base_url)
                            .map(|url| url.trim_end_matches('/').to_string())
                            .unwrap_or_else(default_base_url),
                    },
                    base_branch,
                    readme_path,
                    mode,
                })
            }
            _ => Err(ReadmeBotError::Input(problems)),
        }
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str, problems: &mut Vec<String>) -> Option<String> {
    let value = optional(value);
    if value.is_none() {
        problems.push(format!("{name} is not set"));
    }
    value
}

fn is_valid_run_id(run_id: &str) -> bool {
    !run_id.is_empty()
        && !run_id.contains("..")
        && !run_id.starts_with('.')
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
