use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use readmebot_core::{ConfigInputs, RunConfig};
use readmebot_pipeline::github::GitHubClient;
use readmebot_pipeline::llm::LlmClient;
use readmebot_pipeline::orchestrator::{Orchestrator, RunOutcome};

#[derive(Parser)]
#[command(
    name = "readmebot",
    version,
    about = "Propose a README update for a pull request",
    long_about = "Reads a pull request's changed files and commit messages together with the\n\
                  current README, asks a language model for an updated README, and opens a\n\
                  new pull request with the suggestion.\n\n\
                  Every option can be supplied through its environment variable, which is how\n\
                  CI workflows usually configure it.\n\n\
                  Examples:\n  \
                    readmebot --repo octocat/hello-world --pr 42 --run-id $GITHUB_SHA\n  \
                    readmebot --repo octocat/hello-world --pr 42 --dry-run"
)]
struct Cli {
    /// GitHub token with contents and pull-request write access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Repository as owner/repo
    #[arg(long = "repo", env = "REPO_PATH")]
    repository: Option<String>,

    /// Pull request number to document
    #[arg(long = "pr", env = "PR_NUMBER")]
    pr_number: Option<String>,

    /// API key for the language model provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Unique run identifier (usually the triggering commit SHA); names the branch
    #[arg(long = "run-id", env = "COMMIT_SHA")]
    run_id: Option<String>,

    /// Model identifier (default: gpt-4o-mini)
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API (default: https://api.openai.com)
    #[arg(long, env = "OPENAI_BASE_URL")]
    llm_base_url: Option<String>,

    /// GitHub API root for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL")]
    github_api_url: Option<String>,

    /// Branch to read the README from and to target (default: main)
    #[arg(long)]
    base_branch: Option<String>,

    /// README path inside the repository (default: README.md)
    #[arg(long)]
    readme_path: Option<String>,

    /// Print the suggestion as JSON instead of opening a pull request
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging (prompts and model responses)
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn into_inputs(self) -> ConfigInputs {
        ConfigInputs {
            github_token: self.github_token,
            repository: self.repository,
            pr_number: self.pr_number,
            openai_api_key: self.openai_api_key,
            run_id: self.run_id,
            model: self.model,
            llm_base_url: self.llm_base_url,
            github_api_url: self.github_api_url,
            base_branch: self.base_branch,
            readme_path: self.readme_path,
            dry_run: self.dry_run,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,readmebot=debug,readmebot_pipeline=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = RunConfig::from_inputs(cli.into_inputs())?;

    let github = GitHubClient::new(
        &config.github_token,
        &config.repository,
        config.github_api_url.as_deref(),
    )?;
    let llm = LlmClient::new(&config.llm)?;
    info!(model = llm.model(), "using language model");

    let outcome = Orchestrator::new(config, github, llm).run().await?;

    match outcome {
        RunOutcome::Published(pr) => match pr.url {
            Some(url) => println!("{url}"),
            None => println!("#{}", pr.number),
        },
        RunOutcome::Unchanged => {
            info!("README is already up to date; no pull request opened");
        }
        RunOutcome::DryRun(suggestion) => {
            let json = serde_json::to_string_pretty(&suggestion).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}
