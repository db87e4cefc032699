//! Core types, configuration, and error handling for readmebot.
//!
//! This crate provides the shared foundation used by the pipeline and the binary:
//! - [`ReadmeBotError`]: the error taxonomy, using `thiserror` and `miette`
//! - [`RunConfig`]: validated configuration built from [`ConfigInputs`]
//! - [`RepositoryClient`]: the source-control host capability
//! - Data model: [`FileChange`], [`ReadmeSnapshot`], [`CommitMessage`],
//!   [`SuggestionResult`], [`PublishRequest`], [`PullRequestHandle`]

mod config;
mod error;
mod repository;
mod types;

pub use config::{ConfigInputs, LlmConfig, RunConfig, RunMode};
pub use error::ReadmeBotError;
pub use repository::RepositoryClient;
pub use types::{
    branch_name_for_run, BranchHead, CommitMessage, FileChange, FileUpdate, NewPullRequest,
    PublishRequest, PullRequestHandle, PullRequestInfo, ReadmeSnapshot, RepositoryId,
    SuggestionResult, BRANCH_PREFIX, SHORT_RUN_ID_LEN,
};

/// A convenience `Result` type for readmebot operations.
pub type Result<T> = std::result::Result<T, ReadmeBotError>;
