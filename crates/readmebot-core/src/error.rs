/// Errors that can abort a readmebot run.
///
/// Every variant is terminal: nothing in the pipeline recovers locally, the
/// first error is propagated to the binary and turned into a non-zero exit.
///
/// # Examples
///
/// ```
/// use readmebot_core::ReadmeBotError;
///
/// let err = ReadmeBotError::BranchExists("update-readme-abc1234".into());
/// assert!(err.to_string().contains("update-readme-abc1234"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReadmeBotError {
    /// Required identifiers or credentials are missing or malformed.
    ///
    /// Holds every problem found, not only the first one.
    #[error("invalid configuration: {}", .0.join("; "))]
    #[diagnostic(
        code(readmebot::input),
        help("set the listed environment variables or pass the matching flags")
    )]
    Input(Vec<String>),

    /// The language model provider failed or could not be reached.
    #[error("model provider error: {0}")]
    #[diagnostic(code(readmebot::upstream))]
    Upstream(String),

    /// The model answered, but not with exactly `{updated_readme, reason}`.
    #[error("model response does not match the suggestion schema: {0}")]
    #[diagnostic(code(readmebot::schema_mismatch))]
    SchemaMismatch(String),

    /// A read from the repository host failed (missing README, unknown PR, ...).
    #[error("repository read failed: {0}")]
    #[diagnostic(code(readmebot::repository_read))]
    RepositoryRead(String),

    /// The branch the publisher wanted to create already exists.
    #[error("branch '{0}' already exists")]
    #[diagnostic(
        code(readmebot::branch_exists),
        help("delete the branch left by a previous run or use a different run identifier")
    )]
    BranchExists(String),

    /// The README changed between the initial read and the update.
    #[error("README '{path}' changed since revision {revision} was read")]
    #[diagnostic(code(readmebot::stale_readme))]
    StaleReadme {
        /// Path of the file that was updated concurrently.
        path: String,
        /// Revision token the update was attempted with.
        revision: String,
    },

    /// A write to the repository host failed for any other reason.
    #[error("repository write failed: {0}")]
    #[diagnostic(code(readmebot::repository_write))]
    RepositoryWrite(String),
}
