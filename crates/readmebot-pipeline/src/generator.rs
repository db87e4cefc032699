use readmebot_core::{CommitMessage, FileChange, ReadmeBotError, ReadmeSnapshot, SuggestionResult};
use tracing::{debug, info};

use crate::llm::LanguageModel;
use crate::prompt::{self, ResponseSchema};

/// Turns pull request evidence into a proposed README.
///
/// Owns the model capability and nothing else; every call is independent.
pub struct SuggestionGenerator<M> {
    model: M,
}

impl<M: LanguageModel> SuggestionGenerator<M> {
    /// Wrap a model.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Ask the model for an updated README.
    ///
    /// `diffs` may be empty. The answer is validated strictly before it is
    /// returned, so callers never see a partially populated suggestion.
    ///
    /// # Errors
    ///
    /// [`ReadmeBotError::Upstream`] if the model call fails, and
    /// [`ReadmeBotError::SchemaMismatch`] if the answer is not exactly
    /// `{updated_readme, reason}`.
    pub async fn generate(
        &self,
        diffs: &[FileChange],
        readme: &ReadmeSnapshot,
        commits: &[CommitMessage],
    ) -> Result<SuggestionResult, ReadmeBotError> {
        let system = prompt::build_system_prompt();
        let human = prompt::build_suggestion_prompt(diffs, &readme.content, commits);
        let schema = ResponseSchema::suggestion();

        info!(
            files = diffs.len(),
            commits = commits.len(),
            "requesting README suggestion"
        );
        debug!(prompt = %human, "assembled prompt");

        let raw = self.model.invoke(&system, &human, &schema).await?;
        debug!(response = %raw, "received model response");

        parse_suggestion(&raw)
    }
}

/// Validate a raw model answer against the suggestion contract.
///
/// No extraction is attempted: surrounding prose or code fences fail just like
/// missing fields do. Blank fields are rejected as well, since publishing an
/// empty README is never intended.
///
/// # Errors
///
/// Returns [`ReadmeBotError::SchemaMismatch`] describing the first violation.
///
/// # Examples
///
/// ```
/// use readmebot_pipeline::generator::parse_suggestion;
///
/// let ok = parse_suggestion(r##"{"updated_readme":"# P\n","reason":"doc"}"##).unwrap();
/// assert_eq!(ok.reason, "doc");
///
/// assert!(parse_suggestion(r##"{"updated_readme":"# P\n"}"##).is_err());
/// ```
pub fn parse_suggestion(raw: &str) -> Result<SuggestionResult, ReadmeBotError> {
    let suggestion: SuggestionResult = serde_json::from_str(raw)
        .map_err(|e| ReadmeBotError::SchemaMismatch(e.to_string()))?;

    if suggestion.updated_readme.trim().is_empty() {
        return Err(ReadmeBotError::SchemaMismatch(
            "updated_readme is empty".into(),
        ));
    }
    if suggestion.reason.trim().is_empty() {
        return Err(ReadmeBotError::SchemaMismatch("reason is empty".into()));
    }

    Ok(suggestion)
}
