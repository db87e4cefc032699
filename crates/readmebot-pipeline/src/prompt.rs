
use readmebot_core::{CommitMessage, FileChange};
use serde::Serialize;

const SYSTEM_PROMPT: &str = "\
You are a senior software developer.
You are working on a project with a team of developers.
Your task is to update the README file of the project, according to the changes made in a pull request.
You will be provided with
1. A list of changed files in the pull request, including the file name and the changes made.
2. The current content of the README file.
3. The commit messages associated with the pull request.
You need to generate the updated README file content based on the provided information.
You also need to provide a reason for your changes in the README file.";

/// Name under which the suggestion schema is sent to the model.
pub const SUGGESTION_SCHEMA_NAME: &str = "readme_suggestion";

/// A JSON schema the model's answer must conform to.
///
/// # Examples
///
/// ```
/// use readmebot_pipeline::prompt::ResponseSchema;
///
/// let schema = ResponseSchema::suggestion();
/// assert_eq!(schema.name, "readme_suggestion");
/// assert_eq!(schema.schema["required"][0], "updated_readme");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSchema {
    /// Identifier sent alongside the schema.
    pub name: String,
    /// JSON Schema document.
    pub schema: serde_json::Value,
}

impl ResponseSchema {
    /// The `{updated_readme, reason}` contract.
    pub fn suggestion() -> Self {
        Self {
            name: SUGGESTION_SCHEMA_NAME.to_string(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "updated_readme": {
                        "type": "string",
                        "description": "The updated README content"
                    },
                    "reason": {
                        "type": "string",
                        "description": "The reason for the changes made in the README"
                    }
                },
                "required": ["updated_readme", "reason"],
                "additionalProperties": false
            }),
        }
    }
}

/// Build the system prompt for README suggestions.
///
/// # Examples
///
/// ```
/// use readmebot_pipeline::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("README"));
/// ```
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Render changed files as `File:` / `Changes:` blocks, newline-joined.
///
/// An empty slice renders as an empty string.
pub fn format_diffs(diffs: &[FileChange]) -> String {
    diffs
        .iter()
        .map(|d| format!("File: {}\nChanges:\n{}\n", d.filename, d.patch))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join commit messages with newlines, preserving order.
pub fn format_commit_messages(commits: &[CommitMessage]) -> String {
    commits
        .iter()
        .map(CommitMessage::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the human message carrying the diffs, README and commit messages.
///
/// # Examples
///
/// ```
/// use readmebot_core::{CommitMessage, FileChange};
/// use readmebot_pipeline::prompt::build_suggestion_prompt;
///
/// let diffs = vec![FileChange { filename: "app.py".into(), patch: "+print()".into() }];
/// let prompt = build_suggestion_prompt(&diffs, "# Project\n", &[CommitMessage::from("add app.py")]);
/// assert!(prompt.contains("File: app.py"));
/// assert!(prompt.contains("# Project"));
/// assert!(prompt.contains("add app.py"));
/// ```
pub fn build_suggestion_prompt(
    diffs: &[FileChange],
    readme: &str,
    commits: &[CommitMessage],
) -> String {
    format!(
        "File changes:\n{}\n\nReadme Content:\n{readme}\n\nCommit Messages:\n{}",
        format_diffs(diffs),
        format_commit_messages(commits)
    )
}
