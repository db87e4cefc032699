use async_trait::async_trait;
use readmebot_core::{LlmConfig, ReadmeBotError};
use serde::{Deserialize, Serialize};

use crate::prompt::ResponseSchema;

/// One turn of the two-message conversation sent to the model.
///
/// # Examples
///
/// ```
/// use readmebot_pipeline::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage::human("Update the README");
/// assert_eq!(msg.role, Role::User);
/// assert_eq!(msg.content, "Update the README");
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    /// Instructions framing the model as a documentation reviewer.
    pub fn system(content: &'a str) -> Self {
        Self {
            role: Role::System,
            content,
        }
    }

    /// The diffs, README and commit messages for this run.
    pub fn human(content: &'a str) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

/// Sender of a [`ChatMessage`], named as the chat completions API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A model that answers a system + human prompt under a response schema.
///
/// Implementations return the raw structured text; validating it against the
/// schema is the caller's job.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one request and return the model's structured answer.
    ///
    /// # Errors
    ///
    /// [`ReadmeBotError::Upstream`] when the provider call fails, and
    /// [`ReadmeBotError::SchemaMismatch`] when the provider declines to
    /// produce structured output.
    async fn invoke(
        &self,
        system: &str,
        human: &str,
        schema: &ResponseSchema,
    ) -> Result<String, ReadmeBotError>;
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes `/v1/chat/completions` and supports
/// `response_format: json_schema`.
///
/// # Examples
///
/// ```
/// use readmebot_core::LlmConfig;
/// use readmebot_pipeline::llm::LlmClient;
///
/// let client = LlmClient::new(&LlmConfig::new("test-key")).unwrap();
/// assert_eq!(client.model(), "gpt-4o-mini");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeBotError::Upstream`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, ReadmeBotError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ReadmeBotError::Upstream(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a chat completion constrained to `schema` and return the content.
    ///
    /// Sampling is deterministic (temperature 0) and the schema is sent in
    /// strict mode.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeBotError::Upstream`] on transport errors, non-success
    /// statuses or a response without a message, and
    /// [`ReadmeBotError::SchemaMismatch`] if the model refuses.
    pub async fn chat(
        &self,
        messages: &[ChatMessage<'_>],
        schema: &ResponseSchema,
    ) -> Result<String, ReadmeBotError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": 0,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "strict": true,
                    "schema": schema.schema,
                },
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReadmeBotError::Upstream(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ReadmeBotError::Upstream(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|e| ReadmeBotError::Upstream(format!("failed to parse response: {e}")))?;

        let Some(choice) = response_body.choices.into_iter().next() else {
            return Err(ReadmeBotError::Upstream(
                "response contained no choices".into(),
            ));
        };

        if let Some(refusal) = choice.message.refusal {
            return Err(ReadmeBotError::SchemaMismatch(format!(
                "model refused to answer: {refusal}"
            )));
        }

        choice.message.content.ok_or_else(|| {
            ReadmeBotError::Upstream("response message has no content".into())
        })
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn invoke(
        &self,
        system: &str,
        human: &str,
        schema: &ResponseSchema,
    ) -> Result<String, ReadmeBotError> {
        let messages = [ChatMessage::system(system), ChatMessage::human(human)];
        self.chat(&messages, schema).await
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}
