//! Core `LanguageModel` trait and `GeminiClient` implementation.
//!
//! `GeminiClient` calls the Gemini `generateContent` REST endpoint with the
//! full prior turn history plus one new enriched prompt.  All connection
//! details and the generation tuple come from [`LlmConfig`]; nothing is
//! hardcoded and nothing is caller-configurable per call.

use async_trait::async_trait;
use thiserror::Error;

use crate::capability::ExecutionContext;
use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur at the language-model boundary.
///
/// Every invocation failure — transport, quota, malformed output — is
/// mapped to one of these variants here; nothing else propagates upward.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The capability cannot be used in this execution context, or no
    /// credential is configured.
    #[error("language model unavailable: {0}")]
    Unavailable(String),

    /// HTTP transport or connection error, or a non-success status code.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("model request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// Author of one prior conversation turn on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// The student's side of the dialogue.
    User,
    /// The tutor's side of the dialogue.
    Model,
}

impl TurnRole {
    /// The role string used by the `generateContent` wire format.
    pub fn wire_name(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// One prior conversation turn passed as model history.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LanguageModel trait
// ---------------------------------------------------------------------------

/// Async trait for multi-turn completion backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn LanguageModel>`).
///
/// # Arguments
/// * `history` – Ordered prior turns; must open with a [`TurnRole::User`]
///               turn (the wire format rejects a leading model turn).
/// * `prompt`  – The new enriched prompt for this turn.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, history: &[Turn], prompt: &str) -> Result<String, LlmError>;

    /// Pure availability query — `true` only when the capability was
    /// successfully initialised and can accept calls.
    fn is_available(&self) -> bool;
}

// Compile-time assertion: Box<dyn LanguageModel> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn LanguageModel>) {}
};

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Calls the Gemini `generateContent` REST endpoint.
///
/// The persona block is sent as `systemInstruction` on every call; the
/// generation tuple (`temperature`/`topK`/`topP`/`maxOutputTokens`) is fixed
/// at construction for a consistent tutoring voice.
///
/// # Availability
/// [`GeminiClient::from_config`] refuses to construct in a non-interactive
/// execution context and when no API key is configured.  Callers must treat
/// `Err(LlmError::Unavailable)` as "tutor disabled", not as a transient
/// fault.
pub struct GeminiClient {
    client: reqwest::Client,
    config: LlmConfig,
    system_instruction: String,
}

impl GeminiClient {
    /// Build a `GeminiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    ///
    /// # Errors
    /// * [`LlmError::Unavailable`] when `context` is non-interactive or
    ///   `config.api_key` is missing/empty.
    pub fn from_config(
        config: &LlmConfig,
        system_instruction: impl Into<String>,
        context: ExecutionContext,
    ) -> Result<Self, LlmError> {
        if !context.is_interactive() {
            return Err(LlmError::Unavailable(
                "non-interactive execution context".into(),
            ));
        }

        let key = config.api_key.as_deref().unwrap_or("");
        if key.is_empty() {
            return Err(LlmError::Unavailable("no API key configured".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            config: config.clone(),
            system_instruction: system_instruction.into(),
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    /// Send the turn history plus `prompt` to the configured endpoint.
    ///
    /// The API key travels in the `x-goog-api-key` header, never in the URL,
    /// so it cannot leak into transport logs.
    async fn complete(&self, history: &[Turn], prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role.wire_name(),
                    "parts": [{ "text": turn.text }]
                })
            })
            .collect();
        contents.push(serde_json::json!({
            "role": "user",
            "parts": [{ "text": prompt }]
        }));

        let body = serde_json::json!({
            "contents": contents,
            "systemInstruction": { "parts": [{ "text": self.system_instruction }] },
            "generationConfig": {
                "temperature":     self.config.temperature,
                "topK":            self.config.top_k,
                "topP":            self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens
            }
        });

        let key = self.config.api_key.as_deref().unwrap_or("");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Request(format!("HTTP {status}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let completion = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if completion.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(completion)
    }

    fn is_available(&self) -> bool {
        // Construction already enforced context + credential.
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
