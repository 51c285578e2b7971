//! Language-model module for the EduBridge tutor core.
//!
//! This module provides:
//! * [`LanguageModel`] — async trait implemented by all completion backends.
//! * [`GeminiClient`] — Gemini `generateContent` REST client.
//! * [`PromptBuilder`] — persona, welcome and per-turn prompt formatting.
//! * [`Turn`] / [`TurnRole`] — prior-turn history passed on the wire.
//! * [`LlmError`] — uniform error variants for model operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use edubridge_tutor::capability::ExecutionContext;
//! use edubridge_tutor::config::AppConfig;
//! use edubridge_tutor::conversation::ConversationContext;
//! use edubridge_tutor::llm::{GeminiClient, LanguageModel, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let prompts = PromptBuilder::new();
//!     let persona = prompts.system_prompt(&ConversationContext::default());
//!
//!     let client = GeminiClient::from_config(
//!         &config.llm,
//!         persona,
//!         ExecutionContext::detect(),
//!     )
//!     .expect("tutor unavailable — configure an API key first");
//!
//!     let reply = client.complete(&[], "What is a closure?").await.unwrap();
//!     println!("{reply}");
//! }
//! ```

pub mod client;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{GeminiClient, LanguageModel, LlmError, Turn, TurnRole};
pub use prompt::PromptBuilder;
