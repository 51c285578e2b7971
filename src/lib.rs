//! EduBridge tutor core — the conversation engine behind the platform's AI
//! tutoring chat.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  ConversationManager                       │
//! │   session state: messages · context · typing/listening/   │
//! │   speaking flags · SessionEvent subscribers                │
//! └──────┬──────────────────────────────┬──────────────────────┘
//!        │ enrich turn                  │ complete(history, prompt)
//!        ▼                              ▼
//! ┌─────────────┐               ┌──────────────────┐
//! │ PromptBuilder│              │  LanguageModel    │
//! │ persona +    │              │  (GeminiClient)   │
//! │ context lines│              └──────────────────┘
//! └─────────────┘
//!
//! ┌────────────────────────────────────────────────────────────┐
//! │                      VoiceBridge                           │
//! │  speak / stop / pause / resume · read_long_content         │
//! │  start_listening → one transcript or one error             │
//! └──────┬──────────────────────────────┬──────────────────────┘
//!        ▼                              ▼
//!  SynthesisBackend              RecognitionBackend
//!  (Capability::Supported or Unsupported, injected)
//! ```
//!
//! Recognition output is funneled into
//! [`ConversationManager::send_message`] by the embedder; assistant replies
//! are read back through [`VoiceBridge::read_long_content`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use edubridge_tutor::capability::ExecutionContext;
//! use edubridge_tutor::config::AppConfig;
//! use edubridge_tutor::conversation::{ConversationContext, ConversationManager};
//! use edubridge_tutor::llm::{GeminiClient, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!     let prompts = PromptBuilder::new();
//!     let persona = prompts.system_prompt(&ConversationContext::default());
//!
//!     let model = GeminiClient::from_config(
//!         &config.llm,
//!         persona,
//!         ExecutionContext::detect(),
//!     )
//!     .expect("tutor unavailable");
//!
//!     let manager = ConversationManager::new(Arc::new(model));
//!     manager.send_message("Explain ownership in Rust.").await;
//! }
//! ```
//!
//! [`ConversationManager::send_message`]: conversation::ConversationManager::send_message
//! [`VoiceBridge::read_long_content`]: voice::VoiceBridge::read_long_content

pub mod api;
pub mod capability;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod voice;
