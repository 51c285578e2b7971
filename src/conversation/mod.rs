//! Conversation module — session state and the tutoring orchestrator.
//!
//! This module provides:
//! * [`ConversationManager`] — owns the session, dispatches turns to the
//!   language model, degrades failures to a fallback reply.
//! * [`Message`] / [`Role`] — the append-only dialogue sequence.
//! * [`ConversationContext`] — sparse lesson overlay injected into prompts.
//! * [`SessionEvent`] — state-change notifications for observers.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use edubridge_tutor::conversation::{ConversationContext, ConversationManager};
//! use edubridge_tutor::llm::LanguageModel;
//!
//! # async fn example(model: Arc<dyn LanguageModel>) {
//! let manager = ConversationManager::new(model);
//! manager.start_session(Some(ConversationContext {
//!     course_name: Some("Rust Basics".into()),
//!     ..ConversationContext::default()
//! }));
//!
//! let mut events = manager.subscribe();
//! manager.send_message("What is ownership?").await;
//! while let Ok(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//! # }
//! ```

pub mod manager;
pub mod message;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use manager::{ConversationManager, SessionEvent};
pub use message::{ConversationContext, Message, Role};
