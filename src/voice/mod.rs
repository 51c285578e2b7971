//! Voice module — speech synthesis / recognition bridge.
//!
//! This module provides:
//! * [`VoiceBridge`] — at-most-one-utterance synthesis control, chunked
//!   read-aloud, one-shot recognition passes.
//! * [`SynthesisBackend`] / [`RecognitionBackend`] — object-safe traits the
//!   platform capability implements.
//! * [`split_into_chunks`] — sentence-aligned chunking under a length
//!   budget.
//! * [`SynthesisError`] / [`RecognitionError`] — voice error variants,
//!   surfaced to callers unmasked.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use edubridge_tutor::voice::VoiceBridge;
//!
//! # async fn example(bridge: VoiceBridge) {
//! if bridge.is_speech_recognition_supported() {
//!     let handle = bridge.start_listening(None).unwrap();
//!     match handle.transcript().await {
//!         Ok(text) => println!("student said: {text}"),
//!         Err(err) => eprintln!("recognition failed: {err}"),
//!     }
//! }
//! # }
//! ```

pub mod backend;
pub mod bridge;
pub mod chunk;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{
    RecognitionBackend, RecognitionError, RecognitionId, SpeakOptions, SynthesisBackend,
    SynthesisError, UtteranceId, UtteranceRequest,
};
pub use bridge::{ListeningHandle, VoiceBridge};
pub use chunk::split_into_chunks;
