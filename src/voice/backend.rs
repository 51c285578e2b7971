//! Speech backend traits, errors and request types.
//!
//! The voice bridge never touches a platform speech API directly; it drives
//! an injected [`SynthesisBackend`] / [`RecognitionBackend`] handle.  Both
//! traits settle their work through one-shot channels, which gives every
//! utterance and every recognition pass exactly one outcome.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::VoiceConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by speech synthesis.
///
/// These are **not** masked by the bridge — callers see them as rejected
/// futures and decide how to degrade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// Speech synthesis is absent in this execution context.
    #[error("speech synthesis is not supported in this execution context")]
    Unsupported,

    /// The utterance was canceled — by `stop_speaking` or by a subsequent
    /// `speak` superseding it.
    #[error("utterance was canceled before completing")]
    Canceled,

    /// The platform backend reported an error.
    #[error("speech synthesis failed: {0}")]
    Backend(String),
}

/// Errors surfaced by speech recognition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// Speech recognition is absent in this execution context.
    #[error("speech recognition is not supported in this execution context")]
    Unsupported,

    /// The pass was aborted via `stop_listening` before a transcript was
    /// produced.
    #[error("recognition pass was aborted")]
    Aborted,

    /// The platform backend reported an error (e.g. `no-speech`,
    /// `not-allowed`).
    #[error("speech recognition failed: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Backend-assigned handle for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

/// Backend-assigned handle for one recognition pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecognitionId(pub u64);

// ---------------------------------------------------------------------------
// SpeakOptions / UtteranceRequest
// ---------------------------------------------------------------------------

/// Per-utterance synthesis parameters.
///
/// Unset fields fall back to [`VoiceConfig`] defaults when the bridge
/// builds the [`UtteranceRequest`].
#[derive(Debug, Clone, Default)]
pub struct SpeakOptions {
    pub lang: Option<String>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub voice: Option<String>,
}

/// Fully-resolved synthesis request handed to the backend.
#[derive(Debug, Clone)]
pub struct UtteranceRequest {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Named platform voice; `None` means the platform default.
    pub voice: Option<String>,
}

impl UtteranceRequest {
    /// Resolve `options` against the configured defaults.
    pub fn resolve(text: &str, options: SpeakOptions, defaults: &VoiceConfig) -> Self {
        Self {
            text: text.to_string(),
            lang: options.lang.unwrap_or_else(|| defaults.language.clone()),
            rate: options.rate.unwrap_or(defaults.rate),
            pitch: options.pitch.unwrap_or(defaults.pitch),
            volume: options.volume.unwrap_or(defaults.volume),
            voice: options.voice.or_else(|| defaults.voice.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Backend traits
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-synthesis backends.
///
/// # Contract
///
/// - `start_utterance` begins playback and returns immediately; the backend
///   sends **exactly one** result on `done` when the utterance completes,
///   fails, or is canceled.
/// - `cancel` must settle the utterance's `done` channel with
///   [`SynthesisError::Canceled`].
/// - `pause` / `resume` are best-effort and must not settle the channel.
/// - Calls with an unknown id are no-ops.
pub trait SynthesisBackend: Send + Sync {
    fn start_utterance(
        &self,
        request: UtteranceRequest,
        done: oneshot::Sender<Result<(), SynthesisError>>,
    ) -> Result<UtteranceId, SynthesisError>;

    fn cancel(&self, id: UtteranceId);
    fn pause(&self, id: UtteranceId);
    fn resume(&self, id: UtteranceId);
}

/// Object-safe, thread-safe interface for speech-recognition backends.
///
/// # Contract
///
/// - `start_pass` begins one non-continuous pass and returns immediately;
///   the backend sends **at most one** transcript or error on `result`,
///   then the pass auto-terminates.
/// - `abort` stops an active pass early; the pass must then either settle
///   with [`RecognitionError::Aborted`] or drop its sender (the bridge
///   maps a closed channel to `Aborted`).
pub trait RecognitionBackend: Send + Sync {
    fn start_pass(
        &self,
        lang: &str,
        result: oneshot::Sender<Result<String, RecognitionError>>,
    ) -> Result<RecognitionId, RecognitionError>;

    fn abort(&self, id: RecognitionId);
}

// Compile-time assertions: both traits must be object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SynthesisBackend>, _: Box<dyn RecognitionBackend>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
