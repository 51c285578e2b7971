//! Voice bridge — speech synthesis and recognition orchestration.
//!
//! [`VoiceBridge`] is the only component that talks to the speech backends.
//! It enforces the at-most-one-active-utterance invariant, reads long
//! content in sentence-aligned chunks, and exposes recognition as a
//! one-shot pass that yields exactly one transcript or one error.
//!
//! Both capabilities are injected at construction as [`Capability`] values;
//! every method fails fast with the `Unsupported` error of its subsystem
//! when the capability is absent — nothing probes the platform and nothing
//! hangs.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::capability::Capability;
use crate::config::VoiceConfig;
use crate::voice::backend::{
    RecognitionBackend, RecognitionError, RecognitionId, SpeakOptions, SynthesisBackend,
    SynthesisError, UtteranceId, UtteranceRequest,
};
use crate::voice::chunk::split_into_chunks;

// ---------------------------------------------------------------------------
// ListeningHandle
// ---------------------------------------------------------------------------

/// Handle to one recognition pass.
///
/// Yields exactly one value: the transcript, or an error.  If the pass is
/// aborted (via [`VoiceBridge::stop_listening`] or a superseding
/// [`VoiceBridge::start_listening`]) the handle yields
/// [`RecognitionError::Aborted`].
pub struct ListeningHandle {
    rx: oneshot::Receiver<Result<String, RecognitionError>>,
}

impl ListeningHandle {
    /// Await the single outcome of the pass.
    pub async fn transcript(self) -> Result<String, RecognitionError> {
        self.rx.await.unwrap_or(Err(RecognitionError::Aborted))
    }
}

// ---------------------------------------------------------------------------
// VoiceBridge
// ---------------------------------------------------------------------------

/// Bridges the tutoring conversation to the platform voice channel.
///
/// ```rust,no_run
/// use edubridge_tutor::voice::VoiceBridge;
///
/// # async fn example(bridge: VoiceBridge) {
/// if bridge.is_speech_synthesis_supported() {
///     bridge
///         .read_long_content("Welcome back. Today we cover ownership.", None)
///         .await
///         .ok();
/// }
/// # }
/// ```
pub struct VoiceBridge {
    synthesis: Capability<Arc<dyn SynthesisBackend>>,
    recognition: Capability<Arc<dyn RecognitionBackend>>,
    defaults: VoiceConfig,
    active_utterance: Mutex<Option<UtteranceId>>,
    active_pass: Mutex<Option<RecognitionId>>,
}

impl VoiceBridge {
    /// Create a bridge over the injected capabilities.
    pub fn new(
        synthesis: Capability<Arc<dyn SynthesisBackend>>,
        recognition: Capability<Arc<dyn RecognitionBackend>>,
        defaults: VoiceConfig,
    ) -> Self {
        Self {
            synthesis,
            recognition,
            defaults,
            active_utterance: Mutex::new(None),
            active_pass: Mutex::new(None),
        }
    }

    /// Convenience constructor for execution contexts with no voice channel
    /// at all (headless embedders); every method fails fast.
    pub fn unsupported(defaults: VoiceConfig) -> Self {
        Self::new(Capability::Unsupported, Capability::Unsupported, defaults)
    }

    // -----------------------------------------------------------------------
    // Capability predicates
    // -----------------------------------------------------------------------

    pub fn is_speech_synthesis_supported(&self) -> bool {
        self.synthesis.is_supported()
    }

    pub fn is_speech_recognition_supported(&self) -> bool {
        self.recognition.is_supported()
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    /// Speak `text`, canceling any currently active utterance first.
    ///
    /// Resolves `Ok(())` when the utterance completes naturally.  Returns
    /// [`SynthesisError::Canceled`] when the utterance is superseded by a
    /// later `speak` or stopped via [`stop_speaking`](Self::stop_speaking),
    /// and [`SynthesisError::Unsupported`] immediately when synthesis is
    /// absent.
    pub async fn speak(&self, text: &str, options: SpeakOptions) -> Result<(), SynthesisError> {
        let Capability::Supported(backend) = &self.synthesis else {
            return Err(SynthesisError::Unsupported);
        };
        let backend = Arc::clone(backend);

        let request = UtteranceRequest::resolve(text, options, &self.defaults);
        let (done_tx, done_rx) = oneshot::channel();

        let id = {
            let mut active = self.active_utterance.lock().unwrap();
            // At most one utterance is ever active.
            if let Some(previous) = active.take() {
                backend.cancel(previous);
            }
            let id = backend.start_utterance(request, done_tx)?;
            *active = Some(id);
            id
        };

        // A dropped channel means the backend abandoned the utterance.
        let outcome = done_rx.await.unwrap_or(Err(SynthesisError::Canceled));

        let mut active = self.active_utterance.lock().unwrap();
        if *active == Some(id) {
            *active = None;
        }
        outcome
    }

    /// Cancel the active utterance; no-op when nothing is active.
    pub fn stop_speaking(&self) {
        let Capability::Supported(backend) = &self.synthesis else {
            return;
        };
        if let Some(id) = self.active_utterance.lock().unwrap().take() {
            backend.cancel(id);
        }
    }

    /// Pause the active utterance; no-op when nothing is active.
    pub fn pause_speaking(&self) {
        let Capability::Supported(backend) = &self.synthesis else {
            return;
        };
        if let Some(id) = *self.active_utterance.lock().unwrap() {
            backend.pause(id);
        }
    }

    /// Resume a paused utterance; no-op when nothing is active.
    pub fn resume_speaking(&self) {
        let Capability::Supported(backend) = &self.synthesis else {
            return;
        };
        if let Some(id) = *self.active_utterance.lock().unwrap() {
            backend.resume(id);
        }
    }

    /// Read long content aloud in sentence-aligned chunks.
    ///
    /// `max_chunk_len` defaults to the configured chunk budget.  Chunks are
    /// synthesized strictly in order, each awaited before the next starts;
    /// a failed or canceled chunk stops the read and surfaces its error.
    pub async fn read_long_content(
        &self,
        text: &str,
        max_chunk_len: Option<usize>,
    ) -> Result<(), SynthesisError> {
        if !self.synthesis.is_supported() {
            return Err(SynthesisError::Unsupported);
        }

        let budget = max_chunk_len.unwrap_or(self.defaults.max_chunk_chars);
        for chunk in split_into_chunks(text, budget) {
            self.speak(&chunk, SpeakOptions::default()).await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Recognition
    // -----------------------------------------------------------------------

    /// Begin a one-shot recognition pass.
    ///
    /// The pass is non-continuous: it produces exactly one transcript on
    /// success or exactly one error, then auto-terminates.  A pass that is
    /// already active is aborted first.
    pub fn start_listening(
        &self,
        lang: Option<&str>,
    ) -> Result<ListeningHandle, RecognitionError> {
        let Capability::Supported(backend) = &self.recognition else {
            return Err(RecognitionError::Unsupported);
        };

        let (result_tx, result_rx) = oneshot::channel();
        let mut active = self.active_pass.lock().unwrap();
        if let Some(previous) = active.take() {
            backend.abort(previous);
        }
        let id = backend.start_pass(lang.unwrap_or(&self.defaults.language), result_tx)?;
        *active = Some(id);

        Ok(ListeningHandle { rx: result_rx })
    }

    /// Abort the active recognition pass; its handle then yields
    /// [`RecognitionError::Aborted`].  No-op when nothing is active.
    pub fn stop_listening(&self) {
        let Capability::Supported(backend) = &self.recognition else {
            return;
        };
        if let Some(id) = self.active_pass.lock().unwrap().take() {
            backend.abort(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Holds utterances pending until the test settles them explicitly.
    #[derive(Default)]
    struct ScriptedSynthesis {
        next_id: AtomicU64,
        pending: Mutex<HashMap<u64, oneshot::Sender<Result<(), SynthesisError>>>>,
        canceled: Mutex<Vec<u64>>,
        paused: Mutex<Vec<u64>>,
        resumed: Mutex<Vec<u64>>,
    }

    impl ScriptedSynthesis {
        fn pending_count(&self) -> usize {
            self.pending.lock().unwrap().len()
        }

        fn canceled_count(&self) -> usize {
            self.canceled.lock().unwrap().len()
        }

        /// Complete the single pending utterance.
        fn complete_pending(&self) {
            let mut pending = self.pending.lock().unwrap();
            let id = *pending.keys().next().expect("an utterance must be pending");
            let tx = pending.remove(&id).unwrap();
            let _ = tx.send(Ok(()));
        }
    }

    impl SynthesisBackend for ScriptedSynthesis {
        fn start_utterance(
            &self,
            _request: UtteranceRequest,
            done: oneshot::Sender<Result<(), SynthesisError>>,
        ) -> Result<UtteranceId, SynthesisError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.pending.lock().unwrap().insert(id, done);
            Ok(UtteranceId(id))
        }

        fn cancel(&self, id: UtteranceId) {
            if let Some(tx) = self.pending.lock().unwrap().remove(&id.0) {
                let _ = tx.send(Err(SynthesisError::Canceled));
                self.canceled.lock().unwrap().push(id.0);
            }
        }

        fn pause(&self, id: UtteranceId) {
            self.paused.lock().unwrap().push(id.0);
        }

        fn resume(&self, id: UtteranceId) {
            self.resumed.lock().unwrap().push(id.0);
        }
    }

    /// Completes every utterance immediately, recording spoken texts in
    /// order.  `fail_at` (1-based) makes that utterance fail instead.
    #[derive(Default)]
    struct InstantSynthesis {
        next_id: AtomicU64,
        spoken: Mutex<Vec<String>>,
        fail_at: Option<u64>,
    }

    impl SynthesisBackend for InstantSynthesis {
        fn start_utterance(
            &self,
            request: UtteranceRequest,
            done: oneshot::Sender<Result<(), SynthesisError>>,
        ) -> Result<UtteranceId, SynthesisError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.spoken.lock().unwrap().push(request.text);
            let outcome = if self.fail_at == Some(id) {
                Err(SynthesisError::Backend("audio device lost".into()))
            } else {
                Ok(())
            };
            let _ = done.send(outcome);
            Ok(UtteranceId(id))
        }

        fn cancel(&self, _id: UtteranceId) {}
        fn pause(&self, _id: UtteranceId) {}
        fn resume(&self, _id: UtteranceId) {}
    }

    /// Holds recognition passes pending until the test settles them.
    #[derive(Default)]
    struct ScriptedRecognition {
        next_id: AtomicU64,
        pending: Mutex<HashMap<u64, oneshot::Sender<Result<String, RecognitionError>>>>,
        langs: Mutex<Vec<String>>,
    }

    impl ScriptedRecognition {
        fn deliver(&self, transcript: &str) {
            let mut pending = self.pending.lock().unwrap();
            let id = *pending.keys().next().expect("a pass must be pending");
            let tx = pending.remove(&id).unwrap();
            let _ = tx.send(Ok(transcript.to_string()));
        }

        fn fail(&self, error: RecognitionError) {
            let mut pending = self.pending.lock().unwrap();
            let id = *pending.keys().next().expect("a pass must be pending");
            let tx = pending.remove(&id).unwrap();
            let _ = tx.send(Err(error));
        }
    }

    impl RecognitionBackend for ScriptedRecognition {
        fn start_pass(
            &self,
            lang: &str,
            result: oneshot::Sender<Result<String, RecognitionError>>,
        ) -> Result<RecognitionId, RecognitionError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.langs.lock().unwrap().push(lang.to_string());
            self.pending.lock().unwrap().insert(id, result);
            Ok(RecognitionId(id))
        }

        fn abort(&self, id: RecognitionId) {
            // Dropping the sender closes the channel; the bridge maps a
            // closed channel to Aborted.
            self.pending.lock().unwrap().remove(&id.0);
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn scripted_bridge() -> (VoiceBridge, Arc<ScriptedSynthesis>, Arc<ScriptedRecognition>) {
        let synthesis = Arc::new(ScriptedSynthesis::default());
        let recognition = Arc::new(ScriptedRecognition::default());
        let bridge = VoiceBridge::new(
            Capability::Supported(synthesis.clone() as Arc<dyn SynthesisBackend>),
            Capability::Supported(recognition.clone() as Arc<dyn RecognitionBackend>),
            VoiceConfig::default(),
        );
        (bridge, synthesis, recognition)
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        for _ in 0..1000 {
            if condition() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition not reached");
    }

    // -----------------------------------------------------------------------
    // Unsupported capability
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unsupported_bridge_fails_fast_everywhere() {
        let bridge = VoiceBridge::unsupported(VoiceConfig::default());

        assert!(!bridge.is_speech_synthesis_supported());
        assert!(!bridge.is_speech_recognition_supported());

        let speak = bridge.speak("hello", SpeakOptions::default()).await;
        assert_eq!(speak, Err(SynthesisError::Unsupported));

        let read = bridge.read_long_content("hello.", None).await;
        assert_eq!(read, Err(SynthesisError::Unsupported));

        assert!(matches!(
            bridge.start_listening(None),
            Err(RecognitionError::Unsupported)
        ));

        // Control methods must not panic either.
        bridge.stop_speaking();
        bridge.pause_speaking();
        bridge.resume_speaking();
        bridge.stop_listening();
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn speak_resolves_when_utterance_completes() {
        let (bridge, synthesis, _) = scripted_bridge();
        let bridge = Arc::new(bridge);

        let speaking = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("hello", SpeakOptions::default()).await })
        };

        wait_until(|| synthesis.pending_count() == 1).await;
        synthesis.complete_pending();

        assert_eq!(speaking.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn second_speak_cancels_the_first() {
        let (bridge, synthesis, _) = scripted_bridge();
        let bridge = Arc::new(bridge);

        let first = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("first", SpeakOptions::default()).await })
        };
        wait_until(|| synthesis.pending_count() == 1).await;

        let second = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("second", SpeakOptions::default()).await })
        };
        wait_until(|| synthesis.canceled_count() == 1).await;

        // The first settles via the distinct Canceled error; exactly one
        // utterance remains active.
        assert_eq!(first.await.unwrap(), Err(SynthesisError::Canceled));
        assert_eq!(synthesis.pending_count(), 1);

        synthesis.complete_pending();
        assert_eq!(second.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn stop_speaking_settles_the_active_utterance() {
        let (bridge, synthesis, _) = scripted_bridge();
        let bridge = Arc::new(bridge);

        let speaking = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("hello", SpeakOptions::default()).await })
        };
        wait_until(|| synthesis.pending_count() == 1).await;

        bridge.stop_speaking();
        assert_eq!(speaking.await.unwrap(), Err(SynthesisError::Canceled));
    }

    #[tokio::test]
    async fn pause_and_resume_reach_the_active_utterance() {
        let (bridge, synthesis, _) = scripted_bridge();
        let bridge = Arc::new(bridge);

        // No-ops while idle.
        bridge.pause_speaking();
        bridge.resume_speaking();
        assert!(synthesis.paused.lock().unwrap().is_empty());

        let speaking = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.speak("hello", SpeakOptions::default()).await })
        };
        wait_until(|| synthesis.pending_count() == 1).await;

        bridge.pause_speaking();
        bridge.resume_speaking();
        assert_eq!(synthesis.paused.lock().unwrap().len(), 1);
        assert_eq!(synthesis.resumed.lock().unwrap().len(), 1);

        synthesis.complete_pending();
        speaking.await.unwrap().unwrap();
    }

    // -----------------------------------------------------------------------
    // Long content
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn read_long_content_speaks_chunks_in_order() {
        let synthesis = Arc::new(InstantSynthesis::default());
        let bridge = VoiceBridge::new(
            Capability::Supported(synthesis.clone() as Arc<dyn SynthesisBackend>),
            Capability::Unsupported,
            VoiceConfig::default(),
        );

        let text = "First sentence here. Second sentence here. Third sentence here.";
        bridge.read_long_content(text, Some(25)).await.unwrap();

        let spoken = synthesis.spoken.lock().unwrap();
        assert_eq!(
            *spoken,
            vec![
                "First sentence here.",
                "Second sentence here.",
                "Third sentence here."
            ]
        );
    }

    #[tokio::test]
    async fn read_long_content_stops_on_chunk_failure() {
        let synthesis = Arc::new(InstantSynthesis {
            fail_at: Some(2),
            ..InstantSynthesis::default()
        });
        let bridge = VoiceBridge::new(
            Capability::Supported(synthesis.clone() as Arc<dyn SynthesisBackend>),
            Capability::Unsupported,
            VoiceConfig::default(),
        );

        let text = "One chunk goes fine. Second chunk fails now. Third never starts.";
        let result = bridge.read_long_content(text, Some(25)).await;

        assert!(matches!(result, Err(SynthesisError::Backend(_))));
        assert_eq!(synthesis.spoken.lock().unwrap().len(), 2);
    }

    // -----------------------------------------------------------------------
    // Recognition
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn listening_yields_exactly_one_transcript() {
        let (bridge, _, recognition) = scripted_bridge();

        let handle = bridge.start_listening(Some("en-GB")).unwrap();
        recognition.deliver("hello tutor");

        assert_eq!(handle.transcript().await.unwrap(), "hello tutor");
        assert_eq!(recognition.langs.lock().unwrap()[0], "en-GB");
    }

    #[tokio::test]
    async fn listening_uses_configured_default_language() {
        let (bridge, _, recognition) = scripted_bridge();

        let handle = bridge.start_listening(None).unwrap();
        recognition.deliver("hi");
        handle.transcript().await.unwrap();

        assert_eq!(recognition.langs.lock().unwrap()[0], "en-US");
    }

    #[tokio::test]
    async fn recognition_errors_surface_unmasked() {
        let (bridge, _, recognition) = scripted_bridge();

        let handle = bridge.start_listening(None).unwrap();
        recognition.fail(RecognitionError::Backend("no-speech".into()));

        assert_eq!(
            handle.transcript().await,
            Err(RecognitionError::Backend("no-speech".into()))
        );
    }

    #[tokio::test]
    async fn stop_listening_aborts_the_pass() {
        let (bridge, _, recognition) = scripted_bridge();

        let handle = bridge.start_listening(None).unwrap();
        bridge.stop_listening();

        assert_eq!(handle.transcript().await, Err(RecognitionError::Aborted));
        assert!(recognition.pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_pass_supersedes_an_active_one() {
        let (bridge, _, recognition) = scripted_bridge();

        let first = bridge.start_listening(None).unwrap();
        let second = bridge.start_listening(None).unwrap();
        recognition.deliver("second pass");

        assert_eq!(first.transcript().await, Err(RecognitionError::Aborted));
        assert_eq!(second.transcript().await.unwrap(), "second pass");
    }
}
