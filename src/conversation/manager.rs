//! Conversation manager — owns session state and orchestrates the tutor.
//!
//! [`ConversationManager`] is the top of the component stack: it owns the
//! [`Session`](SessionEvent) state (messages, context, flags), enriches each
//! student turn via [`PromptBuilder`], dispatches it to an injected
//! [`LanguageModel`], and appends the completion — or a fixed apologetic
//! fallback — as the assistant reply.  Callers never observe a model
//! failure as an error.
//!
//! # State & concurrency
//!
//! Session state lives behind `Arc<Mutex<…>>` with short critical sections
//! that are never held across an `.await`.  Model invocations are
//! serialized by a per-session `tokio::sync::Mutex` turn lock: user
//! messages still append immediately and in call order, but completions are
//! processed one at a time, so each assistant reply lands after its user
//! message even when `send_message` calls overlap.  The `typing` flag is
//! backed by an in-flight counter and a drop guard, so it is cleared on
//! every exit path and never cleared early by an overlapping call.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::conversation::message::{ConversationContext, Message, Role};
use crate::llm::{LanguageModel, PromptBuilder, Turn, TurnRole};

// ---------------------------------------------------------------------------
// Fallback reply
// ---------------------------------------------------------------------------

/// Assistant text shown when the model invocation fails for any reason.
const FALLBACK_REPLY: &str =
    "I apologize, but I'm having trouble processing that right now. Could you please try again?";

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// State-change notification delivered to subscribers.
///
/// Events are broadcast to subscribers in subscription order; a subscriber
/// whose receiver has been dropped is pruned on the next broadcast.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The session was (re)started; the message sequence now holds exactly
    /// the welcome message.
    SessionStarted,
    /// A message was appended to the sequence.
    MessageAppended(Message),
    /// The typing flag changed.
    TypingChanged(bool),
    /// The listening flag changed.
    ListeningChanged(bool),
    /// The speaking flag changed.
    SpeakingChanged(bool),
}

// ---------------------------------------------------------------------------
// SessionState (internal)
// ---------------------------------------------------------------------------

/// Mutable session state, owned exclusively by [`ConversationManager`].
struct SessionState {
    messages: Vec<Message>,
    context: ConversationContext,
    typing: bool,
    listening: bool,
    speaking: bool,
    /// Number of `send_message` calls currently awaiting a completion.
    in_flight: u32,
    next_seq: u64,
    started_at: Instant,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            context: ConversationContext::default(),
            typing: false,
            listening: false,
            speaking: false,
            in_flight: 0,
            next_seq: 1,
            started_at: Instant::now(),
            subscribers: Vec::new(),
        }
    }

    /// Append a message, assigning the next opaque id and a timestamp that
    /// is monotonic within the session.
    fn push_message(&mut self, role: Role, content: String) -> Message {
        let message = Message {
            id: format!("msg-{}", self.next_seq),
            role,
            content,
            timestamp_ms: self.started_at.elapsed().as_millis() as u64,
            audio_url: None,
        };
        self.next_seq += 1;
        self.messages.push(message.clone());
        self.broadcast(SessionEvent::MessageAppended(message.clone()));
        message
    }

    /// Deliver `event` to every live subscriber, in subscription order.
    fn broadcast(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

// ---------------------------------------------------------------------------
// TypingGuard
// ---------------------------------------------------------------------------

/// Raises the typing flag for the duration of one model invocation.
///
/// Dropping the guard settles the call: the in-flight counter is
/// decremented and `typing` is lowered once no invocation remains, on every
/// exit path.
struct TypingGuard {
    state: Arc<Mutex<SessionState>>,
}

impl TypingGuard {
    fn engage(state: &Arc<Mutex<SessionState>>) -> Self {
        let mut s = state.lock().unwrap();
        s.in_flight += 1;
        if !s.typing {
            s.typing = true;
            s.broadcast(SessionEvent::TypingChanged(true));
        }
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.in_flight = s.in_flight.saturating_sub(1);
        if s.in_flight == 0 && s.typing {
            s.typing = false;
            s.broadcast(SessionEvent::TypingChanged(false));
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationManager
// ---------------------------------------------------------------------------

/// Owns one tutoring session and orchestrates prompt building, model
/// dispatch and voice-flag bookkeeping.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use edubridge_tutor::conversation::ConversationManager;
/// use edubridge_tutor::llm::LanguageModel;
///
/// # async fn example(model: Arc<dyn LanguageModel>) {
/// let manager = ConversationManager::new(model);
/// manager.send_message("What is a borrow checker?").await;
/// for message in manager.messages() {
///     println!("[{:?}] {}", message.role, message.content);
/// }
/// # }
/// ```
pub struct ConversationManager {
    state: Arc<Mutex<SessionState>>,
    model: Arc<dyn LanguageModel>,
    prompts: PromptBuilder,
    /// Serializes model invocations for this session.
    turn_lock: tokio::sync::Mutex<()>,
}

impl ConversationManager {
    /// Create a manager and start its first session (no context).
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        let manager = Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            model,
            prompts: PromptBuilder::new(),
            turn_lock: tokio::sync::Mutex::new(()),
        };
        manager.start_session(None);
        manager
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Reset the session: replace the context when one is supplied, clear
    /// all flags, and reset the message sequence to a single assistant
    /// welcome message (course-scoped when the context names a course).
    ///
    /// Idempotent — every call produces the same reset state.
    pub fn start_session(&self, context: Option<ConversationContext>) {
        let mut s = self.state.lock().unwrap();

        if let Some(context) = context {
            s.context = context;
        }

        s.messages.clear();
        s.typing = false;
        s.listening = false;
        s.speaking = false;
        s.in_flight = 0;
        s.next_seq = 1;
        s.started_at = Instant::now();

        let welcome = self.prompts.welcome_message(&s.context);
        s.push_message(Role::Assistant, welcome);
        s.broadcast(SessionEvent::SessionStarted);
    }

    // -----------------------------------------------------------------------
    // Messaging
    // -----------------------------------------------------------------------

    /// Send one student turn.
    ///
    /// Empty (trimmed) input is a silent no-op.  Otherwise the user message
    /// is appended synchronously before any suspension, `typing` is raised,
    /// the prompt is enriched with the current context, and the model is
    /// invoked under the session turn lock.  On success the completion is
    /// appended as the assistant reply; on any failure a fixed apologetic
    /// fallback is appended instead — this method never surfaces the error.
    pub async fn send_message(&self, text: &str) {
        if text.trim().is_empty() {
            log::debug!("ignoring empty message");
            return;
        }

        let (history, prompt) = {
            let mut s = self.state.lock().unwrap();
            let history = wire_history(&s.messages);
            let prompt = self.prompts.enhance_with_context(&s.context, text);
            s.push_message(Role::User, text.to_string());
            (history, prompt)
        };

        let _typing = TypingGuard::engage(&self.state);

        let _turn = self.turn_lock.lock().await;
        let reply = match self.model.complete(&history, &prompt).await {
            Ok(completion) => completion,
            Err(err) => {
                log::warn!("model invocation failed: {err} — sending fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        let mut s = self.state.lock().unwrap();
        s.push_message(Role::Assistant, reply);
    }

    // -----------------------------------------------------------------------
    // Quick actions
    // -----------------------------------------------------------------------

    /// Ask the tutor to explain `concept`; `level` defaults to
    /// "intermediate".
    pub async fn explain_concept(&self, concept: &str, level: Option<&str>) {
        let prompt = self
            .prompts
            .explain_concept(concept, level.unwrap_or("intermediate"));
        self.send_message(&prompt).await;
    }

    /// Ask for a practical example of `topic`.
    pub async fn ask_for_example(&self, topic: &str) {
        let prompt = self.prompts.ask_for_example(topic);
        self.send_message(&prompt).await;
    }

    /// Ask for a practice problem about `topic`.
    pub async fn request_practice(&self, topic: &str) {
        let prompt = self.prompts.request_practice(topic);
        self.send_message(&prompt).await;
    }

    /// Ask for a summary of `topic`.
    pub async fn get_summary(&self, topic: &str) {
        let prompt = self.prompts.summary(topic);
        self.send_message(&prompt).await;
    }

    /// Ask for study tips about `topic`.
    pub async fn get_study_tips(&self, topic: &str) {
        let prompt = self.prompts.study_tips(topic);
        self.send_message(&prompt).await;
    }

    // -----------------------------------------------------------------------
    // Context
    // -----------------------------------------------------------------------

    /// Merge `partial` into the current context (field-wise overwrite;
    /// absent fields are retained).
    pub fn set_context(&self, partial: ConversationContext) {
        self.state.lock().unwrap().context.merge(partial);
    }

    /// Reset the context to empty.
    pub fn clear_context(&self) {
        self.state.lock().unwrap().context.clear();
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    /// Snapshot of the message sequence, in display order.
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    /// Snapshot of the current context overlay.
    pub fn context(&self) -> ConversationContext {
        self.state.lock().unwrap().context.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.state.lock().unwrap().typing
    }

    pub fn is_listening(&self) -> bool {
        self.state.lock().unwrap().listening
    }

    pub fn is_speaking(&self) -> bool {
        self.state.lock().unwrap().speaking
    }

    // -----------------------------------------------------------------------
    // Voice-flag bookkeeping (driven by the embedder's voice glue)
    // -----------------------------------------------------------------------

    pub fn set_listening(&self, listening: bool) {
        let mut s = self.state.lock().unwrap();
        if s.listening != listening {
            s.listening = listening;
            s.broadcast(SessionEvent::ListeningChanged(listening));
        }
    }

    pub fn set_speaking(&self, speaking: bool) {
        let mut s = self.state.lock().unwrap();
        if s.speaking != speaking {
            s.speaking = speaking;
            s.broadcast(SessionEvent::SpeakingChanged(speaking));
        }
    }

    // -----------------------------------------------------------------------
    // Subscription
    // -----------------------------------------------------------------------

    /// Subscribe to session state changes.
    ///
    /// Events are delivered in the order the mutations happen; multiple
    /// subscribers receive each event in subscription order.  Dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().unwrap().subscribers.push(tx);
        rx
    }
}

// ---------------------------------------------------------------------------
// Wire history
// ---------------------------------------------------------------------------

/// Map the display messages to wire turns.
///
/// System messages never travel as history (the persona block is carried
/// separately), and leading assistant turns are dropped: the welcome
/// message is presentation-only and the wire format requires the history to
/// open with a user turn.
fn wire_history(messages: &[Message]) -> Vec<Turn> {
    messages
        .iter()
        .filter_map(|m| match m.role {
            Role::User => Some(Turn::new(TurnRole::User, m.content.clone())),
            Role::Assistant => Some(Turn::new(TurnRole::Model, m.content.clone())),
            Role::System => None,
        })
        .skip_while(|turn| turn.role == TurnRole::Model)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
