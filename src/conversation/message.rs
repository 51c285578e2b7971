//! Message and conversation-context value types.
//!
//! [`Message`] is append-only: the session only ever pushes new messages,
//! never edits or reorders existing ones, so insertion order is display
//! order.  [`ConversationContext`] is a sparse overlay of lesson fields;
//! absent fields are omitted from prompts entirely.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One turn of the tutoring dialogue as shown to the student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Opaque id, unique within a session (`msg-<seq>`).
    pub id: String,
    /// Who authored the message.
    pub role: Role,
    /// Display text (markdown is rendered elsewhere).
    pub content: String,
    /// Milliseconds since session start — monotonic within a session.
    pub timestamp_ms: u64,
    /// Synthesized-audio URL, when the message has been read aloud.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

// ---------------------------------------------------------------------------
// ConversationContext
// ---------------------------------------------------------------------------

/// Sparse lesson/course overlay injected into prompts.
///
/// All fields are optional; a field that is `None` contributes nothing to
/// any prompt (no empty placeholders).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub module_id: Option<String>,
    pub module_name: Option<String>,
    pub topic: Option<String>,
    pub user_level: Option<String>,
}

impl ConversationContext {
    /// Field-wise merge: fields present in `partial` overwrite, fields
    /// absent from `partial` are retained.
    pub fn merge(&mut self, partial: ConversationContext) {
        if partial.course_id.is_some() {
            self.course_id = partial.course_id;
        }
        if partial.course_name.is_some() {
            self.course_name = partial.course_name;
        }
        if partial.module_id.is_some() {
            self.module_id = partial.module_id;
        }
        if partial.module_name.is_some() {
            self.module_name = partial.module_name;
        }
        if partial.topic.is_some() {
            self.topic = partial.topic;
        }
        if partial.user_level.is_some() {
            self.user_level = partial.user_level;
        }
    }

    /// Reset every field to `None`.
    pub fn clear(&mut self) {
        *self = ConversationContext::default();
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == ConversationContext::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
