//! Course data consumed from the course service.
//!
//! Only the subset the tutor cares about: identity, difficulty level, and
//! the voice / AI-tutor gates.  List screens and the full course record
//! live elsewhere.

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationContext;

// ---------------------------------------------------------------------------
// CourseLevel
// ---------------------------------------------------------------------------

/// Course difficulty as reported by the course service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl CourseLevel {
    /// Lowercase label used for the `user_level` context field.
    pub fn label(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
            CourseLevel::Expert => "expert",
        }
    }
}

// ---------------------------------------------------------------------------
// CourseSummary
// ---------------------------------------------------------------------------

/// The slice of a course record the tutoring core consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub level: CourseLevel,
    /// Whether the AI tutor is enabled for this course.
    pub ai_tutor_enabled: bool,
    /// Whether voice read-aloud is enabled for this course.
    pub voice_enabled: bool,
    /// BCP-47 tag for the course's voice channel.
    #[serde(default)]
    pub voice_language: Option<String>,
}

impl From<&CourseSummary> for ConversationContext {
    /// Seed a conversation context from a course record.
    fn from(course: &CourseSummary) -> Self {
        ConversationContext {
            course_id: Some(course.id.clone()),
            course_name: Some(course.title.clone()),
            user_level: Some(course.level.label().to_string()),
            ..ConversationContext::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiEnvelope;

    const COURSE_JSON: &str = r#"{
        "success": true,
        "message": "OK",
        "data": {
            "id": "course-42",
            "title": "Rust Basics",
            "level": "BEGINNER",
            "aiTutorEnabled": true,
            "voiceEnabled": true,
            "voiceLanguage": "en-US"
        }
    }"#;

    #[test]
    fn course_decodes_from_envelope() {
        let envelope: ApiEnvelope<CourseSummary> = serde_json::from_str(COURSE_JSON).unwrap();
        let course = envelope.into_result().unwrap();

        assert_eq!(course.id, "course-42");
        assert_eq!(course.level, CourseLevel::Beginner);
        assert!(course.ai_tutor_enabled);
        assert_eq!(course.voice_language.as_deref(), Some("en-US"));
    }

    #[test]
    fn course_seeds_conversation_context() {
        let envelope: ApiEnvelope<CourseSummary> = serde_json::from_str(COURSE_JSON).unwrap();
        let course = envelope.into_result().unwrap();

        let ctx = ConversationContext::from(&course);
        assert_eq!(ctx.course_id.as_deref(), Some("course-42"));
        assert_eq!(ctx.course_name.as_deref(), Some("Rust Basics"));
        assert_eq!(ctx.user_level.as_deref(), Some("beginner"));
        assert!(ctx.module_id.is_none());
        assert!(ctx.topic.is_none());
    }

    #[test]
    fn level_wire_values_are_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&CourseLevel::Advanced).unwrap(),
            "\"ADVANCED\""
        );
        let level: CourseLevel = serde_json::from_str("\"EXPERT\"").unwrap();
        assert_eq!(level, CourseLevel::Expert);
    }
}
