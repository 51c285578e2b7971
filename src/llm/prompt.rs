//! Prompt builder for the tutoring dialogue.
//!
//! [`PromptBuilder`] produces every piece of text the model sees (and the
//! synthesized welcome message the student sees first):
//!
//! * **Persona block** (`system_prompt`) — fixed tutoring-behaviour
//!   guidelines, plus one contextual line per present context field.
//! * **Turn enrichment** (`enhance_with_context`) — prefixes the student's
//!   question with the lesson context in a fixed, stable format.
//! * **Quick actions** — canned prompts for explain / example / practice /
//!   summary / study-tips requests.
//!
//! The contextual ordering (course, module, topic, level) is a hard
//! contract: model steering depends on stable formatting.  Note the
//! asymmetry: `user_level` appears in the persona block but never in the
//! per-turn enrichment.

use crate::conversation::ConversationContext;

// ---------------------------------------------------------------------------
// Persona instructions
// ---------------------------------------------------------------------------

/// Fixed tutoring persona — identical for every session.
const PERSONA_INSTRUCTION: &str = "\
You are an expert AI tutor named \"EduBridge AI Assistant\". Your role is to help students learn effectively through:

1. Clear, patient explanations tailored to the student's level
2. Breaking down complex topics into simple, digestible parts
3. Using examples, analogies, and real-world applications
4. Asking questions to check understanding
5. Providing encouragement and positive reinforcement
6. Adapting your teaching style based on student responses

Guidelines:
- Be warm, friendly, and encouraging
- Use simple language and avoid jargon unless necessary
- Provide step-by-step explanations
- Check for understanding before moving forward
- Offer multiple ways to explain the same concept
- Celebrate progress and effort
- Be patient with mistakes and use them as learning opportunities";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Deterministic formatter for persona, welcome and per-turn prompts.
///
/// # Example
/// ```rust
/// use edubridge_tutor::conversation::ConversationContext;
/// use edubridge_tutor::llm::PromptBuilder;
///
/// let builder = PromptBuilder::new();
/// let ctx = ConversationContext {
///     course_name: Some("Rust Basics".into()),
///     ..ConversationContext::default()
/// };
/// let prompt = builder.enhance_with_context(&ctx, "What is ownership?");
/// assert!(prompt.starts_with("Context: Course: Rust Basics. "));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// The persona block plus one line per present context field, in fixed
    /// order: course, module, topic, level.  Absent fields contribute no
    /// line (never an empty placeholder).
    pub fn system_prompt(&self, context: &ConversationContext) -> String {
        let mut prompt = String::from(PERSONA_INSTRUCTION);

        if let Some(course) = &context.course_name {
            prompt.push_str(&format!("\n\nCurrent Course: {course}"));
        }
        if let Some(module) = &context.module_name {
            prompt.push_str(&format!("\nCurrent Module: {module}"));
        }
        if let Some(topic) = &context.topic {
            prompt.push_str(&format!("\nCurrent Topic: {topic}"));
        }
        if let Some(level) = &context.user_level {
            prompt.push_str(&format!("\nStudent Level: {level}"));
        }

        prompt
    }

    /// Enrich one student turn with the lesson context.
    ///
    /// When none of course / module / topic is set, the prompt is exactly
    /// `user_text` unchanged.  Otherwise:
    ///
    /// ```text
    /// Context: Course: <c>. Module: <m>. Topic: <t>. \n\nStudent Question: <user_text>
    /// ```
    ///
    /// with absent fields contributing no fragment.  `user_level` is used
    /// only in the persona block, never here.
    pub fn enhance_with_context(&self, context: &ConversationContext, user_text: &str) -> String {
        if context.course_name.is_none()
            && context.module_name.is_none()
            && context.topic.is_none()
        {
            return user_text.to_string();
        }

        let mut prompt = String::from("Context: ");
        if let Some(course) = &context.course_name {
            prompt.push_str(&format!("Course: {course}. "));
        }
        if let Some(module) = &context.module_name {
            prompt.push_str(&format!("Module: {module}. "));
        }
        if let Some(topic) = &context.topic {
            prompt.push_str(&format!("Topic: {topic}. "));
        }
        prompt.push_str(&format!("\n\nStudent Question: {user_text}"));
        prompt
    }

    /// Welcome text for a fresh session: course-scoped when the context
    /// carries a course name, generic otherwise.
    pub fn welcome_message(&self, context: &ConversationContext) -> String {
        if let Some(course) = &context.course_name {
            return format!(
                "👋 Hello! I'm your AI tutor for **{course}**. I'm here to help you master this subject!\n\n\
                 What would you like to learn today? Feel free to:\n\
                 - Ask me to explain any concept\n\
                 - Request examples or practice problems\n\
                 - Clarify doubts\n\
                 - Get study tips\n\n\
                 You can type or use voice to talk to me. Let's make learning fun! 🎓"
            );
        }

        "👋 Hello! I'm your EduBridge AI Tutor. I'm here to help you learn anything you want!\n\n\
         How can I assist you today? You can:\n\
         - Ask me to explain topics\n\
         - Request examples\n\
         - Practice with problems\n\
         - Get study guidance\n\n\
         Use text or voice - I'm ready to help! 🚀"
            .to_string()
    }

    // -----------------------------------------------------------------------
    // Quick-action prompts
    // -----------------------------------------------------------------------

    /// "Explain this concept" at a given difficulty level.
    pub fn explain_concept(&self, concept: &str, level: &str) -> String {
        format!(
            "Please explain \"{concept}\" in a {level} level. Use simple language, examples, and analogies to make it clear."
        )
    }

    /// "Show me an example" of a topic.
    pub fn ask_for_example(&self, topic: &str) -> String {
        format!(
            "Can you provide a practical example of {topic}? Include code or real-world scenarios if applicable."
        )
    }

    /// "Give me practice" on a topic.
    pub fn request_practice(&self, topic: &str) -> String {
        format!(
            "Can you give me a practice problem or exercise about {topic}? After I answer, please provide feedback."
        )
    }

    /// "Summarize key points" of a topic.
    pub fn summary(&self, topic: &str) -> String {
        format!("Please provide a concise summary of the key points about {topic}.")
    }

    /// "Study tips" for a topic.
    pub fn study_tips(&self, topic: &str) -> String {
        format!("What are the best strategies and tips for learning {topic} effectively?")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
