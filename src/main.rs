//! Application entry point — terminal tutoring chat.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Detect the execution context and build the [`GeminiClient`]; exit
//!    with a clear message when the tutor is unavailable.
//! 4. Create the [`ConversationManager`] and print the welcome message.
//! 5. Read student turns from stdin until EOF or `/quit`.
//!
//! The terminal embedder has no speech backends, so the [`VoiceBridge`] is
//! constructed with both capabilities unsupported and voice controls are
//! reported as disabled.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Result};

use edubridge_tutor::capability::ExecutionContext;
use edubridge_tutor::config::AppConfig;
use edubridge_tutor::conversation::{ConversationContext, ConversationManager, Role};
use edubridge_tutor::llm::{GeminiClient, LlmError, PromptBuilder};
use edubridge_tutor::voice::VoiceBridge;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;
    let context = ExecutionContext::detect();

    let prompts = PromptBuilder::new();
    let persona = prompts.system_prompt(&ConversationContext::default());

    let model = match GeminiClient::from_config(&config.llm, persona, context) {
        Ok(client) => Arc::new(client),
        Err(LlmError::Unavailable(reason)) => {
            bail!("AI tutor is unavailable: {reason}. Set llm.api_key in settings.toml and run from a terminal.");
        }
        Err(err) => bail!("failed to initialise the AI tutor: {err}"),
    };

    let voice = VoiceBridge::unsupported(config.voice.clone());
    if !voice.is_speech_synthesis_supported() {
        println!("(voice features are disabled in the terminal)");
    }

    let manager = ConversationManager::new(model);
    print_last_assistant_reply(&manager);

    let stdin = std::io::stdin();
    let mut input = String::new();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line == "/quit" {
            break;
        }

        manager.send_message(line).await;
        print_last_assistant_reply(&manager);
    }

    Ok(())
}

/// Print the newest assistant message, if any.
fn print_last_assistant_reply(manager: &ConversationManager) {
    if let Some(message) = manager
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
    {
        println!("tutor> {}\n", message.content);
    }
}
