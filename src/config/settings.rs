//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the tutoring language model.
///
/// The generation tuple (`temperature` / `top_k` / `top_p` /
/// `max_output_tokens`) is fixed at client construction so every turn of a
/// session speaks with the same tutoring voice; callers cannot override it
/// per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the model endpoint — `None` disables the tutor entirely.
    pub api_key: Option<String>,
    /// Base URL of the API endpoint.
    pub base_url: String,
    /// Model identifier (e.g. `"gemini-1.5-flash"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Top-p (nucleus) sampling cutoff.
    pub top_p: f32,
    /// Maximum completion length in tokens.
    pub max_output_tokens: u32,
    /// Maximum seconds to wait for a completion before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig
// ---------------------------------------------------------------------------

/// Default utterance parameters for speech synthesis and the chunking
/// budget for long-content read-aloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// BCP-47 language tag used for synthesis and recognition.
    pub language: String,
    /// Speech rate multiplier (1.0 = normal).
    pub rate: f32,
    /// Voice pitch multiplier (1.0 = normal).
    pub pitch: f32,
    /// Output volume (0.0 – 1.0).
    pub volume: f32,
    /// Named platform voice — `None` means the platform default.
    pub voice: Option<String>,
    /// Maximum characters per synthesis chunk when reading long content.
    pub max_chunk_chars: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: "en-US".into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice: None,
            max_chunk_chars: 200,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use edubridge_tutor::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model settings.
    pub llm: LlmConfig,
    /// Voice synthesis / recognition settings.
    pub voice: VoiceConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
