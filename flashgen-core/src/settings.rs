//! User settings and their defaults.
//!
//! Settings are stored as a flat TOML table. A loaded file may omit any
//! field; [`Settings::merged`] fills the gaps so the rest of the crate never
//! sees a missing value.

use flashgen_llm_sdk::models::openai;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DECK_NAME: &str = "Generated Flashcards";
pub const DEFAULT_ANKI_CONNECT_URL: &str = "http://127.0.0.1:8765";
pub const DEFAULT_OPENAI_BASE_URL: &str = flashgen_llm_sdk::openai::client::DEFAULT_BASE_URL;

/// Prompt template used when none is configured
pub const DEFAULT_PROMPT: &str = "Create concise question-and-answer flashcards that cover the key facts \
and ideas in the text. Write every flashcard as `Front: <question> || Back: <answer>`. \
Separate flashcards with a line containing only =======. \
Do not number the flashcards and do not add any other text.";

/// Keys accepted by [`Settings::get`] and [`Settings::set`]
pub const SETTING_KEYS: &[&str] = &[
    "api_key",
    "deck_name",
    "model_name",
    "prompt",
    "anki_connect_url",
    "openai_base_url",
];

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to write settings to {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown setting '{0}'. Valid keys: {keys}", keys = SETTING_KEYS.join(", "))]
    UnknownKey(String),

    #[error("Unsupported model '{0}'. Run `flashgen models` to list supported models")]
    UnsupportedModel(String),
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub deck_name: String,
    pub model_name: String,
    pub prompt: String,
    pub anki_connect_url: String,
    pub openai_base_url: String,
}

/// Settings as read from storage; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    pub api_key: Option<String>,
    pub deck_name: Option<String>,
    pub model_name: Option<String>,
    pub prompt: Option<String>,
    pub anki_connect_url: Option<String>,
    pub openai_base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            deck_name: DEFAULT_DECK_NAME.to_string(),
            model_name: openai::DEFAULT_CHAT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            anki_connect_url: DEFAULT_ANKI_CONNECT_URL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Merge a partial load over the defaults.
    ///
    /// Blank strings count as missing. An unsupported model name falls back
    /// to the default model.
    pub fn merged(partial: PartialSettings) -> Self {
        let defaults = Self::default();

        let model_name = match non_blank(partial.model_name) {
            Some(model) if openai::is_supported_chat_model(&model) => model,
            Some(model) => {
                tracing::warn!(
                    "Unsupported model '{}' in settings, using '{}'",
                    model,
                    defaults.model_name
                );
                defaults.model_name
            }
            None => defaults.model_name,
        };

        Self {
            api_key: partial.api_key.map(|k| k.trim().to_string()).unwrap_or_default(),
            deck_name: non_blank(partial.deck_name).unwrap_or(defaults.deck_name),
            model_name,
            prompt: non_blank(partial.prompt).unwrap_or(defaults.prompt),
            anki_connect_url: non_blank(partial.anki_connect_url)
                .unwrap_or(defaults.anki_connect_url),
            openai_base_url: non_blank(partial.openai_base_url)
                .unwrap_or(defaults.openai_base_url),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Prompt template to send, falling back to [`DEFAULT_PROMPT`] when blank
    pub fn effective_prompt(&self) -> &str {
        if self.prompt.trim().is_empty() {
            DEFAULT_PROMPT
        } else {
            &self.prompt
        }
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return "(not set)".to_string();
        }
        let chars: Vec<char> = key.chars().collect();
        let visible = chars.len().min(4);
        let tail: String = chars[chars.len() - visible..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - visible), tail)
    }

    pub fn get(&self, key: &str) -> Result<&str, SettingsError> {
        match key {
            "api_key" => Ok(&self.api_key),
            "deck_name" => Ok(&self.deck_name),
            "model_name" => Ok(&self.model_name),
            "prompt" => Ok(&self.prompt),
            "anki_connect_url" => Ok(&self.anki_connect_url),
            "openai_base_url" => Ok(&self.openai_base_url),
            _ => Err(SettingsError::UnknownKey(key.to_string())),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value = value.to_string();
        match key {
            "api_key" => self.api_key = value.trim().to_string(),
            "deck_name" => self.deck_name = value,
            "model_name" => {
                if !openai::is_supported_chat_model(&value) {
                    return Err(SettingsError::UnsupportedModel(value));
                }
                self.model_name = value;
            }
            "prompt" => self.prompt = value,
            "anki_connect_url" => self.anki_connect_url = value,
            "openai_base_url" => self.openai_base_url = value,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

impl From<&Settings> for PartialSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            api_key: Some(settings.api_key.clone()),
            deck_name: Some(settings.deck_name.clone()),
            model_name: Some(settings.model_name.clone()),
            prompt: Some(settings.prompt.clone()),
            anki_connect_url: Some(settings.anki_connect_url.clone()),
            openai_base_url: Some(settings.openai_base_url.clone()),
        }
    }
}
