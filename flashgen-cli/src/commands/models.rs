//! The `models` command

use flashgen_core::{load_settings, SettingsStore};
use flashgen_llm_sdk::models::openai::SUPPORTED_CHAT_MODELS;

use crate::error::CliError;

/// List supported models, marking the configured one
pub fn list_models(store: &dyn SettingsStore) -> Result<(), CliError> {
    let settings = load_settings(store)?;
    for (id, name) in SUPPORTED_CHAT_MODELS {
        let marker = if *id == settings.model_name { "*" } else { " " };
        println!("{marker} {id:<16} {name}");
    }
    Ok(())
}
