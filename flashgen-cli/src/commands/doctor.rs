//! The `doctor` command: quick checks before a first run

use flashgen_core::{load_settings, AnkiConnectClient, SettingsStore};
use flashgen_llm_sdk::models::openai;

use crate::error::CliError;

pub async fn run_doctor(store: &dyn SettingsStore) -> Result<(), CliError> {
    let settings = load_settings(store)?;
    println!("Settings:   {}", store.location());

    if settings.has_api_key() {
        println!("API key:    {}", settings.masked_api_key());
    } else {
        println!("API key:    not set (run `flashgen config set api_key <key>`)");
    }

    println!(
        "Model:      {} ({})",
        settings.model_name,
        openai::display_name(&settings.model_name).unwrap_or("unknown")
    );
    println!("Deck:       {}", settings.deck_name);

    let client = AnkiConnectClient::new(settings.anki_connect_url.clone());
    match client.version().await {
        Ok(version) => {
            println!("AnkiConnect: reachable at {} (version {})", client.url(), version);
            Ok(())
        }
        Err(e) => Err(CliError::Communication(e.to_string())),
    }
}
