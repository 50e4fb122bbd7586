//! Settings management command implementations

use flashgen_core::{
    load_settings, settings::SETTING_KEYS, update_setting, Settings, SettingsStore,
    TomlSettingsStore,
};

use crate::{cli::ConfigCommands, error::CliError};

/// Handle settings management operations
pub fn handle_config_command(
    store: &TomlSettingsStore,
    action: &ConfigCommands,
) -> Result<(), CliError> {
    match action {
        ConfigCommands::Show { json } => show_config(store, *json),
        ConfigCommands::Set { key, value } => set_config(store, key, value),
        ConfigCommands::Get { key } => get_config(store, key),
        ConfigCommands::Init => init_config(store),
        ConfigCommands::Path => {
            println!("{}", store.location());
            Ok(())
        }
    }
}

fn masked(settings: &Settings) -> Settings {
    let mut masked = settings.clone();
    masked.api_key = settings.masked_api_key();
    masked
}

/// Show current settings with the API key masked
fn show_config(store: &dyn SettingsStore, json: bool) -> Result<(), CliError> {
    let settings = masked(&load_settings(store)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    for key in SETTING_KEYS {
        println!("{key} = {}", settings.get(key)?);
    }
    Ok(())
}

fn set_config(store: &dyn SettingsStore, key: &str, value: &str) -> Result<(), CliError> {
    let mut settings = load_settings(store)?;
    update_setting(store, &mut settings, key, value)?;
    println!("Saved {key} to {}", store.location());
    Ok(())
}

fn get_config(store: &dyn SettingsStore, key: &str) -> Result<(), CliError> {
    let settings = load_settings(store)?;
    println!("{}", settings.get(key)?);
    Ok(())
}

/// Write the defaults, leaving an existing settings file untouched
fn init_config(store: &TomlSettingsStore) -> Result<(), CliError> {
    if store.path().exists() {
        println!("Settings already exist at {}", store.location());
        return Ok(());
    }

    store.save(&Settings::default())?;
    println!("Created {}", store.location());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store(dir: &TempDir) -> TomlSettingsStore {
        TomlSettingsStore::new(dir.path().join("settings.toml")).without_env()
    }

    #[test]
    fn test_set_persists_value() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        handle_config_command(
            &store,
            &ConfigCommands::Set {
                key: "deck_name".into(),
                value: "Spanish".into(),
            },
        )
        .unwrap();

        assert_eq!(load_settings(&store).unwrap().deck_name, "Spanish");
    }

    #[test]
    fn test_set_rejects_unknown_model() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        let err = handle_config_command(
            &store,
            &ConfigCommands::Set {
                key: "model_name".into(),
                value: "gpt-2".into(),
            },
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        handle_config_command(&store, &ConfigCommands::Init).unwrap();
        assert!(store.path().exists());

        update_setting(
            &store,
            &mut load_settings(&store).unwrap(),
            "api_key",
            "sk-keep",
        )
        .unwrap();
        handle_config_command(&store, &ConfigCommands::Init).unwrap();

        assert_eq!(load_settings(&store).unwrap().api_key, "sk-keep");
    }

    #[test]
    fn test_get_unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        assert!(handle_config_command(
            &store,
            &ConfigCommands::Get {
                key: "colour".into()
            }
        )
        .is_err());
    }

    #[test]
    fn test_masked_settings_hide_key() {
        let mut settings = Settings::default();
        settings.api_key = "sk-secret-9876".into();
        assert_eq!(masked(&settings).api_key, "**********9876");
    }
}
