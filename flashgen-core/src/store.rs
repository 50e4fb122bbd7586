//! Settings persistence.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use config::{Config, Environment, File, FileFormat};

use crate::settings::{PartialSettings, Settings, SettingsError};

/// Prefix for environment variables that override stored settings,
/// e.g. `FLASHGEN_API_KEY`
pub const ENV_PREFIX: &str = "FLASHGEN";

/// Loads and saves settings on behalf of the host
pub trait SettingsStore: Send + Sync {
    /// Read whatever is stored; missing fields stay `None`
    fn load(&self) -> Result<PartialSettings, SettingsError>;

    /// Read only what is persisted, without runtime overrides
    fn load_persisted(&self) -> Result<PartialSettings, SettingsError> {
        self.load()
    }

    /// Persist the complete settings
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;

    /// Human-readable location of the stored settings
    fn location(&self) -> String;
}

/// Settings stored in a TOML file, with `FLASHGEN_*` environment overrides
pub struct TomlSettingsStore {
    path: PathBuf,
    env_prefix: Option<String>,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_prefix: Some(ENV_PREFIX.to_string()),
        }
    }

    /// Store at the platform config directory (`<config_dir>/flashgen/settings.toml`)
    pub fn at_default_location() -> Self {
        Self::new(default_settings_path())
    }

    /// Ignore environment overrides
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, env_prefix: Option<&str>) -> Result<PartialSettings, SettingsError> {
        let mut builder = Config::builder().add_source(
            File::from(self.path.clone())
                .format(FileFormat::Toml)
                .required(false),
        );

        if let Some(prefix) = env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix));
        }

        let partial: PartialSettings = builder.build()?.try_deserialize()?;
        tracing::debug!("Loaded settings from {}", self.path.display());
        Ok(partial)
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<PartialSettings, SettingsError> {
        self.read(self.env_prefix.as_deref())
    }

    fn load_persisted(&self) -> Result<PartialSettings, SettingsError> {
        self.read(None)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let contents = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, contents).map_err(io_error)?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store, for embedding and tests
#[derive(Default)]
pub struct MemorySettingsStore {
    stored: Mutex<PartialSettings>,
}

impl MemorySettingsStore {
    pub fn new(initial: PartialSettings) -> Self {
        Self {
            stored: Mutex::new(initial),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<PartialSettings, SettingsError> {
        Ok(self
            .stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self
            .stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = PartialSettings::from(settings);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Load stored settings and merge them over the defaults
pub fn load_settings(store: &dyn SettingsStore) -> Result<Settings, SettingsError> {
    Ok(Settings::merged(store.load()?))
}

/// Change one setting and persist the result immediately.
///
/// Only the persisted values plus the change are written back; environment
/// overrides present in `settings` stay out of the file.
pub fn update_setting(
    store: &dyn SettingsStore,
    settings: &mut Settings,
    key: &str,
    value: &str,
) -> Result<(), SettingsError> {
    let mut persisted = Settings::merged(store.load_persisted()?);
    persisted.set(key, value)?;
    store.save(&persisted)?;
    settings.set(key, value)?;
    tracing::info!("Updated setting '{}'", key);
    Ok(())
}

fn default_settings_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("flashgen/settings.toml")
    } else {
        PathBuf::from("flashgen.toml")
    }
}
