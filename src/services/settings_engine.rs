//! Sync settings persistence: loading, saving, and resetting the JSON
//! config file that selects mode, strategy, and matcher behavior.

use std::fs;
use std::path::Path;

use crate::types::errors::SyncError;
use crate::types::settings::SyncSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<SyncSettings, SyncError>;
    fn save(&self) -> Result<(), SyncError>;
    fn get_settings(&self) -> &SyncSettings;
    fn reset(&mut self) -> Result<(), SyncError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: SyncSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine backed by the given config file path.
    pub fn new(config_path: &str) -> Self {
        Self {
            config_path: config_path.to_string(),
            settings: SyncSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns an error.
    fn load(&mut self) -> Result<SyncSettings, SyncError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = SyncSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SyncError::StorageError(format!("Failed to read config file: {}", e)))?;

        let settings: SyncSettings = serde_json::from_str(&content).map_err(|e| {
            SyncError::ConflictUnresolved(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SyncError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SyncError::StorageError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SyncError::ConflictUnresolved(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SyncError::StorageError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Resets settings to defaults and persists them.
    fn reset(&mut self) -> Result<(), SyncError> {
        self.settings = SyncSettings::default();
        self.save()
    }

    /// Returns the config file path.
    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
