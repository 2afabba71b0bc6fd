use crate::hotkey::{parse_hotkey, Hotkey};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SETTINGS_FILE: &str = "config.json";
pub const DEFAULT_SHORTCUT: &str = "]";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Key combination that starts and stops the stopwatch, both in the
    /// window and globally.
    #[serde(default = "default_shortcut")]
    pub register_shortcut: String,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_shortcut() -> String {
    DEFAULT_SHORTCUT.into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            register_shortcut: default_shortcut(),
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!("using default settings, {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn hotkey(&self) -> Hotkey {
        match parse_hotkey(&self.register_shortcut) {
            Some(k) => k,
            None => {
                tracing::warn!(
                    "provided shortcut string '{}' is invalid; using default {}",
                    self.register_shortcut,
                    DEFAULT_SHORTCUT
                );
                Hotkey::default()
            }
        }
    }
}
