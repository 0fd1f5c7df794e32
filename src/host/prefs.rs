use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::HostError;
use crate::config::Theme;

/// Durable storage for the user's theme choice.
pub trait PrefsStore {
    /// `None` when nothing has been stored yet, or the store is unreadable.
    fn load_theme(&self) -> Option<Theme>;

    /// # Errors
    /// Returns [`HostError::Prefs`] if the value cannot be persisted.
    fn store_theme(&mut self, theme: Theme) -> Result<(), HostError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

/// Preferences kept in a small JSON file.
#[derive(Debug, Clone)]
pub struct JsonPrefs {
    path: PathBuf,
}

impl JsonPrefs {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Option<Prefs> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(prefs) => Some(prefs),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable prefs");
                None
            }
        }
    }
}

impl PrefsStore for JsonPrefs {
    fn load_theme(&self) -> Option<Theme> {
        self.read()?.theme
    }

    fn store_theme(&mut self, theme: Theme) -> Result<(), HostError> {
        let mut prefs = self.read().unwrap_or_default();
        prefs.theme = Some(theme);
        let json =
            serde_json::to_string_pretty(&prefs).map_err(|err| HostError::Prefs(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }
}
