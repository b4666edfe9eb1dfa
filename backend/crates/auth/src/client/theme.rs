//! Theme preference persisted in client storage

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::storage::ClientStorage;

pub const THEME_STORAGE_KEY: &str = "gospl-ui-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// Stored preference; missing, invalid or unreadable values give the default
    pub fn load(storage: &dyn ClientStorage) -> Self {
        match storage.get_item(THEME_STORAGE_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_default(),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::debug!(error = %e, "Theme preference unreadable");
                Self::default()
            }
        }
    }

    /// Persist the preference; storage failures are not fatal
    pub fn save(self, storage: &dyn ClientStorage) {
        if let Err(e) = storage.set_item(THEME_STORAGE_KEY, self.as_str()) {
            tracing::debug!(error = %e, "Theme preference not persisted");
        }
    }

    /// Concrete class to apply (`light` or `dark`)
    pub fn resolve(self, system_prefers_dark: bool) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System if system_prefers_dark => "dark",
            ThemePreference::System => "light",
        }
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}
