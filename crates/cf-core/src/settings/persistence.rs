//! Settings storage trait and abstractions

use super::model::AiSettings;
use crate::error::Result;

/// Trait for settings storage implementations
pub trait SettingsStorage: Send + Sync {
    /// Load saved settings, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<AiSettings>>;

    /// Save settings, replacing whatever was stored
    fn save(&self, settings: &AiSettings) -> Result<()>;

    /// Remove saved settings
    fn clear(&self) -> Result<()>;

    /// Load saved settings or fall back to defaults
    fn load_or_default(&self) -> Result<AiSettings> {
        Ok(self.load()?.unwrap_or_default())
    }
}
