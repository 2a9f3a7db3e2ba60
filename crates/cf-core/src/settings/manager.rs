//! Settings manager: explicit, whole-object saves

use super::model::AiSettings;
use super::persistence::SettingsStorage;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Holds the saved settings and writes them back only on [`SettingsManager::save`]
///
/// Callers edit a copy obtained from [`SettingsManager::current`] and hand the
/// whole object back; there is no partial update or auto-save.
pub struct SettingsManager {
    /// Storage backend
    storage: Arc<dyn SettingsStorage>,
    /// Last saved settings
    current: AiSettings,
}

impl SettingsManager {
    /// Load settings from storage (defaults if none saved)
    pub fn load(storage: impl SettingsStorage + 'static) -> Result<Self> {
        Self::with_storage(Arc::new(storage))
    }

    /// Load settings from shared storage
    pub fn with_storage(storage: Arc<dyn SettingsStorage>) -> Result<Self> {
        let current = storage.load_or_default()?;
        current.validate()?;
        debug!("Loaded AI settings: tone={}, blacklist={} words", current.tone, current.blacklist_words.len());
        Ok(Self { storage, current })
    }

    /// The last saved settings
    pub fn current(&self) -> &AiSettings {
        &self.current
    }

    /// Validate and persist a full settings object
    pub fn save(&mut self, settings: AiSettings) -> Result<&AiSettings> {
        settings.validate()?;
        self.storage.save(&settings)?;
        self.current = settings;
        info!("AI settings saved");
        Ok(&self.current)
    }

    /// Drop saved settings and return to defaults
    pub fn reset(&mut self) -> Result<&AiSettings> {
        self.storage.clear()?;
        self.current = AiSettings::default();
        info!("AI settings reset to defaults");
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::persistence::memory::MemoryStorage;
    use crate::settings::ReplyTone;

    #[test]
    fn test_load_defaults_when_empty() {
        let manager = SettingsManager::load(MemoryStorage::new()).unwrap();
        assert_eq!(manager.current(), &AiSettings::default());
    }

    #[test]
    fn test_save_persists_whole_object() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = SettingsManager::with_storage(storage.clone()).unwrap();

        let mut edited = manager.current().clone();
        edited.tone = ReplyTone::Casual;
        edited.blacklist_words.add("giveaway");
        manager.save(edited.clone()).unwrap();

        assert_eq!(storage.load().unwrap(), Some(edited.clone()));
        let reloaded = SettingsManager::with_storage(storage).unwrap();
        assert_eq!(reloaded.current(), &edited);
    }

    #[test]
    fn test_invalid_save_changes_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = SettingsManager::with_storage(storage.clone()).unwrap();

        let mut edited = manager.current().clone();
        edited.tone = ReplyTone::Professional;
        edited.max_reply_length = 5000;

        assert!(manager.save(edited).is_err());
        assert_eq!(manager.current().tone, ReplyTone::Friendly);
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_edits_to_a_copy_are_not_saved() {
        let manager = SettingsManager::load(MemoryStorage::new()).unwrap();
        let mut copy = manager.current().clone();
        copy.auto_reply_enabled = false;
        assert!(manager.current().auto_reply_enabled);
    }

    #[test]
    fn test_reset() {
        let mut manager = SettingsManager::load(MemoryStorage::new()).unwrap();
        let mut edited = manager.current().clone();
        edited.spam_filter_enabled = false;
        manager.save(edited).unwrap();

        manager.reset().unwrap();
        assert!(manager.current().spam_filter_enabled);
    }
}
