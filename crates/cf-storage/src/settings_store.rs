//! File system storage for AI settings

use cf_core::error::{CommentFlowError, Result};
use cf_core::settings::{AiSettings, SettingsFile, SettingsStorage};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SETTINGS_FILE: &str = "settings.toml";

/// Settings stored as a TOML file in a data directory
pub struct FileSystemStorage {
    /// Base directory for stored data
    base_dir: PathBuf,
}

impl FileSystemStorage {
    /// Create a new file system storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            base_dir: base_dir.into(),
        };
        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage in the user data directory (~/.commentflow as fallback)
    pub fn default_location() -> Result<Self> {
        let base_dir = directories::ProjectDirs::from("com", "commentflow", "commentflow")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".commentflow")
            });

        Self::new(base_dir)
    }

    fn ensure_dirs(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                CommentFlowError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", self.base_dir);
        }
        Ok(())
    }

    /// Path of the settings file
    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_dir.join(format!(".{}.tmp", SETTINGS_FILE))
    }

    /// Write settings atomically (write to temp, then rename)
    fn atomic_write(&self, settings: &AiSettings) -> Result<()> {
        let temp_path = self.temp_path();
        let final_path = self.settings_path();

        let content = toml::to_string_pretty(&SettingsFile::new(settings.clone()))
            .map_err(|e| CommentFlowError::Toml(e.to_string()))?;

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| {
            CommentFlowError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CommentFlowError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved settings to {:?}", final_path);
        Ok(())
    }

    fn read_settings(&self, path: &Path) -> Result<AiSettings> {
        let content = fs::read_to_string(path)?;
        let file: SettingsFile = toml::from_str(&content)
            .map_err(|e| CommentFlowError::Toml(e.to_string()))
            .map_err(|e| e.with_context(format!("Failed to parse {}", path.display())))?;
        let settings = file.into_settings()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl SettingsStorage for FileSystemStorage {
    fn load(&self) -> Result<Option<AiSettings>> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(None);
        }
        self.read_settings(&path).map(Some)
    }

    fn save(&self, settings: &AiSettings) -> Result<()> {
        self.ensure_dirs()?;
        self.atomic_write(settings)
    }

    fn clear(&self) -> Result<()> {
        let path = self.settings_path();
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Removed saved settings at {:?}", path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::settings::ReplyTone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileSystemStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(temp_dir.path().join("data")).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_storage_creation() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.base_dir().exists());
        assert!(storage.settings_path().ends_with("settings.toml"));
    }

    #[test]
    fn test_load_missing_is_none() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.load().unwrap().is_none());
        assert_eq!(storage.load_or_default().unwrap(), AiSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let (storage, _temp) = create_test_storage();
        let mut settings = AiSettings::default();
        settings.tone = ReplyTone::Casual;
        settings.max_reply_length = 280;
        settings.blacklist_words.add("giveaway");

        storage.save(&settings).unwrap();
        assert_eq!(storage.load().unwrap(), Some(settings));
    }

    #[test]
    fn test_atomic_write() {
        let (storage, _temp) = create_test_storage();
        storage.save(&AiSettings::default()).unwrap();

        assert!(!storage.temp_path().exists());
        let content = fs::read_to_string(storage.settings_path()).unwrap();
        assert!(content.contains("schema_version"));
        assert!(content.contains("click here"));
    }

    #[test]
    fn test_clear() {
        let (storage, _temp) = create_test_storage();
        storage.save(&AiSettings::default()).unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());

        // Clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn test_rejects_unknown_major_version() {
        let (storage, _temp) = create_test_storage();
        fs::write(
            storage.settings_path(),
            "schema_version = \"2.0\"\n\n[settings]\ntone = \"casual\"\n",
        )
        .unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, CommentFlowError::Config(_)));
    }

    #[test]
    fn test_rejects_out_of_range_length() {
        let (storage, _temp) = create_test_storage();
        fs::write(
            storage.settings_path(),
            "schema_version = \"1.0\"\n\n[settings]\nmax_reply_length = 20\n",
        )
        .unwrap();

        assert!(storage.load().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let (storage, _temp) = create_test_storage();
        fs::write(
            storage.settings_path(),
            "schema_version = \"1.0\"\n\n[settings]\nblacklist_words = [\"Promo\", \"promo\", \"  \"]\n",
        )
        .unwrap();

        let settings = storage.load().unwrap().unwrap();
        assert_eq!(settings.blacklist_words.words(), &["Promo"]);
        assert_eq!(settings.tone, ReplyTone::Friendly);
        assert!(settings.auto_reply_enabled);
    }

    #[test]
    fn test_garbage_file_is_a_toml_error() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.settings_path(), "not = [valid").unwrap();

        let err = storage.load().unwrap_err();
        assert!(err.to_string().contains("settings.toml"));
    }
}
