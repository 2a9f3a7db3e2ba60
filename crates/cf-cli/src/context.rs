//! Shared setup for commands: configuration, backend client, settings

use anyhow::{Context, Result};
use cf_core::comment::Comment;
use cf_core::config::Config;
use cf_core::lifecycle::ReplyLifecycleManager;
use cf_core::reply::PromptComposer;
use cf_core::settings::SettingsManager;
use cf_core::types::{CommentId, VideoId};
use cf_integration::HttpCommentService;
use cf_storage::FileSystemStorage;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default project configuration path
pub const CONFIG_PATH: &str = ".commentflow/config.toml";

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl GlobalOptions {
    /// Configuration file in effect
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        let mut config = if path.exists() {
            read_config(&path)?
        } else {
            if self.config.is_some() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            debug!("No configuration at {}, using defaults", path.display());
            Config::default()
        };

        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse a configuration file
pub fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Settings manager over the user data directory
pub fn settings_manager() -> Result<SettingsManager> {
    let storage = FileSystemStorage::default_location()?;
    debug!("Settings stored at {}", storage.settings_path().display());
    Ok(SettingsManager::load(storage)?)
}

/// Everything a network command needs
pub struct AppContext {
    pub config: Config,
    pub service: Arc<HttpCommentService>,
    pub lifecycle: ReplyLifecycleManager,
}

impl AppContext {
    /// Build the backend client and lifecycle manager
    pub fn new(options: &GlobalOptions) -> Result<Self> {
        let config = options.load_config()?;
        let service = Arc::new(HttpCommentService::new(&config.api)?);
        let settings = settings_manager()?.current().clone();

        let composer = PromptComposer::new(config.review.template_pool()?);
        let lifecycle = ReplyLifecycleManager::new(service.clone(), settings)
            .with_composer(composer)
            .with_classify_tone(config.review.classify_tone);

        Ok(Self {
            config,
            service,
            lifecycle,
        })
    }

    /// Load a video's comments into the lifecycle manager
    pub async fn load_comments(&self, video_id: &VideoId) -> Result<Vec<Comment>> {
        let spinner = spinner(format!("Loading comments for {}", video_id));
        let result = self.lifecycle.refresh(video_id).await;
        spinner.finish_and_clear();
        result.with_context(|| format!("Could not load comments for video {}", video_id))?;
        Ok(self.lifecycle.comments())
    }

    /// Load a video's comments and find one of them
    pub async fn load_comment(&self, video_id: &VideoId, comment_id: &CommentId) -> Result<Comment> {
        self.load_comments(video_id).await?;
        self.lifecycle
            .comment(comment_id)
            .with_context(|| format!("Comment {} not found on video {}", comment_id, video_id))
    }
}

/// Spinner shown while waiting on the backend
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
