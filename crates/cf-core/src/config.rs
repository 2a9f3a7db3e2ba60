//! Configuration management for commentflow

use crate::error::{CommentFlowError, Result};
use crate::reply::prompt::TemplatePool;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API settings
    pub api: ApiConfig,
    /// Review and generation settings
    pub review: ReviewConfig,
}

impl Config {
    /// Check cross-field constraints that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CommentFlowError::Config(
                "api.base_url cannot be empty".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(CommentFlowError::Config(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.review.template_pool()?;
        Ok(())
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the dashboard backend
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Session cookie identifying the authenticated channel owner
    pub session_cookie: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            session_cookie: None,
        }
    }
}

/// Review-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Classify each comment's tone instead of using the settings tone
    pub classify_tone: bool,
    /// Custom prompt templates; empty means the built-in pool
    pub templates: Vec<String>,
    /// Number of videos requested for summary views
    pub video_max_results: u32,
}

impl ReviewConfig {
    /// Build the template pool this configuration describes
    pub fn template_pool(&self) -> Result<TemplatePool> {
        if self.templates.is_empty() {
            Ok(TemplatePool::default())
        } else {
            TemplatePool::new(self.templates.clone())
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            classify_tone: true,
            templates: Vec::new(),
            video_max_results: 10,
        }
    }
}
