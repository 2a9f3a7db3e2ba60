//! AI reply settings

use crate::comment::ReplyValidator;
use crate::error::{CommentFlowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Allowed values of `max_reply_length`
pub const MAX_REPLY_LENGTH_RANGE: RangeInclusive<usize> = 100..=1000;

/// Default `max_reply_length`
pub const DEFAULT_MAX_REPLY_LENGTH: usize = 500;

/// Schema version written into settings files
pub const SETTINGS_SCHEMA_VERSION: &str = "1.0";

/// Channel-wide reply tone, used when comments are not classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyTone {
    Friendly,
    Professional,
    Casual,
}

impl ReplyTone {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyTone::Friendly => "friendly",
            ReplyTone::Professional => "professional",
            ReplyTone::Casual => "casual",
        }
    }
}

impl Default for ReplyTone {
    fn default() -> Self {
        ReplyTone::Friendly
    }
}

impl fmt::Display for ReplyTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyTone {
    type Err = CommentFlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "friendly" => Ok(ReplyTone::Friendly),
            "professional" => Ok(ReplyTone::Professional),
            "casual" => Ok(ReplyTone::Casual),
            other => Err(CommentFlowError::Validation(format!(
                "Unknown reply tone: {} (expected friendly, professional or casual)",
                other
            ))),
        }
    }
}

/// Ordered set of blacklisted substrings
///
/// Entries are trimmed, never empty, and unique ignoring case. The first
/// spelling added is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Blacklist {
    words: Vec<String>,
}

impl Blacklist {
    /// Create an empty blacklist
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word; returns false if it was empty or already present
    pub fn add(&mut self, word: impl AsRef<str>) -> bool {
        let word = word.as_ref().trim();
        if word.is_empty() || self.contains(word) {
            return false;
        }
        self.words.push(word.to_string());
        true
    }

    /// Remove a word, ignoring case; returns false if it was absent
    pub fn remove(&mut self, word: &str) -> bool {
        let needle = word.trim().to_lowercase();
        let before = self.words.len();
        self.words.retain(|w| w.to_lowercase() != needle);
        self.words.len() != before
    }

    /// Whether the word is present, ignoring case
    pub fn contains(&self, word: &str) -> bool {
        let needle = word.trim().to_lowercase();
        self.words.iter().any(|w| w.to_lowercase() == needle)
    }

    /// Words in insertion order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Blacklist::new();
        for word in iter {
            list.add(word);
        }
        list
    }
}

impl<'a> IntoIterator for &'a Blacklist {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

// Deserialize through `add` so hand-edited files cannot break the set rules.
impl<'de> Deserialize<'de> for Blacklist {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let words = Vec::<String>::deserialize(deserializer)?;
        Ok(words.into_iter().collect())
    }
}

/// Channel owner's AI reply settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Tone used when per-comment classification is off
    pub tone: ReplyTone,
    /// Whether the auto-reply sweep may post replies
    pub auto_reply_enabled: bool,
    /// Whether blacklisted comments are refused
    pub spam_filter_enabled: bool,
    /// Blacklisted substrings
    pub blacklist_words: Blacklist,
    /// Longest reply that may be submitted, in characters
    pub max_reply_length: usize,
}

impl AiSettings {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        ReplyValidator::validate_max_length(self.max_reply_length)
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            tone: ReplyTone::Friendly,
            auto_reply_enabled: true,
            spam_filter_enabled: true,
            blacklist_words: ["spam", "scam", "fake", "click here"].into_iter().collect(),
            max_reply_length: DEFAULT_MAX_REPLY_LENGTH,
        }
    }
}

/// On-disk envelope for settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Schema version of the file
    pub schema_version: String,
    /// The settings
    pub settings: AiSettings,
}

impl SettingsFile {
    /// Wrap settings with the current schema version
    pub fn new(settings: AiSettings) -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION.to_string(),
            settings,
        }
    }

    /// Unwrap, refusing files from an incompatible major version
    pub fn into_settings(self) -> Result<AiSettings> {
        let major = self.schema_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(CommentFlowError::Config(format!(
                "Unsupported settings schema version: {}",
                self.schema_version
            )));
        }
        Ok(self.settings)
    }
}
