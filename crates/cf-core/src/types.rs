//! Core type definitions for commentflow

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a top-level comment, as assigned by the comment platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub String);

impl CommentId {
    /// Create a CommentId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        CommentId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single reply inside a comment thread
///
/// Deletion is keyed by this id, never by the parent comment's id, because
/// one thread can carry several replies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(pub String);

impl ReplyId {
    /// Create a ReplyId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        ReplyId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the video a comment thread belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create a VideoId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        VideoId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one opened review dialog
///
/// A fresh id is minted every time a comment is opened, so a result that
/// arrives after the dialog was closed or re-opened can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewSessionId(pub Uuid);

impl ReviewSessionId {
    /// Generate a new ReviewSessionId
    pub fn new() -> Self {
        ReviewSessionId(Uuid::new_v4())
    }
}

impl Default for ReviewSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
