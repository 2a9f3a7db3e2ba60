//! Comment data models

use crate::error::{CommentFlowError, Result};
use crate::types::{CommentId, ReplyId, VideoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A top-level comment on one of the channel's videos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// External id of the top-level comment
    pub id: CommentId,
    /// Video the comment was posted on
    pub video_id: VideoId,
    /// Video title, when the feed provides it
    #[serde(default)]
    pub video_title: Option<String>,
    /// Display name of the commenter
    pub author_name: String,
    /// Avatar URL of the commenter
    #[serde(default)]
    pub author_avatar: Option<String>,
    /// Comment text as delivered by the feed (may contain markup)
    pub text: String,
    /// When the comment was published
    pub published_at: DateTime<Utc>,
    /// Like count at ingest time
    #[serde(default)]
    pub like_count: u64,
    /// Reply status
    #[serde(default)]
    status: CommentStatus,
    /// Text of the posted reply (set iff status is replied)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ai_reply: Option<String>,
    /// When the reply was posted (set iff status is replied)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replied_at: Option<DateTime<Utc>>,
    /// Replies nested under this comment
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    /// Create a pending comment with no replies
    pub fn new(
        id: CommentId,
        video_id: VideoId,
        author_name: impl Into<String>,
        text: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            video_id,
            video_title: None,
            author_name: author_name.into(),
            author_avatar: None,
            text: text.into(),
            published_at,
            like_count: 0,
            status: CommentStatus::Pending,
            ai_reply: None,
            replied_at: None,
            replies: Vec::new(),
        }
    }

    /// Current status
    pub fn status(&self) -> CommentStatus {
        self.status
    }

    /// Posted reply text, present only when replied
    pub fn ai_reply(&self) -> Option<&str> {
        self.ai_reply.as_deref()
    }

    /// Posted reply time, present only when replied
    pub fn replied_at(&self) -> Option<DateTime<Utc>> {
        self.replied_at
    }

    /// Record a posted reply
    pub fn mark_replied(&mut self, reply: impl Into<String>, at: DateTime<Utc>) {
        self.status = CommentStatus::Replied;
        self.ai_reply = Some(reply.into());
        self.replied_at = Some(at);
    }

    /// Move to a status other than replied, clearing reply fields
    ///
    /// Use [`Comment::mark_replied`] to enter the replied status.
    pub fn set_status(&mut self, status: CommentStatus) -> Result<()> {
        if status == CommentStatus::Replied {
            return Err(CommentFlowError::Validation(
                "replied status requires reply text; use mark_replied".to_string(),
            ));
        }
        self.status = status;
        self.ai_reply = None;
        self.replied_at = None;
        Ok(())
    }

    /// Remove one reply from the thread, leaving siblings and status alone
    pub fn remove_reply(&mut self, reply_id: &ReplyId) -> Option<Reply> {
        let pos = self.replies.iter().position(|r| &r.id == reply_id)?;
        Some(self.replies.remove(pos))
    }

    /// Find a reply by id
    pub fn reply(&self, reply_id: &ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|r| &r.id == reply_id)
    }

    /// Newest reply in the thread
    pub fn latest_reply(&self) -> Option<&Reply> {
        self.replies.iter().max_by_key(|r| r.published_at)
    }

    /// Whether the status/reply-field invariant holds
    pub fn is_consistent(&self) -> bool {
        let replied = self.status == CommentStatus::Replied;
        replied == self.ai_reply.is_some() && replied == self.replied_at.is_some()
    }
}

/// Reply status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    /// Waiting for a reply
    Pending,
    /// A reply has been posted
    Replied,
    /// The backend reported a failed reply attempt
    Failed,
    /// Excluded from auto-reply
    Skipped,
}

impl CommentStatus {
    /// Lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Replied => "replied",
            CommentStatus::Failed => "failed",
            CommentStatus::Skipped => "skipped",
        }
    }
}

impl Default for CommentStatus {
    fn default() -> Self {
        CommentStatus::Pending
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = CommentFlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(CommentStatus::Pending),
            "replied" => Ok(CommentStatus::Replied),
            "failed" => Ok(CommentStatus::Failed),
            "skipped" => Ok(CommentStatus::Skipped),
            other => Err(CommentFlowError::Validation(format!(
                "Unknown comment status: {}",
                other
            ))),
        }
    }
}

/// A reply nested under a top-level comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// External id of this reply
    pub id: ReplyId,
    /// Top-level comment this reply belongs to
    pub parent_id: CommentId,
    /// Display name of the replier
    pub author_name: String,
    /// Reply text
    pub text: String,
    /// When the reply was published
    pub published_at: DateTime<Utc>,
}

/// One comment thread as returned by the comment feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadedComment {
    /// The top-level comment; its status fields are ignored on ingest
    pub top_level: Comment,
    /// Replies in feed order
    #[serde(default)]
    pub replies: Vec<Reply>,
    /// Status the backend itself attached to the thread, if any
    #[serde(default)]
    pub reported_status: Option<CommentStatus>,
}

/// A channel video, used by summary views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Video id
    pub id: VideoId,
    /// Title
    pub title: String,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Publish time
    pub published_at: DateTime<Utc>,
    /// Number of comments
    #[serde(default)]
    pub comment_count: u64,
    /// Number of views
    #[serde(default)]
    pub view_count: u64,
}
