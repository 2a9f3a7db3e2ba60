//! External collaborator interface
//!
//! Everything the core needs from the outside world goes through
//! [`CommentService`]. Transport is an implementation concern; the HTTP
//! binding lives in `cf-integration`.

use crate::comment::{ThreadedComment, Video};
use crate::error::Result;
use crate::reply::GenerationRequest;
use crate::stats::{DashboardStats, WeeklyPoint};
use crate::types::{CommentId, ReplyId, VideoId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text returned by the reply generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedReply {
    /// Suggested reply
    pub reply: String,
}

/// Comment platform and generation service, as seen by the core
///
/// Implementations perform exactly one request per call: no retries and no
/// caching.
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Fetch the comment threads (top-level comment plus replies) of a video
    async fn fetch_comments(&self, video_id: &VideoId) -> Result<Vec<ThreadedComment>>;

    /// Ask the generation service for a reply suggestion
    async fn generate_reply(&self, request: &GenerationRequest) -> Result<GeneratedReply>;

    /// Post a reply under a top-level comment
    async fn submit_reply(&self, comment_id: &CommentId, text: &str) -> Result<()>;

    /// Delete one posted reply
    async fn delete_reply(&self, reply_id: &ReplyId) -> Result<()>;

    /// List the channel's most recent videos
    async fn fetch_videos(&self, max_results: u32) -> Result<Vec<Video>>;

    /// Channel-level stats as computed by the backend
    async fn fetch_stats(&self) -> Result<DashboardStats>;

    /// Per-day comment and reply counts as computed by the backend
    async fn fetch_weekly_stats(&self) -> Result<Vec<WeeklyPoint>>;
}
