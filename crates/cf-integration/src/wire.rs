//! Wire format of the dashboard backend
//!
//! The backend relays the video platform's list responses mostly untouched,
//! so these types mirror its camelCase `items`/`snippet` nesting and convert
//! into core types at the edge.

use cf_core::comment::{Comment, CommentStatus, Reply, ThreadedComment, Video};
use cf_core::types::{CommentId, ReplyId, VideoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `GET /youtube/comments/{videoId}` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadList {
    #[serde(default)]
    pub items: Vec<CommentThreadItem>,
    /// Set when the video has comments turned off
    #[serde(default)]
    pub comments_disabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadItem {
    pub id: String,
    pub snippet: ThreadSnippet,
    #[serde(default)]
    pub replies: Option<ReplyList>,
    /// Status the backend attached to the thread, if it tracks one
    #[serde(default)]
    pub status: Option<CommentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSnippet {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_title: Option<String>,
    pub top_level_comment: WireComment,
    #[serde(default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyList {
    #[serde(default)]
    pub comments: Vec<WireComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireComment {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: String,
    #[serde(default)]
    pub author_profile_image_url: Option<String>,
    pub text_display: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u64,
}

impl CommentThreadItem {
    /// Convert into a core thread; `video_id` is used when the item omits it
    pub fn into_threaded(self, video_id: &VideoId) -> ThreadedComment {
        let snippet = self.snippet;
        let top = snippet.top_level_comment;
        let parent_id = CommentId::from_string(top.id);
        let video_id = snippet
            .video_id
            .map(VideoId::from_string)
            .unwrap_or_else(|| video_id.clone());

        let mut comment = Comment::new(
            parent_id.clone(),
            video_id,
            top.snippet.author_display_name,
            top.snippet.text_display,
            top.snippet.published_at,
        );
        comment.video_title = snippet.video_title;
        comment.author_avatar = top.snippet.author_profile_image_url;
        comment.like_count = top.snippet.like_count;

        let replies = self
            .replies
            .map(|list| list.comments)
            .unwrap_or_default()
            .into_iter()
            .map(|reply| Reply {
                id: ReplyId::from_string(reply.id),
                parent_id: parent_id.clone(),
                author_name: reply.snippet.author_display_name,
                text: reply.snippet.text_display,
                published_at: reply.snippet.published_at,
            })
            .collect();

        ThreadedComment {
            top_level: comment,
            replies,
            reported_status: self.status,
        }
    }
}

/// `GET /youtube/videos` response (uploads playlist items)
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemList {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub id: String,
    pub snippet: PlaylistSnippet,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: HashMap<String, Thumbnail>,
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Counts arrive as strings from the platform
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub comment_count: Option<String>,
    #[serde(default)]
    pub view_count: Option<String>,
}

const THUMBNAIL_PREFERENCE: [&str; 3] = ["medium", "high", "default"];

impl PlaylistItem {
    /// Convert into a core video
    pub fn into_video(self) -> Video {
        let id = self
            .content_details
            .and_then(|d| d.video_id)
            .or_else(|| self.snippet.resource_id.and_then(|r| r.video_id))
            .unwrap_or(self.id);

        let mut thumbnails = self.snippet.thumbnails;
        let thumbnail = THUMBNAIL_PREFERENCE
            .iter()
            .find_map(|size| thumbnails.remove(*size))
            .or_else(|| thumbnails.into_values().next())
            .map(|t| t.url);

        let stats = self.statistics.unwrap_or_default();
        let count = |value: Option<String>| value.and_then(|v| v.parse().ok()).unwrap_or(0);

        Video {
            id: VideoId::from_string(id),
            title: self.snippet.title,
            thumbnail,
            published_at: self.snippet.published_at,
            comment_count: count(stats.comment_count),
            view_count: count(stats.view_count),
        }
    }
}

/// `POST /ai/generate-reply` response
///
/// Older backends answer with `text` instead of `reply`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReplyResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateReplyResponse {
    pub fn into_text(self) -> Option<String> {
        self.reply.or(self.text).map(|t| t.trim().to_string())
    }
}

/// `POST /youtube/comments/reply` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyBody<'a> {
    pub comment_id: &'a str,
    pub reply_text: &'a str,
}

/// `POST /youtube/comments/delete` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBody<'a> {
    pub comment_id: &'a str,
}

/// Error body of a failed request
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable detail, whether the backend sent a string or a structure
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
