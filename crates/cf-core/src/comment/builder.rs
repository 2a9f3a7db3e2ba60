//! Comment builder for fluent API

use super::model::{Comment, CommentStatus, Reply};
use crate::error::{CommentFlowError, Result};
use crate::types::{CommentId, ReplyId, VideoId};
use chrono::{DateTime, Utc};

/// Builder for creating comments with fluent API
pub struct CommentBuilder {
    id: CommentId,
    video_id: VideoId,
    video_title: Option<String>,
    author_name: Option<String>,
    author_avatar: Option<String>,
    text: Option<String>,
    published_at: DateTime<Utc>,
    like_count: u64,
    status: CommentStatus,
    reply: Option<(String, DateTime<Utc>)>,
    replies: Vec<Reply>,
}

impl CommentBuilder {
    /// Create a new builder for a comment on a video
    pub fn new(id: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            id: CommentId::from_string(id),
            video_id: VideoId::from_string(video_id),
            video_title: None,
            author_name: None,
            author_avatar: None,
            text: None,
            published_at: Utc::now(),
            like_count: 0,
            status: CommentStatus::Pending,
            reply: None,
            replies: Vec::new(),
        }
    }

    /// Set the comment text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the author display name
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author_name = Some(author.into());
        self
    }

    /// Set the author avatar URL
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.author_avatar = Some(avatar.into());
        self
    }

    /// Set the video title
    pub fn video_title(mut self, title: impl Into<String>) -> Self {
        self.video_title = Some(title.into());
        self
    }

    /// Set the publish time
    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = at;
        self
    }

    /// Set the like count
    pub fn likes(mut self, likes: u64) -> Self {
        self.like_count = likes;
        self
    }

    /// Set a non-replied status
    pub fn status(mut self, status: CommentStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as replied with the given reply text
    pub fn replied(mut self, reply: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.reply = Some((reply.into(), at));
        self
    }

    /// Attach a nested reply
    pub fn reply(
        mut self,
        id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.replies.push(Reply {
            id: ReplyId::from_string(id),
            parent_id: self.id.clone(),
            author_name: author.into(),
            text: text.into(),
            published_at: Utc::now(),
        });
        self
    }

    /// Build the comment
    pub fn build(self) -> Result<Comment> {
        let text = self.text.ok_or_else(|| {
            CommentFlowError::Validation("Comment text is required".to_string())
        })?;
        let author = self.author_name.unwrap_or_else(|| "Anonymous".to_string());

        let mut comment = Comment::new(self.id, self.video_id, author, text, self.published_at);
        comment.video_title = self.video_title;
        comment.author_avatar = self.author_avatar;
        comment.like_count = self.like_count;
        comment.replies = self.replies;

        match self.reply {
            Some((reply, at)) => comment.mark_replied(reply, at),
            None => comment.set_status(self.status)?,
        }

        Ok(comment)
    }
}
