//! Comment store: the single source of truth for known comments

use super::model::{Comment, CommentStatus, ThreadedComment};
use crate::error::{CommentFlowError, Result};
use crate::types::{CommentId, ReplyId, VideoId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Ordered collection of comments keyed by id
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    /// All comments by ID
    comments: HashMap<CommentId, Comment>,
    /// Ingest order
    order: Vec<CommentId>,
}

impl CommentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already-ingested comments
    pub fn from_comments(comments: impl IntoIterator<Item = Comment>) -> Result<Self> {
        let mut store = Self::new();
        for comment in comments {
            store.add(comment)?;
        }
        Ok(store)
    }

    /// Add a comment
    pub fn add(&mut self, comment: Comment) -> Result<CommentId> {
        let id = comment.id.clone();

        if self.comments.contains_key(&id) {
            return Err(CommentFlowError::Validation(format!(
                "Comment with ID {} already exists",
                id
            )));
        }

        self.order.push(id.clone());
        self.comments.insert(id.clone(), comment);
        Ok(id)
    }

    /// Get a comment by ID
    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// Get a mutable comment by ID
    pub(crate) fn get_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.get_mut(id)
    }

    /// Get a comment or fail with `CommentNotFound`
    pub fn require(&self, id: &CommentId) -> Result<&Comment> {
        self.get(id)
            .ok_or_else(|| CommentFlowError::CommentNotFound(id.to_string()))
    }

    /// Record a posted reply on a comment
    pub(crate) fn mark_replied(
        &mut self,
        id: &CommentId,
        reply: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let comment = self
            .get_mut(id)
            .ok_or_else(|| CommentFlowError::CommentNotFound(id.to_string()))?;
        comment.mark_replied(reply, at);
        Ok(())
    }

    /// Set a non-replied status on a comment
    pub(crate) fn set_status(&mut self, id: &CommentId, status: CommentStatus) -> Result<()> {
        let comment = self
            .get_mut(id)
            .ok_or_else(|| CommentFlowError::CommentNotFound(id.to_string()))?;
        comment.set_status(status)
    }

    /// Remove one reply from its parent comment
    pub(crate) fn remove_reply(&mut self, parent: &CommentId, reply_id: &ReplyId) -> Result<()> {
        let comment = self
            .get_mut(parent)
            .ok_or_else(|| CommentFlowError::CommentNotFound(parent.to_string()))?;
        comment
            .remove_reply(reply_id)
            .map(|_| ())
            .ok_or_else(|| CommentFlowError::ReplyNotFound(reply_id.to_string()))
    }

    /// Merge freshly fetched threads into the store
    ///
    /// Known comments keep their position, new ones are appended in fetch
    /// order. Comments missing from the fetch are never dropped.
    pub(crate) fn merge_threads(&mut self, threads: Vec<ThreadedComment>) -> usize {
        let count = threads.len();
        for thread in threads {
            let merged = merge_thread(self.comments.get(&thread.top_level.id), thread);
            let id = merged.id.clone();
            if !self.comments.contains_key(&id) {
                self.order.push(id.clone());
            }
            self.comments.insert(id, merged);
        }
        count
    }

    /// Get all comments in ingest order
    pub fn all(&self) -> Vec<&Comment> {
        self.order
            .iter()
            .filter_map(|id| self.comments.get(id))
            .collect()
    }

    /// Clone all comments in ingest order
    pub fn snapshot(&self) -> Vec<Comment> {
        self.all().into_iter().cloned().collect()
    }

    /// Get comments posted on one video
    pub fn by_video(&self, video_id: &VideoId) -> Vec<&Comment> {
        self.all()
            .into_iter()
            .filter(|c| &c.video_id == video_id)
            .collect()
    }

    /// Search comments by text or author
    pub fn search(&self, query: &str) -> Vec<&Comment> {
        let query_lower = query.to_lowercase();
        self.all()
            .into_iter()
            .filter(|c| {
                c.text.to_lowercase().contains(&query_lower)
                    || c.author_name.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    /// Get total comment count
    pub fn count(&self) -> usize {
        self.comments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Apply the refresh rules to one fetched thread
fn merge_thread(previous: Option<&Comment>, thread: ThreadedComment) -> Comment {
    let ThreadedComment {
        top_level: mut incoming,
        replies,
        reported_status,
    } = thread;
    incoming.replies = replies;

    let previous_status = previous.map(|c| c.status());
    let status = match reported_status {
        Some(status) => status,
        None if !incoming.replies.is_empty() => CommentStatus::Replied,
        None => match previous_status {
            Some(kept @ (CommentStatus::Failed | CommentStatus::Skipped)) => kept,
            _ => CommentStatus::Pending,
        },
    };

    if status == CommentStatus::Replied {
        let kept = previous
            .and_then(|c| Some((c.ai_reply()?.to_string(), c.replied_at()?)));
        let (text, at) = kept
            .or_else(|| {
                incoming
                    .latest_reply()
                    .map(|r| (r.text.clone(), r.published_at))
            })
            .unwrap_or_else(|| (String::new(), Utc::now()));
        incoming.mark_replied(text, at);
    } else {
        // Never fails: replied is handled above.
        let _ = incoming.set_status(status);
    }

    incoming
}
