//! Review state and its pure transitions
//!
//! [`ReviewState`] holds everything the lifecycle manager mutates: the comment
//! store, the one open review session, and the per-comment in-flight slot.
//! Transitions here never touch the network.

use crate::comment::{CommentStatus, CommentStore};
use crate::error::{CommentFlowError, Result};
use crate::types::{CommentId, ReviewSessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A network operation that occupies a comment's busy slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Generate,
    Submit,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Submit => "submit",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a comment is in the reply lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyPhase {
    /// Not under review and not replied
    Idle,
    /// Open for review with an editable draft
    Drafting,
    /// Waiting on the generation service
    Generating,
    /// Waiting on the platform to post the reply
    Submitting,
    /// Waiting on the platform to delete a reply
    Deleting,
    /// A reply has been posted and nothing is in progress
    Replied,
}

impl fmt::Display for ReplyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyPhase::Idle => "idle",
            ReplyPhase::Drafting => "drafting",
            ReplyPhase::Generating => "generating",
            ReplyPhase::Submitting => "submitting",
            ReplyPhase::Deleting => "deleting",
            ReplyPhase::Replied => "replied",
        };
        f.write_str(name)
    }
}

/// Unsaved reply text for the comment under review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDraft {
    text: String,
}

impl ReplyDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole draft
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the draft has no visible content
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The single open review dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    pub id: ReviewSessionId,
    pub comment_id: CommentId,
    pub draft: ReplyDraft,
}

impl ReviewSession {
    fn new(comment_id: CommentId) -> Self {
        Self {
            id: ReviewSessionId::new(),
            comment_id,
            draft: ReplyDraft::new(),
        }
    }
}

/// Everything the lifecycle manager guards behind one lock
#[derive(Debug, Default)]
pub struct ReviewState {
    comments: CommentStore,
    review: Option<ReviewSession>,
    in_flight: HashMap<CommentId, Operation>,
}

impl ReviewState {
    /// Create state over an existing comment store
    pub fn new(comments: CommentStore) -> Self {
        Self {
            comments,
            review: None,
            in_flight: HashMap::new(),
        }
    }

    /// Known comments
    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    pub(crate) fn comments_mut(&mut self) -> &mut CommentStore {
        &mut self.comments
    }

    /// The open review session, if any
    pub fn review(&self) -> Option<&ReviewSession> {
        self.review.as_ref()
    }

    /// Operation currently running for a comment
    pub fn in_flight(&self, comment_id: &CommentId) -> Option<Operation> {
        self.in_flight.get(comment_id).copied()
    }

    /// Open a comment for review, discarding any previous session
    pub fn open(&mut self, comment_id: &CommentId) -> Result<ReviewSessionId> {
        self.comments.require(comment_id)?;
        let session = ReviewSession::new(comment_id.clone());
        let id = session.id;
        if let Some(previous) = self.review.replace(session) {
            debug!("Review of {} replaced by {}", previous.comment_id, comment_id);
        }
        Ok(id)
    }

    /// Close the open session, returning it
    pub fn close(&mut self) -> Option<ReviewSession> {
        self.review.take()
    }

    /// Replace the draft of the open session
    pub fn edit_draft(&mut self, text: impl Into<String>) -> Result<()> {
        let session = self
            .review
            .as_mut()
            .ok_or_else(|| CommentFlowError::Validation("No comment is open for review".to_string()))?;
        session.draft.set(text);
        Ok(())
    }

    /// The open session, provided it is reviewing `comment_id`
    pub fn require_open(&self, comment_id: &CommentId) -> Result<&ReviewSession> {
        match &self.review {
            Some(session) if &session.comment_id == comment_id => Ok(session),
            Some(session) => Err(CommentFlowError::Validation(format!(
                "Comment {} is not open for review ({} is)",
                comment_id, session.comment_id
            ))),
            None => Err(CommentFlowError::Validation(format!(
                "Comment {} is not open for review",
                comment_id
            ))),
        }
    }

    /// Occupy the busy slot of a comment
    pub fn begin(&mut self, comment_id: &CommentId, operation: Operation) -> Result<()> {
        self.comments.require(comment_id)?;
        if let Some(in_flight) = self.in_flight(comment_id) {
            return Err(CommentFlowError::ConcurrentOperationRejected {
                comment_id: comment_id.to_string(),
                in_flight,
            });
        }
        self.in_flight.insert(comment_id.clone(), operation);
        debug!("{} started for {}", operation, comment_id);
        Ok(())
    }

    /// Change the operation held in an occupied slot
    pub(crate) fn switch(&mut self, comment_id: &CommentId, operation: Operation) {
        if let Some(slot) = self.in_flight.get_mut(comment_id) {
            *slot = operation;
        }
    }

    /// Release the busy slot of a comment
    pub fn finish(&mut self, comment_id: &CommentId) {
        if let Some(operation) = self.in_flight.remove(comment_id) {
            debug!("{} finished for {}", operation, comment_id);
        }
    }

    /// Put a generated reply into the draft if its session is still open
    ///
    /// Returns false when the result is stale and was dropped.
    pub fn apply_generated(&mut self, session_id: ReviewSessionId, reply: &str) -> bool {
        match self.review.as_mut() {
            Some(session) if session.id == session_id => {
                session.draft.set(reply);
                true
            }
            _ => false,
        }
    }

    /// Record a posted reply and close its session if still open
    pub fn apply_submitted(
        &mut self,
        comment_id: &CommentId,
        session_id: ReviewSessionId,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.comments.mark_replied(comment_id, text, at)?;
        if self.review.as_ref().map(|s| s.id) == Some(session_id) {
            self.review = None;
        }
        Ok(())
    }

    /// Derive the lifecycle phase of a comment
    pub fn phase(&self, comment_id: &CommentId) -> ReplyPhase {
        match self.in_flight(comment_id) {
            Some(Operation::Generate) => return ReplyPhase::Generating,
            Some(Operation::Submit) => return ReplyPhase::Submitting,
            Some(Operation::Delete) => return ReplyPhase::Deleting,
            None => {}
        }

        if self.review.as_ref().map(|s| &s.comment_id) == Some(comment_id) {
            return ReplyPhase::Drafting;
        }

        match self.comments.get(comment_id).map(|c| c.status()) {
            Some(CommentStatus::Replied) => ReplyPhase::Replied,
            _ => ReplyPhase::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentBuilder;
    use pretty_assertions::assert_eq;

    fn state() -> ReviewState {
        let comments = CommentStore::from_comments(vec![
            CommentBuilder::new("c1", "v1").text("Great video").build().unwrap(),
            CommentBuilder::new("c2", "v1").text("How long?").build().unwrap(),
        ])
        .unwrap();
        ReviewState::new(comments)
    }

    fn id(s: &str) -> CommentId {
        CommentId::from_string(s)
    }

    #[test]
    fn test_open_and_close() {
        let mut state = state();
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Idle);

        state.open(&id("c1")).unwrap();
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Drafting);
        assert_eq!(state.review().unwrap().draft.text(), "");

        state.close();
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Idle);
        assert!(state.review().is_none());
    }

    #[test]
    fn test_open_unknown_comment() {
        let mut state = state();
        let err = state.open(&id("missing")).unwrap_err();
        assert!(matches!(err, CommentFlowError::CommentNotFound(_)));
    }

    #[test]
    fn test_opening_another_comment_discards_draft() {
        let mut state = state();
        let first = state.open(&id("c1")).unwrap();
        state.edit_draft("half-written").unwrap();

        let second = state.open(&id("c2")).unwrap();
        assert_ne!(first, second);
        assert_eq!(state.review().unwrap().draft.text(), "");
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Idle);
    }

    #[test]
    fn test_edit_draft_requires_open_session() {
        let mut state = state();
        assert!(state.edit_draft("hello").is_err());
    }

    #[test]
    fn test_busy_slot() {
        let mut state = state();
        state.begin(&id("c1"), Operation::Generate).unwrap();
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Generating);

        let err = state.begin(&id("c1"), Operation::Submit).unwrap_err();
        match err {
            CommentFlowError::ConcurrentOperationRejected { comment_id, in_flight } => {
                assert_eq!(comment_id, "c1");
                assert_eq!(in_flight, Operation::Generate);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Other comments are independent
        state.begin(&id("c2"), Operation::Delete).unwrap();

        state.finish(&id("c1"));
        state.begin(&id("c1"), Operation::Submit).unwrap();
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Submitting);
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut state = state();
        let stale = state.open(&id("c1")).unwrap();
        state.close();
        let current = state.open(&id("c1")).unwrap();

        assert!(!state.apply_generated(stale, "late reply"));
        assert_eq!(state.review().unwrap().draft.text(), "");

        assert!(state.apply_generated(current, "fresh reply"));
        assert_eq!(state.review().unwrap().draft.text(), "fresh reply");
    }

    #[test]
    fn test_apply_submitted_closes_matching_session() {
        let mut state = state();
        let session = state.open(&id("c1")).unwrap();
        state.edit_draft("Thanks!").unwrap();

        state
            .apply_submitted(&id("c1"), session, "Thanks!", Utc::now())
            .unwrap();

        assert!(state.review().is_none());
        assert_eq!(state.phase(&id("c1")), ReplyPhase::Replied);
        assert_eq!(state.comments().get(&id("c1")).unwrap().ai_reply(), Some("Thanks!"));
    }

    #[test]
    fn test_apply_submitted_keeps_newer_session() {
        let mut state = state();
        let old = state.open(&id("c1")).unwrap();
        state.open(&id("c2")).unwrap();

        state.apply_submitted(&id("c1"), old, "Thanks!", Utc::now()).unwrap();
        assert_eq!(state.review().unwrap().comment_id, id("c2"));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Generate.to_string(), "generate");
        assert_eq!(ReplyPhase::Deleting.to_string(), "deleting");
    }
}
