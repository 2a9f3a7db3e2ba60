//! Reply lifecycle manager
//!
//! Runs the effects of the reply workflow against a [`CommentService`] while
//! [`ReviewState`] decides what is allowed. The state lock is only taken for
//! short synchronous sections and never across an `.await`.

use super::notify::{Notification, Notifier, TracingNotifier};
use super::state::{Operation, ReplyPhase, ReviewSession, ReviewState};
use crate::api::CommentService;
use crate::comment::{Comment, CommentStatus, CommentStore, ReplyValidator};
use crate::error::{CommentFlowError, Result};
use crate::reply::{
    prompt::sanitize_comment_text, GenerationRequest, PromptComposer, SpamFilter, ToneClassifier,
    ToneHint,
};
use crate::settings::AiSettings;
use crate::stats::{self, DashboardStats, WeeklyPoint};
use crate::types::{CommentId, ReplyId, ReviewSessionId, VideoId};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Outcome of an auto-reply sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoReplyReport {
    /// Comments that received a reply
    pub replied: Vec<CommentId>,
    /// Comments excluded by the spam filter
    pub skipped: Vec<CommentId>,
    /// Comments whose generate or submit failed, with the reason
    pub failed: Vec<(CommentId, String)>,
}

impl AutoReplyReport {
    /// Number of comments the sweep acted on
    pub fn total(&self) -> usize {
        self.replied.len() + self.skipped.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Orchestrates generate, submit, delete and refresh for the known comments
pub struct ReplyLifecycleManager {
    service: Arc<dyn CommentService>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ReviewState>,
    settings: Mutex<AiSettings>,
    composer: PromptComposer,
    classify_tone: bool,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ReplyLifecycleManager {
    /// Create a manager with no known comments
    pub fn new(service: Arc<dyn CommentService>, settings: AiSettings) -> Self {
        Self {
            service,
            notifier: Arc::new(TracingNotifier),
            state: Mutex::new(ReviewState::default()),
            settings: Mutex::new(settings),
            composer: PromptComposer::default(),
            classify_tone: true,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    /// Start from an already populated comment store
    pub fn with_comments(mut self, comments: CommentStore) -> Self {
        self.state = Mutex::new(ReviewState::new(comments));
        self
    }

    /// Send notifications somewhere other than the log
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use a custom prompt composer
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Whether each comment's tone is classified or the settings' tone used
    pub fn with_classify_tone(mut self, classify: bool) -> Self {
        self.classify_tone = classify;
        self
    }

    /// Use a specific random source for template and seed selection
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    // ---- review dialog ----

    /// Open a comment for review with an empty draft
    pub fn open(&self, comment_id: &CommentId) -> Result<ReviewSessionId> {
        let session = self.state().open(comment_id)?;
        debug!("Opened {} for review (session {})", comment_id, session);
        Ok(session)
    }

    /// Replace the draft of the open review
    pub fn edit_draft(&self, text: impl Into<String>) -> Result<()> {
        self.state().edit_draft(text)
    }

    /// Current draft text, if a comment is open
    pub fn draft(&self) -> Option<String> {
        self.state().review().map(|s| s.draft.text().to_string())
    }

    /// The open review session
    pub fn review(&self) -> Option<ReviewSession> {
        self.state().review().cloned()
    }

    /// Close the review dialog, discarding the draft
    pub fn close(&self) {
        if let Some(session) = self.state().close() {
            debug!("Closed review of {}", session.comment_id);
        }
    }

    // ---- network operations ----

    /// Generate a reply suggestion for the open comment
    ///
    /// The suggestion replaces the draft only if the same review session is
    /// still open when it arrives. The generated text is returned either way.
    ///
    /// A comment blocked by the spam filter is closed and left idle without
    /// any request being sent.
    pub async fn generate(&self, comment_id: &CommentId) -> Result<String> {
        let (session_id, comment) = {
            let state = self.state();
            let session = state.require_open(comment_id)?.id;
            (session, state.comments().require(comment_id)?.clone())
        };
        let settings = self.settings();
        if let Err(err) = self.check_spam(&comment, &settings) {
            let mut state = self.state();
            if state.review().map(|s| s.id) == Some(session_id) {
                state.close();
            }
            return Err(err);
        }

        let _slot = self.acquire(comment_id, Operation::Generate)?;
        let request = self.compose(&comment, &settings);

        match self.service.generate_reply(&request).await {
            Ok(generated) => {
                if self.state().apply_generated(session_id, &generated.reply) {
                    info!("Generated reply for {}", comment_id);
                    self.notifier.notify(Notification::success(
                        "AI suggestion ready",
                        format!("Review the suggested reply to {} before posting", comment_id),
                    ));
                } else {
                    debug!("Discarding reply for {}: review was closed", comment_id);
                }
                Ok(generated.reply)
            }
            Err(err) => {
                self.report_failure("Failed to generate reply", &err);
                Err(err)
            }
        }
    }

    /// Post the current draft as a reply to the open comment
    pub async fn submit(&self, comment_id: &CommentId) -> Result<()> {
        let (session_id, text, video_id) = {
            let state = self.state();
            let session = state.require_open(comment_id)?;
            let video_id = state.comments().require(comment_id)?.video_id.clone();
            (session.id, session.draft.text().to_string(), video_id)
        };
        let max_length = self.settings().max_reply_length;
        ReplyValidator::with_max_length(max_length).validate(&text)?;

        let slot = self.acquire(comment_id, Operation::Submit)?;
        if let Err(err) = self.service.submit_reply(comment_id, &text).await {
            self.report_failure("Failed to post reply", &err);
            return Err(err);
        }

        self.state()
            .apply_submitted(comment_id, session_id, &text, Utc::now())?;
        drop(slot);
        self.notifier.notify(Notification::success(
            "Reply posted",
            format!("Your reply to {} has been posted", comment_id),
        ));

        self.refresh_quietly(&video_id).await;
        Ok(())
    }

    /// Delete one posted reply from a comment thread
    ///
    /// Only the targeted reply is removed locally. The parent's status is
    /// left for the following refresh to settle.
    pub async fn delete_reply(&self, comment_id: &CommentId, reply_id: &ReplyId) -> Result<()> {
        let video_id = {
            let state = self.state();
            let comment = state.comments().require(comment_id)?;
            if comment.reply(reply_id).is_none() {
                return Err(CommentFlowError::ReplyNotFound(reply_id.to_string()));
            }
            comment.video_id.clone()
        };

        let slot = self.acquire(comment_id, Operation::Delete)?;
        if let Err(err) = self.service.delete_reply(reply_id).await {
            self.report_failure("Failed to delete reply", &err);
            return Err(err);
        }

        self.state().comments_mut().remove_reply(comment_id, reply_id)?;
        drop(slot);
        self.notifier.notify(Notification::success(
            "Reply deleted",
            format!("Reply {} has been deleted", reply_id),
        ));

        self.refresh_quietly(&video_id).await;
        Ok(())
    }

    /// Fetch a video's comment threads and merge them into the store
    pub async fn refresh(&self, video_id: &VideoId) -> Result<usize> {
        match self.service.fetch_comments(video_id).await {
            Ok(threads) => {
                let merged = self.state().comments_mut().merge_threads(threads);
                info!("Refreshed {} comments for video {}", merged, video_id);
                Ok(merged)
            }
            Err(err) => {
                self.report_failure("Failed to load comments", &err);
                Err(err)
            }
        }
    }

    /// Reply to every pending comment of a video
    ///
    /// Blocked comments become skipped, failures become failed. Comments are
    /// handled one at a time and busy comments are left alone.
    pub async fn auto_reply(&self, video_id: &VideoId) -> Result<AutoReplyReport> {
        let settings = self.settings();
        let mut report = AutoReplyReport::default();
        if !settings.auto_reply_enabled {
            info!("Auto-reply is disabled; nothing to do");
            return Ok(report);
        }

        let candidates: Vec<Comment> = {
            let state = self.state();
            state
                .comments()
                .by_video(video_id)
                .into_iter()
                .filter(|c| c.status() == CommentStatus::Pending)
                .filter(|c| state.in_flight(&c.id).is_none())
                .cloned()
                .collect()
        };
        debug!("Auto-reply: {} pending comments on {}", candidates.len(), video_id);

        for comment in candidates {
            let id = comment.id.clone();
            if self.check_spam(&comment, &settings).is_err() {
                self.state().comments_mut().set_status(&id, CommentStatus::Skipped)?;
                report.skipped.push(id);
                continue;
            }

            let slot = match self.acquire(&id, Operation::Generate) {
                Ok(slot) => slot,
                Err(err) => {
                    debug!("Auto-reply passing over {}: {}", id, err);
                    continue;
                }
            };

            match self.auto_reply_one(&slot, &comment, &settings).await {
                Ok(text) => {
                    self.state().comments_mut().mark_replied(&id, text, Utc::now())?;
                    report.replied.push(id);
                }
                Err(err) => {
                    warn!("Auto-reply to {} failed: {}", id, err);
                    self.state().comments_mut().set_status(&id, CommentStatus::Failed)?;
                    report.failed.push((id, err.to_string()));
                }
            }
        }

        let summary = format!(
            "{} replied, {} skipped, {} failed",
            report.replied.len(),
            report.skipped.len(),
            report.failed.len()
        );
        if report.failed.is_empty() {
            self.notifier.notify(Notification::info("Auto-reply finished", summary));
        } else {
            self.notifier.notify(Notification::error("Auto-reply finished with failures", summary));
        }
        Ok(report)
    }

    async fn auto_reply_one(
        &self,
        slot: &InFlightSlot<'_>,
        comment: &Comment,
        settings: &AiSettings,
    ) -> Result<String> {
        let request = self.compose(comment, settings);
        let generated = self.service.generate_reply(&request).await?;
        ReplyValidator::with_max_length(settings.max_reply_length).validate(&generated.reply)?;

        slot.switch(Operation::Submit);
        self.service.submit_reply(&comment.id, &generated.reply).await?;
        Ok(generated.reply)
    }

    // ---- read side ----

    /// Lifecycle phase of a comment
    pub fn phase(&self, comment_id: &CommentId) -> ReplyPhase {
        self.state().phase(comment_id)
    }

    /// Clone of one comment
    pub fn comment(&self, comment_id: &CommentId) -> Option<Comment> {
        self.state().comments().get(comment_id).cloned()
    }

    /// Clone of all comments in store order
    pub fn comments(&self) -> Vec<Comment> {
        self.state().comments().snapshot()
    }

    /// Clone of the comments matching a text or author query
    pub fn search(&self, query: &str) -> Vec<Comment> {
        self.state()
            .comments()
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Dashboard stats over a consistent snapshot
    pub fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        stats::aggregate(&self.comments(), now)
    }

    /// Per-day counts over a consistent snapshot
    pub fn weekly(&self, now: DateTime<Utc>) -> Vec<WeeklyPoint> {
        stats::weekly_series(&self.comments(), now)
    }

    /// Settings in effect for subsequent operations
    pub fn settings(&self) -> AiSettings {
        lock(&self.settings).clone()
    }

    /// Replace the settings used by subsequent operations
    pub fn update_settings(&self, settings: AiSettings) {
        *lock(&self.settings) = settings;
    }

    // ---- helpers ----

    fn state(&self) -> MutexGuard<'_, ReviewState> {
        lock(&self.state)
    }

    fn acquire(&self, comment_id: &CommentId, operation: Operation) -> Result<InFlightSlot<'_>> {
        self.state().begin(comment_id, operation)?;
        Ok(InFlightSlot {
            state: &self.state,
            comment_id: comment_id.clone(),
        })
    }

    fn check_spam(&self, comment: &Comment, settings: &AiSettings) -> Result<()> {
        if !settings.spam_filter_enabled {
            return Ok(());
        }
        match SpamFilter::first_match(&comment.text, &settings.blacklist_words) {
            Some(word) => {
                debug!("Comment {} matches blacklisted \"{}\"", comment.id, word);
                Err(CommentFlowError::BlockedBySpamFilter(comment.id.to_string()))
            }
            None => Ok(()),
        }
    }

    fn compose(&self, comment: &Comment, settings: &AiSettings) -> GenerationRequest {
        let tone = if self.classify_tone {
            ToneHint::Detected(ToneClassifier::classify(&sanitize_comment_text(&comment.text)))
        } else {
            ToneHint::Preset(settings.tone)
        };
        let mut rng = lock(&self.rng);
        self.composer.compose(comment, tone, rng.as_mut()).payload
    }

    fn report_failure(&self, title: &str, err: &CommentFlowError) {
        warn!("{}: {}", title, err);
        self.notifier.notify(Notification::error(title, err.to_string()));
    }

    async fn refresh_quietly(&self, video_id: &VideoId) {
        if let Err(err) = self.refresh(video_id).await {
            debug!("Post-operation refresh of {} failed: {}", video_id, err);
        }
    }
}

/// Busy slot held for the duration of one operation
struct InFlightSlot<'a> {
    state: &'a Mutex<ReviewState>,
    comment_id: CommentId,
}

impl InFlightSlot<'_> {
    fn switch(&self, operation: Operation) {
        lock(self.state).switch(&self.comment_id, operation);
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        lock(self.state).finish(&self.comment_id);
    }
}

// A panic while holding the lock leaves the state usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GeneratedReply;
    use crate::comment::{CommentBuilder, ThreadedComment, Video};
    use crate::lifecycle::notify::memory::MemoryNotifier;
    use crate::lifecycle::notify::NotificationLevel;
    use crate::reply::ToneLabel;
    use crate::settings::ReplyTone;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeService {
        reply: String,
        threads: Mutex<Vec<ThreadedComment>>,
        gate: Option<Arc<Notify>>,
        submit_gate: Option<Arc<Notify>>,
        fail_generate: bool,
        fail_submit: HashSet<String>,
        calls: Mutex<Vec<String>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl FakeService {
        fn new() -> Self {
            Self {
                reply: "Thanks for watching!".to_string(),
                ..Default::default()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl CommentService for FakeService {
        async fn fetch_comments(&self, video_id: &VideoId) -> Result<Vec<ThreadedComment>> {
            self.record(format!("fetch:{}", video_id));
            Ok(self.threads.lock().unwrap().clone())
        }

        async fn generate_reply(&self, request: &GenerationRequest) -> Result<GeneratedReply> {
            self.record("generate".to_string());
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_generate {
                return Err(CommentFlowError::network("generate reply", "503 Service Unavailable"));
            }
            Ok(GeneratedReply {
                reply: self.reply.clone(),
            })
        }

        async fn submit_reply(&self, comment_id: &CommentId, text: &str) -> Result<()> {
            self.record(format!("submit:{}:{}", comment_id, text));
            if let Some(gate) = &self.submit_gate {
                gate.notified().await;
            }
            if self.fail_submit.contains(comment_id.as_str()) {
                return Err(CommentFlowError::network("submit reply", "403 Forbidden"));
            }
            Ok(())
        }

        async fn delete_reply(&self, reply_id: &ReplyId) -> Result<()> {
            self.record(format!("delete:{}", reply_id));
            Ok(())
        }

        async fn fetch_videos(&self, _max_results: u32) -> Result<Vec<Video>> {
            Ok(Vec::new())
        }

        async fn fetch_stats(&self) -> Result<DashboardStats> {
            Ok(DashboardStats::default())
        }

        async fn fetch_weekly_stats(&self) -> Result<Vec<WeeklyPoint>> {
            Ok(Vec::new())
        }
    }

    fn id(s: &str) -> CommentId {
        CommentId::from_string(s)
    }

    fn store() -> CommentStore {
        CommentStore::from_comments(vec![
            CommentBuilder::new("c1", "v1")
                .text("Thanks, how long does this last?")
                .author("Ana")
                .build()
                .unwrap(),
            CommentBuilder::new("c2", "v1")
                .text("CLICK HERE for free subs")
                .author("Bot")
                .build()
                .unwrap(),
            CommentBuilder::new("c3", "v1")
                .text("Nice edit")
                .replied("Thank you!", Utc::now())
                .reply("c3.r1", "Channel", "Thank you!")
                .reply("c3.r2", "Channel", "Also, new video Friday")
                .build()
                .unwrap(),
            CommentBuilder::new("c4", "v1")
                .text("Audio is not working for me")
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    fn manager(service: Arc<FakeService>) -> (ReplyLifecycleManager, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let manager = ReplyLifecycleManager::new(service, AiSettings::default())
            .with_comments(store())
            .with_notifier(notifier.clone())
            .with_rng(StdRng::seed_from_u64(7));
        (manager, notifier)
    }

    #[tokio::test]
    async fn test_generate_fills_draft() {
        let service = Arc::new(FakeService::new());
        let (manager, notifier) = manager(service.clone());

        manager.open(&id("c1")).unwrap();
        let reply = manager.generate(&id("c1")).await.unwrap();

        assert_eq!(reply, "Thanks for watching!");
        assert_eq!(manager.draft().as_deref(), Some("Thanks for watching!"));
        assert_eq!(manager.phase(&id("c1")), ReplyPhase::Drafting);
        assert_eq!(notifier.count(NotificationLevel::Success), 1);

        let requests = service.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tone, ToneHint::Detected(ToneLabel::Thankful));
        assert_eq!(requests[0].author, "Ana");
    }

    #[tokio::test]
    async fn test_generate_uses_settings_tone_when_not_classifying() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());
        let manager = manager.with_classify_tone(false);
        let mut settings = manager.settings();
        settings.tone = ReplyTone::Professional;
        manager.update_settings(settings);

        manager.open(&id("c1")).unwrap();
        manager.generate(&id("c1")).await.unwrap();

        let requests = service.requests.lock().unwrap().clone();
        assert_eq!(requests[0].tone, ToneHint::Preset(ReplyTone::Professional));
    }

    #[tokio::test]
    async fn test_generate_requires_open_comment() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());

        manager.open(&id("c4")).unwrap();
        let err = manager.generate(&id("c1")).await.unwrap_err();
        assert!(matches!(err, CommentFlowError::Validation(_)));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blocked_comment_makes_no_request() {
        let service = Arc::new(FakeService::new());
        let (manager, notifier) = manager(service.clone());

        manager.open(&id("c2")).unwrap();
        let err = manager.generate(&id("c2")).await.unwrap_err();

        assert!(matches!(err, CommentFlowError::BlockedBySpamFilter(_)));
        assert!(service.calls().is_empty());
        assert_eq!(manager.comment(&id("c2")).unwrap().status(), CommentStatus::Pending);
        assert_eq!(manager.phase(&id("c2")), ReplyPhase::Idle);
        assert!(manager.review().is_none());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_spam_filter_disabled_allows_generation() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());
        let mut settings = manager.settings();
        settings.spam_filter_enabled = false;
        manager.update_settings(settings);

        manager.open(&id("c2")).unwrap();
        manager.generate(&id("c2")).await.unwrap();
        assert_eq!(service.calls(), vec!["generate".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_failure_keeps_draft() {
        let service = Arc::new(FakeService {
            fail_generate: true,
            ..FakeService::new()
        });
        let (manager, notifier) = manager(service);

        manager.open(&id("c1")).unwrap();
        manager.edit_draft("my own words").unwrap();
        let err = manager.generate(&id("c1")).await.unwrap_err();

        assert!(matches!(err, CommentFlowError::Network { .. }));
        assert_eq!(manager.draft().as_deref(), Some("my own words"));
        assert_eq!(manager.phase(&id("c1")), ReplyPhase::Drafting);
        assert_eq!(notifier.count(NotificationLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_busy_guard_rejects_submit_while_generating() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(FakeService::gated(gate.clone()));
        let (manager, _) = manager(service.clone());
        let manager = Arc::new(manager);

        manager.open(&id("c1")).unwrap();
        manager.edit_draft("Manual draft").unwrap();

        let task = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.generate(&id("c1")).await })
        };
        while manager.phase(&id("c1")) != ReplyPhase::Generating {
            tokio::task::yield_now().await;
        }

        let err = manager.submit(&id("c1")).await.unwrap_err();
        assert!(matches!(
            err,
            CommentFlowError::ConcurrentOperationRejected {
                in_flight: Operation::Generate,
                ..
            }
        ));
        assert!(!service.calls().iter().any(|c| c.starts_with("submit")));

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(manager.phase(&id("c1")), ReplyPhase::Drafting);

        manager.submit(&id("c1")).await.unwrap();
        let comment = manager.comment(&id("c1")).unwrap();
        assert_eq!(comment.status(), CommentStatus::Replied);
        assert_eq!(comment.ai_reply(), Some("Thanks for watching!"));
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(FakeService::gated(gate.clone()));
        let (manager, _) = manager(service);
        let manager = Arc::new(manager);

        manager.open(&id("c1")).unwrap();
        let task = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.generate(&id("c1")).await })
        };
        while manager.phase(&id("c1")) != ReplyPhase::Generating {
            tokio::task::yield_now().await;
        }

        manager.close();
        manager.open(&id("c1")).unwrap();
        gate.notify_one();

        assert_eq!(task.await.unwrap().unwrap(), "Thanks for watching!");
        assert_eq!(manager.draft().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_submit_posts_draft_at_submit_time() {
        let service = Arc::new(FakeService::new());
        let (manager, notifier) = manager(service.clone());

        manager.open(&id("c1")).unwrap();
        manager.generate(&id("c1")).await.unwrap();
        manager.edit_draft("About two years, thanks!").unwrap();
        manager.submit(&id("c1")).await.unwrap();

        assert!(service
            .calls()
            .contains(&"submit:c1:About two years, thanks!".to_string()));
        let comment = manager.comment(&id("c1")).unwrap();
        assert_eq!(comment.ai_reply(), Some("About two years, thanks!"));
        assert!(comment.replied_at().is_some());
        assert!(manager.review().is_none());
        assert_eq!(manager.phase(&id("c1")), ReplyPhase::Replied);
        // suggestion ready, then reply posted
        assert_eq!(notifier.count(NotificationLevel::Success), 2);

        // The list is refreshed afterwards
        assert_eq!(service.calls().last().map(String::as_str), Some("fetch:v1"));
    }

    #[tokio::test]
    async fn test_edit_during_submit_does_not_change_posted_text() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(FakeService {
            submit_gate: Some(gate.clone()),
            ..FakeService::new()
        });
        let (manager, _) = manager(service.clone());
        let manager = Arc::new(manager);

        manager.open(&id("c1")).unwrap();
        manager.edit_draft("first").unwrap();
        let task = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.submit(&id("c1")).await })
        };
        while manager.phase(&id("c1")) != ReplyPhase::Submitting {
            tokio::task::yield_now().await;
        }

        manager.edit_draft("later edit").unwrap();
        gate.notify_one();
        task.await.unwrap().unwrap();

        let submitted: Vec<_> = service
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("submit"))
            .collect();
        assert_eq!(submitted, vec!["submit:c1:first".to_string()]);
        let comment = manager.comment(&id("c1")).unwrap();
        assert_eq!(comment.ai_reply(), Some("first"));
        assert_eq!(comment.status(), CommentStatus::Replied);
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_draft() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());

        manager.open(&id("c1")).unwrap();
        manager.edit_draft("   ").unwrap();
        assert!(matches!(
            manager.submit(&id("c1")).await.unwrap_err(),
            CommentFlowError::Validation(_)
        ));

        manager.edit_draft("x".repeat(501)).unwrap();
        assert!(matches!(
            manager.submit(&id("c1")).await.unwrap_err(),
            CommentFlowError::Validation(_)
        ));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_failure_leaves_status() {
        let service = Arc::new(FakeService {
            fail_submit: HashSet::from(["c1".to_string()]),
            ..FakeService::new()
        });
        let (manager, notifier) = manager(service);

        manager.open(&id("c1")).unwrap();
        manager.edit_draft("Hello!").unwrap();
        let err = manager.submit(&id("c1")).await.unwrap_err();

        assert!(matches!(err, CommentFlowError::Network { .. }));
        assert_eq!(manager.comment(&id("c1")).unwrap().status(), CommentStatus::Pending);
        assert_eq!(manager.draft().as_deref(), Some("Hello!"));
        assert_eq!(manager.phase(&id("c1")), ReplyPhase::Drafting);
        assert_eq!(notifier.count(NotificationLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one_reply() {
        let service = Arc::new(FakeService::new());
        let (manager, notifier) = manager(service.clone());

        manager
            .delete_reply(&id("c3"), &ReplyId::from_string("c3.r1"))
            .await
            .unwrap();

        let comment = manager.comment(&id("c3")).unwrap();
        let remaining: Vec<_> = comment.replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(remaining, vec!["c3.r2"]);
        assert_eq!(comment.status(), CommentStatus::Replied);
        assert_eq!(notifier.count(NotificationLevel::Success), 1);
        assert_eq!(
            service.calls(),
            vec!["delete:c3.r1".to_string(), "fetch:v1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_reply() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());

        let err = manager
            .delete_reply(&id("c3"), &ReplyId::from_string("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommentFlowError::ReplyNotFound(_)));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_after_last_reply_deleted_reverts_to_pending() {
        let service = Arc::new(FakeService::new());
        let thread = ThreadedComment {
            top_level: CommentBuilder::new("c5", "v1").text("Cool").build().unwrap(),
            replies: Vec::new(),
            reported_status: None,
        };
        *service.threads.lock().unwrap() = vec![thread];

        let mut comments = store();
        comments
            .add(
                CommentBuilder::new("c5", "v1")
                    .text("Cool")
                    .replied("Cheers", Utc::now())
                    .reply("c5.r1", "Channel", "Cheers")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let manager = ReplyLifecycleManager::new(service, AiSettings::default())
            .with_comments(comments)
            .with_notifier(Arc::new(MemoryNotifier::new()));

        manager
            .delete_reply(&id("c5"), &ReplyId::from_string("c5.r1"))
            .await
            .unwrap();

        let comment = manager.comment(&id("c5")).unwrap();
        assert_eq!(comment.status(), CommentStatus::Pending);
        assert!(comment.ai_reply().is_none());
    }

    #[tokio::test]
    async fn test_refresh_merges_new_and_reported() {
        let service = Arc::new(FakeService::new());
        *service.threads.lock().unwrap() = vec![
            ThreadedComment {
                top_level: CommentBuilder::new("c4", "v1")
                    .text("Audio is not working for me")
                    .build()
                    .unwrap(),
                replies: Vec::new(),
                reported_status: Some(CommentStatus::Failed),
            },
            ThreadedComment {
                top_level: CommentBuilder::new("c9", "v1").text("First!").build().unwrap(),
                replies: Vec::new(),
                reported_status: None,
            },
        ];
        let (manager, _) = manager(service);

        assert_eq!(manager.refresh(&VideoId::from_string("v1")).await.unwrap(), 2);

        let ids: Vec<_> = manager.comments().iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3", "c4", "c9"]);
        assert_eq!(manager.comment(&id("c4")).unwrap().status(), CommentStatus::Failed);
        assert_eq!(manager.comment(&id("c9")).unwrap().status(), CommentStatus::Pending);
    }

    #[tokio::test]
    async fn test_close_never_calls_network() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());

        manager.open(&id("c1")).unwrap();
        manager.edit_draft("draft").unwrap();
        manager.close();

        assert!(manager.draft().is_none());
        assert_eq!(manager.phase(&id("c1")), ReplyPhase::Idle);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_auto_reply_sweep() {
        let service = Arc::new(FakeService {
            fail_submit: HashSet::from(["c4".to_string()]),
            ..FakeService::new()
        });
        let (manager, notifier) = manager(service.clone());

        let report = manager.auto_reply(&VideoId::from_string("v1")).await.unwrap();

        assert_eq!(report.replied, vec![id("c1")]);
        assert_eq!(report.skipped, vec![id("c2")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, id("c4"));

        assert_eq!(manager.comment(&id("c1")).unwrap().status(), CommentStatus::Replied);
        assert_eq!(manager.comment(&id("c2")).unwrap().status(), CommentStatus::Skipped);
        assert_eq!(manager.comment(&id("c4")).unwrap().status(), CommentStatus::Failed);
        assert_eq!(manager.comment(&id("c3")).unwrap().ai_reply(), Some("Thank you!"));
        assert_eq!(manager.phase(&id("c4")), ReplyPhase::Idle);
        assert_eq!(notifier.count(NotificationLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_auto_reply_disabled_is_empty() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service.clone());
        let mut settings = manager.settings();
        settings.auto_reply_enabled = false;
        manager.update_settings(settings);

        let report = manager.auto_reply(&VideoId::from_string("v1")).await.unwrap();
        assert!(report.is_empty());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stats_reflect_local_changes() {
        let service = Arc::new(FakeService::new());
        let (manager, _) = manager(service);

        let before = manager.stats(Utc::now());
        assert_eq!(before.total_comments, 4);
        assert_eq!(before.replied_comments, 1);
        assert_eq!(before.success_rate, 25.0);

        manager.open(&id("c4")).unwrap();
        manager.edit_draft("Sorry about that, fixed in the next upload").unwrap();
        manager.submit(&id("c4")).await.unwrap();

        let after = manager.stats(Utc::now());
        assert_eq!(after.replied_comments, 2);
        assert_eq!(after.success_rate, 50.0);
        assert_eq!(manager.weekly(Utc::now()).len(), 7);
    }
}
