//! Reply lifecycle
//!
//! Review dialog, busy guard, and the network operations that move a comment
//! from pending to replied.

pub mod state;
pub mod notify;
pub mod manager;

pub use state::{Operation, ReplyDraft, ReplyPhase, ReviewSession, ReviewState};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use manager::{AutoReplyReport, ReplyLifecycleManager};
