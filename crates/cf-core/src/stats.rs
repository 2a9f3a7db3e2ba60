//! Dashboard statistics derived from the comment collection
//!
//! Everything here is a pure projection: nothing is cached, and callers pass
//! the reference time so results are reproducible.

use crate::comment::{Comment, CommentStatus};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Channel-level summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_comments: usize,
    pub replied_comments: usize,
    pub pending_comments: usize,
    pub failed_replies: usize,
    /// Percentage of comments replied to, rounded to two decimals
    pub success_rate: f64,
    #[serde(default)]
    pub comments_today: usize,
    #[serde(default)]
    pub comments_this_week: usize,
}

/// Comment and reply counts for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    /// Three-letter weekday label
    pub day: String,
    pub comments: usize,
    pub replies: usize,
}

/// Aggregate comments into dashboard stats as of `now`
pub fn aggregate(comments: &[Comment], now: DateTime<Utc>) -> DashboardStats {
    let count = |status: CommentStatus| comments.iter().filter(|c| c.status() == status).count();

    let total = comments.len();
    let replied = count(CommentStatus::Replied);
    let today = now.date_naive();
    let week_start = now - Duration::days(7);

    DashboardStats {
        total_comments: total,
        replied_comments: replied,
        pending_comments: count(CommentStatus::Pending),
        failed_replies: count(CommentStatus::Failed),
        success_rate: success_rate(replied, total),
        comments_today: comments
            .iter()
            .filter(|c| c.published_at.date_naive() == today)
            .count(),
        comments_this_week: comments
            .iter()
            .filter(|c| c.published_at > week_start && c.published_at <= now)
            .count(),
    }
}

/// Per-day counts for the Monday-to-Sunday week containing `now`
///
/// This is a calendar week, unlike the trailing seven days behind
/// [`DashboardStats::comments_this_week`]. Days after today are always zero.
pub fn weekly_series(comments: &[Comment], now: DateTime<Utc>) -> Vec<WeeklyPoint> {
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    (0..7)
        .map(|offset| {
            let day = monday + Duration::days(offset);
            let on_day: Vec<&Comment> = comments
                .iter()
                .filter(|c| c.published_at.date_naive() == day)
                .collect();
            WeeklyPoint {
                day: weekday_label(day),
                comments: on_day.len(),
                replies: on_day
                    .iter()
                    .filter(|c| c.status() == CommentStatus::Replied)
                    .count(),
            }
        })
        .collect()
}

fn success_rate(replied: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = replied as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

fn weekday_label(day: NaiveDate) -> String {
    day.format("%a").to_string()
}
