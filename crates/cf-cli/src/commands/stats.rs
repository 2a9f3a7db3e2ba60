//! Stats and weekly commands
//!
//! With a video ID the numbers are computed locally from that video's
//! comments; without one the backend's channel-wide numbers are shown.

use crate::context::{spinner, AppContext, GlobalOptions};
use anyhow::{Context, Result};
use cf_core::api::CommentService;
use cf_core::stats::{DashboardStats, WeeklyPoint};
use cf_core::types::VideoId;
use chrono::Utc;
use clap::Args;
use colored::Colorize;

/// Arguments for the stats command
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Compute stats for this video only
    pub video_id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the weekly command
#[derive(Debug, Args)]
pub struct WeeklyArgs {
    /// Compute the series for this video only
    pub video_id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the stats command
pub async fn execute(args: StatsArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;

    let stats = match &args.video_id {
        Some(video_id) => {
            ctx.load_comments(&VideoId::from_string(video_id)).await?;
            ctx.lifecycle.stats(Utc::now())
        }
        None => {
            let spinner = spinner("Loading stats");
            let stats = ctx.service.fetch_stats().await;
            spinner.finish_and_clear();
            stats.context("Could not load stats")?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats, args.video_id.is_some());
    }
    Ok(())
}

/// Execute the weekly command
pub async fn execute_weekly(args: WeeklyArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;

    let series = match &args.video_id {
        Some(video_id) => {
            ctx.load_comments(&VideoId::from_string(video_id)).await?;
            ctx.lifecycle.weekly(Utc::now())
        }
        None => {
            let spinner = spinner("Loading weekly stats");
            let series = ctx.service.fetch_weekly_stats().await;
            spinner.finish_and_clear();
            series.context("Could not load weekly stats")?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else {
        print_weekly(&series);
    }
    Ok(())
}

fn print_stats(stats: &DashboardStats, local: bool) {
    println!("{}", "Dashboard:".bold().underline());
    println!();
    println!("  Total comments:   {}", stats.total_comments);
    println!("  Replied:          {}", stats.replied_comments.to_string().green());
    println!("  Pending:          {}", stats.pending_comments.to_string().yellow());
    println!("  Failed:           {}", stats.failed_replies.to_string().red());
    println!("  Success rate:     {:.2}%", stats.success_rate);
    if local {
        println!("  Today:            {}", stats.comments_today);
        println!("  Last 7 days:      {}", stats.comments_this_week);
    }
}

fn print_weekly(series: &[WeeklyPoint]) {
    let widest = series.iter().map(|p| p.comments).max().unwrap_or(0).max(1);

    println!("{}", "This week:".bold().underline());
    println!();
    for point in series {
        let bar_len = point.comments * 30 / widest;
        let replied_len = point.replies.min(point.comments) * 30 / widest;
        let bar = format!(
            "{}{}",
            "█".repeat(replied_len).green(),
            "█".repeat(bar_len - replied_len).dimmed()
        );
        println!(
            "  {}  {:<30}  {} comments, {} replies",
            point.day, bar, point.comments, point.replies
        );
    }
}
