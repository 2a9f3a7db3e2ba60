//! Auto-reply command
//!
//! Sweep a video's pending comments, replying to each one the spam filter lets
//! through.

use crate::context::{spinner, AppContext, GlobalOptions};
use anyhow::Result;
use cf_core::comment::CommentStatus;
use cf_core::types::VideoId;
use clap::Args;
use colored::Colorize;

/// Arguments for the auto-reply command
#[derive(Debug, Args)]
pub struct AutoReplyArgs {
    /// Video ID
    pub video_id: String,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the auto-reply command
pub async fn execute(args: AutoReplyArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;
    let video_id = VideoId::from_string(&args.video_id);

    if !ctx.lifecycle.settings().auto_reply_enabled {
        eprintln!(
            "{} Auto-reply is disabled. Enable it with '{}'.",
            "⚠".yellow(),
            "commentflow settings auto-reply on".cyan()
        );
        return Ok(());
    }

    let comments = ctx.load_comments(&video_id).await?;
    let pending = comments
        .iter()
        .filter(|c| c.status() == CommentStatus::Pending)
        .count();

    if pending == 0 {
        println!("No pending comments on {}.", video_id);
        return Ok(());
    }

    if !args.yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Reply to {} pending comments?", pending))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Auto-reply cancelled.");
            return Ok(());
        }
    }

    let spinner = spinner(format!("Replying to {} comments", pending));
    let report = ctx.lifecycle.auto_reply(&video_id).await;
    spinner.finish_and_clear();
    let report = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} replied, {} skipped, {} failed",
        "✓".green(),
        report.replied.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for id in &report.skipped {
        println!("  {} {} (spam filter)", "-".dimmed(), id);
    }
    for (id, reason) in &report.failed {
        println!("  {} {}: {}", "✗".red(), id, reason);
    }
    Ok(())
}
