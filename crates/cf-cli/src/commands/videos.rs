//! Videos command
//!
//! List the channel's most recent uploads.

use crate::context::{spinner, AppContext, GlobalOptions};
use anyhow::{Context, Result};
use cf_core::api::CommentService;
use clap::Args;
use colored::Colorize;

/// Arguments for the videos command
#[derive(Debug, Args)]
pub struct VideosArgs {
    /// Number of videos to list (defaults to review.video_max_results)
    #[arg(long, short = 'n')]
    pub max_results: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the videos command
pub async fn execute(args: VideosArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;
    let max_results = args.max_results.unwrap_or(ctx.config.review.video_max_results);

    let spinner = spinner("Loading videos");
    let videos = ctx.service.fetch_videos(max_results).await;
    spinner.finish_and_clear();
    let videos = videos.context("Could not load videos")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&videos)?);
        return Ok(());
    }

    if videos.is_empty() {
        println!("No videos found.");
        return Ok(());
    }

    println!("{}", "Videos:".bold().underline());
    println!();
    for video in &videos {
        println!(
            "  {}  {}  {}",
            video.id.to_string().green(),
            video.title,
            video.published_at.format("%Y-%m-%d").to_string().dimmed()
        );
    }
    Ok(())
}
