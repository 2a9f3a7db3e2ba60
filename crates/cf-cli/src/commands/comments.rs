//! Comments command
//!
//! List the comments on one video.

use crate::context::{AppContext, GlobalOptions};
use anyhow::Result;
use cf_core::comment::{Comment, CommentStatus};
use cf_core::reply::prompt::sanitize_comment_text;
use cf_core::types::VideoId;
use clap::Args;
use colored::Colorize;

/// Arguments for the comments command
#[derive(Debug, Args)]
pub struct CommentsArgs {
    /// Video ID
    pub video_id: String,

    /// Only show comments whose text or author contains this
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only show comments with this status (pending, replied, failed, skipped)
    #[arg(long)]
    pub status: Option<CommentStatus>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the comments command
pub async fn execute(args: CommentsArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;
    let video_id = VideoId::from_string(&args.video_id);
    ctx.load_comments(&video_id).await?;

    let mut comments = match &args.search {
        Some(query) => ctx.lifecycle.search(query),
        None => ctx.lifecycle.comments(),
    };
    if let Some(status) = args.status {
        comments.retain(|c| c.status() == status);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
        return Ok(());
    }

    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }

    println!(
        "{} ({})",
        format!("Comments on {}", video_id).bold().underline(),
        comments.len()
    );
    println!();
    for comment in &comments {
        print_comment(comment);
    }
    Ok(())
}

fn print_comment(comment: &Comment) {
    println!(
        "  {} {} {}",
        comment.id.to_string().dimmed(),
        comment.author_name.cyan(),
        status_label(comment.status())
    );
    println!(
        "    {}  {}",
        sanitize_comment_text(&comment.text),
        format!("♥ {}", comment.like_count).dimmed()
    );
    for reply in &comment.replies {
        println!(
            "    {} {} {}: {}",
            "↳".dimmed(),
            reply.id.to_string().dimmed(),
            reply.author_name,
            sanitize_comment_text(&reply.text)
        );
    }
    println!();
}

/// Status with a color matching its meaning
pub fn status_label(status: CommentStatus) -> colored::ColoredString {
    match status {
        CommentStatus::Pending => status.as_str().yellow(),
        CommentStatus::Replied => status.as_str().green(),
        CommentStatus::Failed => status.as_str().red(),
        CommentStatus::Skipped => status.as_str().dimmed(),
    }
}
