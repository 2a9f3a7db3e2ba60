//! Delete-reply command
//!
//! Remove one posted reply from a comment thread.

use crate::context::{spinner, AppContext, GlobalOptions};
use anyhow::{Context, Result};
use cf_core::types::{CommentId, ReplyId, VideoId};
use clap::Args;
use colored::Colorize;

/// Arguments for the delete-reply command
#[derive(Debug, Args)]
pub struct DeleteReplyArgs {
    /// Video ID
    pub video_id: String,

    /// Top-level comment ID
    pub comment_id: String,

    /// ID of the reply to delete
    pub reply_id: String,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

/// Execute the delete-reply command
pub async fn execute(args: DeleteReplyArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;
    let video_id = VideoId::from_string(&args.video_id);
    let comment_id = CommentId::from_string(&args.comment_id);
    let reply_id = ReplyId::from_string(&args.reply_id);

    let comment = ctx.load_comment(&video_id, &comment_id).await?;
    let reply = comment
        .reply(&reply_id)
        .with_context(|| format!("Reply {} not found under {}", reply_id, comment_id))?;

    if !args.yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Delete reply by {}: \"{}\"?", reply.author_name, reply.text))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let spinner = spinner("Deleting reply");
    let deleted = ctx.lifecycle.delete_reply(&comment_id, &reply_id).await;
    spinner.finish_and_clear();
    deleted.context("Could not delete the reply")?;

    let status = ctx
        .lifecycle
        .comment(&comment_id)
        .map(|c| c.status().to_string())
        .unwrap_or_default();
    println!("{} Deleted reply {} (comment is now {})", "✓".green(), reply_id, status);
    Ok(())
}
