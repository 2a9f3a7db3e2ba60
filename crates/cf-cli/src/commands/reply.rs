//! Reply command
//!
//! Open a comment, draft a reply (typed or generated), confirm, and post it.

use crate::context::{spinner, AppContext, GlobalOptions};
use anyhow::{Context, Result};
use cf_core::reply::prompt::sanitize_comment_text;
use cf_core::types::{CommentId, VideoId};
use clap::Args;
use colored::Colorize;

/// Arguments for the reply command
#[derive(Debug, Args)]
pub struct ReplyArgs {
    /// Video ID
    pub video_id: String,

    /// Top-level comment ID
    pub comment_id: String,

    /// Reply text; generated when omitted
    #[arg(long, short)]
    pub text: Option<String>,

    /// Post without confirmation
    #[arg(long, short)]
    pub yes: bool,
}

/// Execute the reply command
pub async fn execute(args: ReplyArgs, options: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::new(options)?;
    let video_id = VideoId::from_string(&args.video_id);
    let comment_id = CommentId::from_string(&args.comment_id);

    let comment = ctx.load_comment(&video_id, &comment_id).await?;
    println!("{} {}", comment.author_name.cyan(), "wrote:".dimmed());
    println!("  {}", sanitize_comment_text(&comment.text));
    println!();

    ctx.lifecycle.open(&comment_id)?;

    match args.text {
        Some(text) => ctx.lifecycle.edit_draft(text)?,
        None => {
            let spinner = spinner("Generating reply");
            let generated = ctx.lifecycle.generate(&comment_id).await;
            spinner.finish_and_clear();
            generated.context("Could not generate a reply")?;
        }
    }

    let draft = ctx.lifecycle.draft().unwrap_or_default();
    println!("{}", "Reply:".bold());
    println!("  {}", draft);
    println!();

    if !args.yes {
        use dialoguer::{Confirm, Input};

        let edited: String = Input::new()
            .with_prompt("Edit reply (enter to keep)")
            .with_initial_text(draft)
            .interact_text()?;
        ctx.lifecycle.edit_draft(edited)?;

        let confirmed = Confirm::new()
            .with_prompt("Post this reply?")
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.lifecycle.close();
            println!("Reply discarded.");
            return Ok(());
        }
    }

    let spinner = spinner("Posting reply");
    let posted = ctx.lifecycle.submit(&comment_id).await;
    spinner.finish_and_clear();
    posted.context("Could not post the reply")?;

    println!("{} Reply posted to {}", "✓".green(), comment_id);
    Ok(())
}
