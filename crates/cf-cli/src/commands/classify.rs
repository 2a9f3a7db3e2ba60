//! Classify command
//!
//! Print the tone a comment would be answered in.

use anyhow::Result;
use cf_core::reply::{prompt::sanitize_comment_text, ToneClassifier};
use clap::Args;

/// Arguments for the classify command
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Comment text
    pub text: String,
}

/// Execute the classify command
pub fn execute(args: ClassifyArgs) -> Result<()> {
    let tone = ToneClassifier::classify(&sanitize_comment_text(&args.text));
    println!("{}", tone);
    Ok(())
}
