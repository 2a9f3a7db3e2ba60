//! Check-spam command
//!
//! Test a comment against the saved blacklist.

use crate::context::settings_manager;
use anyhow::Result;
use cf_core::reply::SpamFilter;
use clap::Args;
use colored::Colorize;

/// Arguments for the check-spam command
#[derive(Debug, Args)]
pub struct CheckSpamArgs {
    /// Comment text
    pub text: String,

    /// Extra blacklist words, checked in addition to the saved ones
    #[arg(long = "word", short = 'w')]
    pub words: Vec<String>,
}

/// Execute the check-spam command
pub fn execute(args: CheckSpamArgs) -> Result<()> {
    let settings = settings_manager()?.current().clone();
    let mut blacklist = settings.blacklist_words.clone();
    for word in &args.words {
        blacklist.add(word);
    }

    match SpamFilter::first_match(&args.text, &blacklist) {
        Some(word) => {
            println!("{} blocked (matches \"{}\")", "✗".red(), word);
            if !settings.spam_filter_enabled {
                println!(
                    "{} The spam filter is disabled, so this comment would still be answered.",
                    "⚠".yellow()
                );
            }
        }
        None => println!("{} not blocked", "✓".green()),
    }
    Ok(())
}
