//! Settings command
//!
//! View and change the AI reply settings. Every change edits a copy of the
//! saved settings and saves the whole object back.

use crate::context::settings_manager;
use anyhow::Result;
use cf_core::settings::{AiSettings, ReplyTone, SettingsManager};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

/// On/off switch for boolean settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        self == Toggle::On
    }
}

/// Settings subcommands
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show current settings
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the reply tone (friendly, professional, casual)
    Tone { tone: ReplyTone },

    /// Set the maximum reply length (100-1000 characters)
    MaxLength { length: usize },

    /// Turn the auto-reply sweep on or off
    AutoReply { state: Toggle },

    /// Turn the spam filter on or off
    SpamFilter { state: Toggle },

    /// Manage blacklisted words
    #[command(subcommand)]
    Blacklist(BlacklistCommand),

    /// Reset settings to defaults
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Blacklist subcommands
#[derive(Debug, Subcommand)]
pub enum BlacklistCommand {
    /// List blacklisted words
    List,
    /// Add a word or phrase
    Add { word: String },
    /// Remove a word or phrase
    Remove { word: String },
}

/// Execute the settings command
pub fn execute(cmd: SettingsCommand) -> Result<()> {
    let mut manager = settings_manager()?;

    match cmd {
        SettingsCommand::Show { json } => show_settings(manager.current(), json),
        SettingsCommand::Tone { tone } => update(&mut manager, |s| s.tone = tone),
        SettingsCommand::MaxLength { length } => {
            update(&mut manager, |s| s.max_reply_length = length)
        }
        SettingsCommand::AutoReply { state } => {
            update(&mut manager, |s| s.auto_reply_enabled = state.enabled())
        }
        SettingsCommand::SpamFilter { state } => {
            update(&mut manager, |s| s.spam_filter_enabled = state.enabled())
        }
        SettingsCommand::Blacklist(cmd) => blacklist(&mut manager, cmd),
        SettingsCommand::Reset { force } => reset_settings(&mut manager, force),
    }
}

fn update(manager: &mut SettingsManager, edit: impl FnOnce(&mut AiSettings)) -> Result<()> {
    let mut settings = manager.current().clone();
    edit(&mut settings);
    manager.save(settings)?;
    println!("{} Settings saved.", "✓".green());
    Ok(())
}

fn blacklist(manager: &mut SettingsManager, cmd: BlacklistCommand) -> Result<()> {
    match cmd {
        BlacklistCommand::List => {
            let words = manager.current().blacklist_words.words();
            if words.is_empty() {
                println!("The blacklist is empty.");
            }
            for word in words {
                println!("  {}", word);
            }
            Ok(())
        }
        BlacklistCommand::Add { word } => {
            let mut settings = manager.current().clone();
            if !settings.blacklist_words.add(&word) {
                println!("{} \"{}\" is empty or already blacklisted.", "⚠".yellow(), word.trim());
                return Ok(());
            }
            manager.save(settings)?;
            println!("{} Added \"{}\" to the blacklist.", "✓".green(), word.trim());
            Ok(())
        }
        BlacklistCommand::Remove { word } => {
            let mut settings = manager.current().clone();
            if !settings.blacklist_words.remove(&word) {
                println!("{} \"{}\" is not blacklisted.", "⚠".yellow(), word);
                return Ok(());
            }
            manager.save(settings)?;
            println!("{} Removed \"{}\" from the blacklist.", "✓".green(), word);
            Ok(())
        }
    }
}

fn show_settings(settings: &AiSettings, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    let on_off = |enabled: bool| if enabled { "on".green() } else { "off".red() };

    println!("{}", "AI settings:".bold().underline());
    println!();
    println!("  Tone:              {}", settings.tone.to_string().cyan());
    println!("  Max reply length:  {}", settings.max_reply_length);
    println!("  Auto-reply:        {}", on_off(settings.auto_reply_enabled));
    println!("  Spam filter:       {}", on_off(settings.spam_filter_enabled));
    println!(
        "  Blacklist:         {}",
        settings.blacklist_words.words().join(", ").dimmed()
    );
    Ok(())
}

fn reset_settings(manager: &mut SettingsManager, force: bool) -> Result<()> {
    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset AI settings to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    manager.reset()?;
    println!("{} Settings reset to defaults.", "✓".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert!(Toggle::On.enabled());
        assert!(!Toggle::Off.enabled());
    }
}
