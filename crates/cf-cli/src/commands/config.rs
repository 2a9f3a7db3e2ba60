//! Config command
//!
//! Manage commentflow configuration.

use crate::context::{read_config, GlobalOptions};
use anyhow::{Context, Result};
use cf_core::config::Config;
use clap::Subcommand;
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, options: &GlobalOptions) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(options, json),
        ConfigCommand::Path => {
            println!("{}", options.config_path().display());
            Ok(())
        }
        ConfigCommand::Reset { force } => reset_config(&options.config_path(), force),
        ConfigCommand::Validate => validate_config(&options.config_path()),
    }
}

fn show_config(options: &GlobalOptions, as_json: bool) -> Result<()> {
    let config = options.load_config()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = options.config_path();
    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no configuration file)".dimmed());
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn reset_config(config_path: &Path, force: bool) -> Result<()> {
    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    let content = format!(
        "# commentflow configuration\n\n{}",
        toml::to_string_pretty(&Config::default())?
    );

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(config_path, content)?;

    println!("{} Configuration reset to defaults.", "✓".green());
    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            config_path.display()
        );
        return Ok(());
    }

    let config = read_config(config_path)?;
    println!("{} Configuration is valid TOML", "✓".green());

    match config.validate() {
        Ok(()) => println!("{} All values are in range", "✓".green()),
        Err(e) => anyhow::bail!("{} {}", "✗".red(), e),
    }
    Ok(())
}
