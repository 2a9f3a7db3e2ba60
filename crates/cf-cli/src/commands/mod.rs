//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod auto_reply;
pub mod check_spam;
pub mod classify;
pub mod comments;
pub mod config;
pub mod delete_reply;
pub mod reply;
pub mod settings;
pub mod stats;
pub mod videos;

use crate::context::GlobalOptions;
use clap::{Parser, Subcommand};

/// commentflow - reply to your channel's comments from the terminal
#[derive(Debug, Parser)]
#[command(name = "commentflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Backend URL, overriding the configuration file
    #[arg(long, global = true, env = "COMMENTFLOW_API_URL")]
    pub api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the comments on a video
    Comments(comments::CommentsArgs),

    /// List the channel's recent videos
    Videos(videos::VideosArgs),

    /// Classify the tone of a comment
    Classify(classify::ClassifyArgs),

    /// Check a comment against the spam blacklist
    CheckSpam(check_spam::CheckSpamArgs),

    /// Draft and post a reply to a comment
    Reply(reply::ReplyArgs),

    /// Delete a posted reply
    DeleteReply(delete_reply::DeleteReplyArgs),

    /// Reply to every pending comment on a video
    AutoReply(auto_reply::AutoReplyArgs),

    /// Show dashboard statistics
    Stats(stats::StatsArgs),

    /// Show comment and reply counts for this week
    Weekly(stats::WeeklyArgs),

    /// Manage AI reply settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let options = GlobalOptions {
        config: cli.config,
        api_url: cli.api_url,
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Comments(args) => comments::execute(args, &options).await,
        Commands::Videos(args) => videos::execute(args, &options).await,
        Commands::Classify(args) => classify::execute(args),
        Commands::CheckSpam(args) => check_spam::execute(args),
        Commands::Reply(args) => reply::execute(args, &options).await,
        Commands::DeleteReply(args) => delete_reply::execute(args, &options).await,
        Commands::AutoReply(args) => auto_reply::execute(args, &options).await,
        Commands::Stats(args) => stats::execute(args, &options).await,
        Commands::Weekly(args) => stats::execute_weekly(args, &options).await,
        Commands::Settings(cmd) => settings::execute(cmd),
        Commands::Config(cmd) => config::execute(cmd, &options),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
