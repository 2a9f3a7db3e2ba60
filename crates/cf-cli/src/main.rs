//! commentflow - reply to video comments from the terminal
//!
//! Lists a video's comments, drafts replies with the generation service,
//! posts or deletes them, and reports channel stats.
//!
//! ## Quick Start
//!
//! ```bash
//! # List comments on a video
//! commentflow comments dQw4w9WgXcQ
//!
//! # Draft and post a reply
//! commentflow reply dQw4w9WgXcQ UgzTop1
//!
//! # Reply to every pending comment
//! commentflow auto-reply dQw4w9WgXcQ
//! ```

mod commands;
mod context;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = commands::run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
