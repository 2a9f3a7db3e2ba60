//! cf-core - Core library for commentflow
//!
//! This crate provides the core logic for replying to video comments:
//! tone classification, spam filtering, prompt composition, the reply
//! lifecycle, AI settings, and dashboard statistics.

pub mod error;
pub mod types;
pub mod config;
pub mod comment;
pub mod reply;
pub mod settings;
pub mod api;
pub mod lifecycle;
pub mod stats;

pub use error::{CommentFlowError, Result};
pub use types::*;
