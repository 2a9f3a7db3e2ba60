//! cf-integration - Backend integration library for commentflow
//!
//! This crate connects the core to the dashboard backend over HTTP.
//!
//! ## Features
//!
//! - `CommentService` implementation backed by `reqwest`
//! - Mapping from the comment feed's wire format to core types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cf_integration::HttpCommentService;
//!
//! let service = HttpCommentService::new(&config.api)?;
//! let threads = service.fetch_comments(&video_id).await?;
//! ```

pub mod http;
pub mod wire;

pub use http::HttpCommentService;
