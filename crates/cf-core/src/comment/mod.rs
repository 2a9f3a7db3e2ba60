//! Comment system module
//!
//! Handles the comment model, the comment store, and reply validation.

pub mod model;
pub mod manager;
pub mod validator;
pub mod builder;

pub use model::*;
pub use manager::CommentStore;
pub use validator::ReplyValidator;
pub use builder::CommentBuilder;
