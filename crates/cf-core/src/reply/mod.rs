//! Reply preparation
//!
//! Tone classification, spam filtering, and generation request composition.
//! Everything here is pure; network effects live in the lifecycle module.

pub mod tone;
pub mod spam;
pub mod prompt;

pub use tone::{ToneClassifier, ToneLabel};
pub use spam::SpamFilter;
pub use prompt::{ComposedPrompt, GenerationRequest, PromptComposer, TemplatePool, ToneHint};
