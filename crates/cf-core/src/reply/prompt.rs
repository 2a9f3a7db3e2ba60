//! Generation request composition

use super::tone::ToneLabel;
use crate::comment::Comment;
use crate::error::{CommentFlowError, Result};
use crate::settings::ReplyTone;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest template pool that still gives varied phrasing
pub const MIN_TEMPLATES: usize = 4;

/// Upper bound (exclusive) of the per-request seed
pub const SEED_RANGE: u32 = 100_000;

const COMMENT_PLACEHOLDER: &str = "{{comment}}";
const AUTHOR_PLACEHOLDER: &str = "{{author}}";
const TONE_PLACEHOLDER: &str = "{{tone}}";

const DEFAULT_TEMPLATES: [&str; 4] = [
    "Reply briefly and helpfully to this comment from {{author}}: \"{{comment}}\". Address them by name and keep a {{tone}} tone.",
    "Write a short, natural reply from the channel owner to \"{{comment}}\". Tone: {{tone}}. Keep it human and avoid stock phrases.",
    "Respond to the viewer comment \"{{comment}}\" in a {{tone}} tone, adding a brief follow-up question if it fits.",
    "Draft a unique, human-sounding reply to {{author}}, who wrote \"{{comment}}\". Tone hint: {{tone}}.",
];

static HTML_TAG: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"<[^>]+>").unwrap());

/// Tone sent with a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToneHint {
    /// Classified from the comment text
    Detected(ToneLabel),
    /// Taken from the channel's AI settings
    Preset(ReplyTone),
}

impl ToneHint {
    /// Label used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneHint::Detected(label) => label.as_str(),
            ToneHint::Preset(tone) => tone.as_str(),
        }
    }
}

impl fmt::Display for ToneHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload sent to the reply generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Comment text with markup removed
    pub comment_text: String,
    /// Comment author's display name
    pub author: String,
    /// Like count of the comment
    pub like_count: u64,
    /// Original publish time of the comment
    pub published_at: DateTime<Utc>,
    /// Tone to reply in
    pub tone: ToneHint,
    /// Variation seed for the generation service
    pub seed: u32,
    /// Fully substituted prompt
    pub prompt: String,
}

/// Result of [`PromptComposer::compose`]
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    /// The substituted prompt
    pub prompt: String,
    /// Request carrying the prompt and its inputs
    pub payload: GenerationRequest,
}

/// A pool of prompt templates to pick from
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePool {
    templates: Vec<String>,
}

impl TemplatePool {
    /// Create a pool, requiring enough templates that each carry the comment
    pub fn new(templates: Vec<String>) -> Result<Self> {
        if templates.len() < MIN_TEMPLATES {
            return Err(CommentFlowError::Config(format!(
                "template pool needs at least {} templates, got {}",
                MIN_TEMPLATES,
                templates.len()
            )));
        }
        if let Some(bad) = templates.iter().find(|t| !t.contains(COMMENT_PLACEHOLDER)) {
            return Err(CommentFlowError::Config(format!(
                "template is missing {}: {}",
                COMMENT_PLACEHOLDER, bad
            )));
        }
        Ok(Self { templates })
    }

    /// Pick one template uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.templates.len());
        &self.templates[index]
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the pool has no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in the pool
    pub fn templates(&self) -> &[String] {
        &self.templates
    }
}

impl Default for TemplatePool {
    fn default() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Builds generation requests from comments
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    pool: TemplatePool,
}

impl PromptComposer {
    /// Create a composer over the given template pool
    pub fn new(pool: TemplatePool) -> Self {
        Self { pool }
    }

    /// Get the template pool
    pub fn pool(&self) -> &TemplatePool {
        &self.pool
    }

    /// Compose a prompt and request payload for one comment
    pub fn compose<R: Rng + ?Sized>(
        &self,
        comment: &Comment,
        tone: ToneHint,
        rng: &mut R,
    ) -> ComposedPrompt {
        let text = sanitize_comment_text(&comment.text);
        let prompt = self
            .pool
            .pick(rng)
            .replace(COMMENT_PLACEHOLDER, &text)
            .replace(AUTHOR_PLACEHOLDER, &comment.author_name)
            .replace(TONE_PLACEHOLDER, tone.as_str());
        let seed = rng.gen_range(0..SEED_RANGE);

        ComposedPrompt {
            prompt: prompt.clone(),
            payload: GenerationRequest {
                comment_text: text,
                author: comment.author_name.clone(),
                like_count: comment.like_count,
                published_at: comment.published_at,
                tone,
                seed,
                prompt,
            },
        }
    }
}

/// Strip markup from feed-provided comment text
pub fn sanitize_comment_text(text: &str) -> String {
    let stripped = HTML_TAG.replace_all(text, "");
    stripped
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
