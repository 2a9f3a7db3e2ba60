//! Reply draft validation

use crate::error::{CommentFlowError, Result};
use crate::settings::{MAX_REPLY_LENGTH_RANGE, DEFAULT_MAX_REPLY_LENGTH};

/// Minimum reply length
pub const MIN_REPLY_LENGTH: usize = 1;

/// Validator for reply text before it is submitted
pub struct ReplyValidator {
    max_length: usize,
    min_length: usize,
}

impl ReplyValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: DEFAULT_MAX_REPLY_LENGTH,
            min_length: MIN_REPLY_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            min_length: MIN_REPLY_LENGTH,
        }
    }

    /// Validate reply content
    pub fn validate(&self, content: &str) -> Result<()> {
        let trimmed = content.trim();
        let length = trimmed.chars().count();

        if length < self.min_length {
            return Err(CommentFlowError::Validation(
                "Reply text cannot be empty".to_string(),
            ));
        }

        if length > self.max_length {
            return Err(CommentFlowError::Validation(format!(
                "Reply exceeds maximum length of {} characters ({} given)",
                self.max_length, length
            )));
        }

        Ok(())
    }

    /// Validate a configured max reply length
    pub fn validate_max_length(max_length: usize) -> Result<()> {
        if MAX_REPLY_LENGTH_RANGE.contains(&max_length) {
            Ok(())
        } else {
            Err(CommentFlowError::Validation(format!(
                "max_reply_length must be between {} and {} (got {})",
                MAX_REPLY_LENGTH_RANGE.start(),
                MAX_REPLY_LENGTH_RANGE.end(),
                max_length
            )))
        }
    }
}

impl Default for ReplyValidator {
    fn default() -> Self {
        Self::new()
    }
}
