//! Tone classification of incoming comments

use crate::error::{CommentFlowError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse intent of a comment, used to steer reply generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneLabel {
    /// Gratitude or praise
    Thankful,
    /// A question or a request for information
    Informative,
    /// A complaint or a reported problem
    ApologeticHelpful,
    /// Anything else
    Friendly,
}

impl ToneLabel {
    /// Label used in prompts and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneLabel::Thankful => "thankful",
            ToneLabel::Informative => "informative",
            ToneLabel::ApologeticHelpful => "apologetic_helpful",
            ToneLabel::Friendly => "friendly",
        }
    }
}

impl fmt::Display for ToneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneLabel {
    type Err = CommentFlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thankful" => Ok(ToneLabel::Thankful),
            "informative" => Ok(ToneLabel::Informative),
            "apologetic_helpful" => Ok(ToneLabel::ApologeticHelpful),
            "friendly" => Ok(ToneLabel::Friendly),
            other => Err(CommentFlowError::Validation(format!(
                "Unknown tone label: {}",
                other
            ))),
        }
    }
}

/// Ordered rules; the first match wins.
static TONE_RULES: Lazy<Vec<(ToneLabel, Regex)>> = Lazy::new(|| {
    vec![
        (
            ToneLabel::Thankful,
            Regex::new(r"(?i)\b(thanks|thank you|love|great|awesome|nice)\b").unwrap(),
        ),
        (
            ToneLabel::Informative,
            Regex::new(r"(?i)\b(how|what|why|when|where|do|does|can|could|help)\b").unwrap(),
        ),
        (
            ToneLabel::ApologeticHelpful,
            Regex::new(r"(?i)\b(not working|issue|problem|error|help|bug|complain)\b").unwrap(),
        ),
    ]
});

/// Maps comment text to a [`ToneLabel`]
pub struct ToneClassifier;

impl ToneClassifier {
    /// Classify a comment by whole-word, case-insensitive marker matching
    pub fn classify(text: &str) -> ToneLabel {
        TONE_RULES
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(label, _)| *label)
            .unwrap_or(ToneLabel::Friendly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gratitude_wins_over_question() {
        assert_eq!(
            ToneClassifier::classify("Thanks, how long does this last?"),
            ToneLabel::Thankful
        );
    }

    #[test]
    fn test_thankful_markers() {
        assert_eq!(ToneClassifier::classify("I LOVE this channel"), ToneLabel::Thankful);
        assert_eq!(ToneClassifier::classify("thank you so much"), ToneLabel::Thankful);
        assert_eq!(ToneClassifier::classify("Nice."), ToneLabel::Thankful);
    }

    #[test]
    fn test_question_is_informative() {
        assert_eq!(
            ToneClassifier::classify("Which one would you recommend? Could you compare?"),
            ToneLabel::Informative
        );
        assert_eq!(
            ToneClassifier::classify("How does it handle 8K video editing?"),
            ToneLabel::Informative
        );
    }

    #[test]
    fn test_problem_is_apologetic() {
        assert_eq!(
            ToneClassifier::classify("The download link is not working"),
            ToneLabel::ApologeticHelpful
        );
        assert_eq!(
            ToneClassifier::classify("Found a bug in the sample code"),
            ToneLabel::ApologeticHelpful
        );
    }

    #[test]
    fn test_no_marker_is_friendly() {
        assert_eq!(ToneClassifier::classify("First!"), ToneLabel::Friendly);
        assert_eq!(ToneClassifier::classify(""), ToneLabel::Friendly);
    }

    #[test]
    fn test_whole_words_only() {
        // "complaint", "greatly" and "downloading" contain markers only as fragments
        assert_eq!(
            ToneClassifier::classify("My complaint stands, greatly disappointed, downloading now"),
            ToneLabel::Friendly
        );
        assert_eq!(ToneClassifier::classify("nicer shots"), ToneLabel::Friendly);
    }

    #[test]
    fn test_label_parse_and_display() {
        assert_eq!(
            "apologetic_helpful".parse::<ToneLabel>().unwrap(),
            ToneLabel::ApologeticHelpful
        );
        assert!("grumpy".parse::<ToneLabel>().is_err());
        assert_eq!(ToneLabel::Informative.to_string(), "informative");
        assert_eq!(
            serde_json::to_string(&ToneLabel::ApologeticHelpful).unwrap(),
            "\"apologetic_helpful\""
        );
    }
}
