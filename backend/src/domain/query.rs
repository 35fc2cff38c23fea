//! Question validation and keyword classification.
//!
//! The keyword rules are the deterministic baseline; the advisor prefers the
//! language model's verdict when it is reachable and falls back to these
//! otherwise.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest question accepted, in characters.
pub const QUESTION_MAX_CHARS: usize = 2000;

static GOLD_KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
static YES_NO_RE: OnceLock<Regex> = OnceLock::new();

fn gold_keyword_regex() -> &'static Regex {
    GOLD_KEYWORD_RE.get_or_init(|| {
        let pattern = r"(?i)\b(?:gold|digital gold|xau)\b";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("gold keyword regex failed to compile: {error}"))
    })
}

fn yes_no_regex() -> &'static Regex {
    YES_NO_RE.get_or_init(|| {
        // Only a leading whole word counts; "Not sure" is neither.
        let pattern = r"(?i)^\s*(yes|no)\b";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("yes/no regex failed to compile: {error}"))
    })
}

/// Validation failures for [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionValidationError {
    /// Blank after trimming.
    #[error("question must not be empty")]
    Empty,
    /// Longer than [`QUESTION_MAX_CHARS`].
    #[error("question must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// A trimmed, bounded user question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Trim and validate raw input.
    ///
    /// # Examples
    /// ```
    /// use kuber::domain::Question;
    ///
    /// let q = Question::new("  Is gold a good buy?  ").expect("valid question");
    /// assert_eq!(q.as_str(), "Is gold a good buy?");
    /// assert!(Question::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, QuestionValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(QuestionValidationError::Empty);
        }
        if trimmed.chars().count() > QUESTION_MAX_CHARS {
            return Err(QuestionValidationError::TooLong {
                max: QUESTION_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Question text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the user wants to know about gold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Today's price.
    CurrentPrice,
    /// Past movement.
    History,
    /// Where the price is heading.
    Prediction,
    /// Anything else about gold.
    GeneralInfo,
}

impl QueryIntent {
    /// Every intent, in classification priority order.
    pub const ALL: [Self; 4] = [
        Self::CurrentPrice,
        Self::History,
        Self::Prediction,
        Self::GeneralInfo,
    ];

    /// Label used in prompts and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentPrice => "current_price",
            Self::History => "history",
            Self::Prediction => "prediction",
            Self::GeneralInfo => "general_info",
        }
    }

    /// Map a free-text model reply such as `"history."` onto an intent.
    ///
    /// # Examples
    /// ```
    /// use kuber::domain::QueryIntent;
    ///
    /// assert_eq!(QueryIntent::parse_llm_label(" Prediction.\n"), Some(QueryIntent::Prediction));
    /// assert_eq!(QueryIntent::parse_llm_label("no idea"), None);
    /// ```
    #[must_use]
    pub fn parse_llm_label(label: &str) -> Option<Self> {
        let normalised = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| normalised.contains(intent.as_str()))
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the question mentions gold as a whole word.
#[must_use]
pub fn is_gold_by_keyword(question: &str) -> bool {
    gold_keyword_regex().is_match(question)
}

/// Keyword intent classification.
///
/// # Examples
/// ```
/// use kuber::domain::{QueryIntent, classify_by_keyword};
///
/// assert_eq!(classify_by_keyword("What is the gold rate today?"), QueryIntent::CurrentPrice);
/// assert_eq!(classify_by_keyword("Why do people buy gold?"), QueryIntent::GeneralInfo);
/// ```
#[must_use]
pub fn classify_by_keyword(question: &str) -> QueryIntent {
    const RULES: [(QueryIntent, &[&str]); 3] = [
        (QueryIntent::CurrentPrice, &["price", "rate", "current", "today"]),
        (QueryIntent::History, &["history", "past", "last", "trend"]),
        (QueryIntent::Prediction, &["predict", "forecast", "future", "will"]),
    ];

    let lowered = question.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or(QueryIntent::GeneralInfo, |(intent, _)| *intent)
}

/// Interpret a yes/no reply from the model. `None` when it is neither.
#[must_use]
pub fn parse_yes_no(reply: &str) -> Option<bool> {
    let answer = yes_no_regex().captures(reply)?.get(1)?;
    Some(answer.as_str().eq_ignore_ascii_case("yes"))
}
