// Citizen feedback - free-text noise report validation and keyword analysis.
//
// Reports are validated (non-empty, length cap), scanned for noise-source /
// urgency / time-of-day keywords, and given a crude word-count sentiment.
// Submission itself is the FeedbackTransport collaborator's concern; this
// module is pure.

use serde::{Deserialize, Serialize};

use crate::aggregator::GeoPoint;
use crate::config::FeedbackConfig;
use crate::error::FeedbackError;

/// A free-text noise report as received from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub text: String,
    pub location: Option<GeoPoint>,
    pub noise_level_db: Option<f64>,
}

/// Urgency derived from report wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Crude word-count sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

/// Keyword analysis of one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    pub noise_sources: Vec<String>,
    pub urgency: Urgency,
    pub time_indicators: Vec<String>,
    pub sentiment: Sentiment,
}

/// Validated report plus its analysis, ready for the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub report: FeedbackReport,
    pub analysis: FeedbackAnalysis,
}

const SOURCE_BUCKETS: &[(&str, &[&str])] = &[
    ("traffic", &["car", "traffic", "vehicle", "truck", "motorcycle"]),
    (
        "construction",
        &["construction", "drill", "hammer", "building", "work"],
    ),
    ("human", &["music", "party", "loud", "neighbor", "voice"]),
    ("emergency", &["siren", "alarm", "emergency"]),
    (
        "industrial",
        &["industrial", "factory", "machine", "equipment"],
    ),
];

const HIGH_URGENCY_WORDS: &[&str] = &["urgent", "emergency", "extremely", "unbearable", "constant"];
const MEDIUM_URGENCY_WORDS: &[&str] = &["loud", "disruptive", "annoying", "frequent"];

const TIME_BUCKETS: &[(&str, &[&str])] = &[
    ("night", &["night", "evening", "late"]),
    ("morning", &["morning", "early"]),
    ("day", &["day", "afternoon"]),
];

const NEGATIVE_WORDS: &[&str] = &[
    "terrible",
    "awful",
    "annoying",
    "disturbing",
    "unbearable",
    "loud",
    "noise",
];
const POSITIVE_WORDS: &[&str] = &["quiet", "peaceful", "better", "improved", "good"];

/// Validate a report against the configured length cap
///
/// Trims surrounding whitespace; the trimmed text is what gets analyzed and
/// submitted.
pub fn validate(text: &str, config: &FeedbackConfig) -> Result<String, FeedbackError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FeedbackError::EmptyFeedback);
    }
    let chars = trimmed.chars().count();
    if chars > config.max_chars {
        return Err(FeedbackError::TooLong {
            chars,
            limit: config.max_chars,
        });
    }
    Ok(trimmed.to_string())
}

/// Analyze report text for noise sources, urgency, time of day and sentiment
pub fn analyze(text: &str) -> FeedbackAnalysis {
    let lower = text.to_lowercase();

    let noise_sources = SOURCE_BUCKETS
        .iter()
        .filter(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(source, _)| source.to_string())
        .collect();

    let urgency = if HIGH_URGENCY_WORDS.iter().any(|word| lower.contains(word)) {
        Urgency::High
    } else if MEDIUM_URGENCY_WORDS.iter().any(|word| lower.contains(word)) {
        Urgency::Medium
    } else {
        Urgency::Low
    };

    let time_indicators = TIME_BUCKETS
        .iter()
        .filter(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(indicator, _)| indicator.to_string())
        .collect();

    let negative = NEGATIVE_WORDS
        .iter()
        .filter(|word| lower.contains(*word))
        .count();
    let positive = POSITIVE_WORDS
        .iter()
        .filter(|word| lower.contains(*word))
        .count();
    let sentiment = match negative.cmp(&positive) {
        std::cmp::Ordering::Greater => Sentiment::Negative,
        std::cmp::Ordering::Less => Sentiment::Positive,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    FeedbackAnalysis {
        noise_sources,
        urgency,
        time_indicators,
        sentiment,
    }
}
