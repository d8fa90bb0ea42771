// Taxonomy mapper - folds open-ended audio-tagging labels into the fixed
// sound-source categories used for monitoring.
//
// The model collaborator emits arbitrarily-named (label, score) pairs.
// Each label is claimed by at most one category via case-insensitive
// substring matching against the category keyword table; unmatched labels
// accumulate into Other. Scores are summed per category and only then
// clamped to 1.0, so near-duplicate labels can push a category past 1.0
// before the clamp. That is accepted behavior, not an error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Fixed sound-source categories
///
/// The closed set every classification is folded into. Declaration order is
/// the match order of the keyword table and the stable tie order of ranked
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCategory {
    Traffic,
    Construction,
    Nature,
    Human,
    Industrial,
    Other,
}

impl SoundCategory {
    /// All categories, in declaration order
    pub const ALL: [SoundCategory; 6] = [
        SoundCategory::Traffic,
        SoundCategory::Construction,
        SoundCategory::Nature,
        SoundCategory::Human,
        SoundCategory::Industrial,
        SoundCategory::Other,
    ];

    /// Position in `ALL`, used for accumulator indexing
    pub fn index(&self) -> usize {
        match self {
            SoundCategory::Traffic => 0,
            SoundCategory::Construction => 1,
            SoundCategory::Nature => 2,
            SoundCategory::Human => 3,
            SoundCategory::Industrial => 4,
            SoundCategory::Other => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCategory::Traffic => "Traffic",
            SoundCategory::Construction => "Construction",
            SoundCategory::Nature => "Nature",
            SoundCategory::Human => "Human",
            SoundCategory::Industrial => "Industrial",
            SoundCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (label, score) pair as emitted by the model collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Where a classification came from
///
/// Synthetic results stand in for the model when it is unavailable and must
/// stay distinguishable from real output all the way downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Model,
    Synthetic,
}

/// Confidence accumulated for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfidence {
    pub category: SoundCategory,
    pub confidence: f64,
}

/// Ranked classification over the fixed category set
///
/// Always holds one entry per category, sorted non-increasing by confidence
/// with ties broken by category declaration order. Confidences are clamped
/// to [0, 1] after accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub ranked: Vec<CategoryConfidence>,
    pub origin: Origin,
}

impl Classification {
    /// Top-ranked category entry
    pub fn dominant(&self) -> &CategoryConfidence {
        // ranked is never empty: from_totals always emits all six categories
        &self.ranked[0]
    }

    /// Confidence for a specific category (0.0 if absent)
    pub fn confidence_for(&self, category: SoundCategory) -> f64 {
        self.ranked
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.confidence)
            .unwrap_or(0.0)
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }
}

/// Keyword table, matched in category declaration order. Other is the
/// fallback bucket and carries no keywords.
const TRAFFIC_KEYWORDS: &[&str] = &[
    "car", "traffic", "vehicle", "truck", "motorcycle", "engine", "horn", "bus", "road",
    "highway", "siren", "train", "tire", "brake",
];
const CONSTRUCTION_KEYWORDS: &[&str] = &[
    "construction",
    "drill",
    "hammer",
    "jackhammer",
    "saw",
    "excavat",
    "bulldozer",
    "demolition",
    "concrete",
];
const NATURE_KEYWORDS: &[&str] = &[
    "bird", "wind", "rain", "thunder", "water", "stream", "insect", "cricket", "dog", "animal",
    "leaves", "nature",
];
const HUMAN_KEYWORDS: &[&str] = &[
    "speech",
    "voice",
    "music",
    "crowd",
    "laugh",
    "shout",
    "conversation",
    "footstep",
    "party",
    "singing",
    "children",
    "applause",
];
const INDUSTRIAL_KEYWORDS: &[&str] = &[
    "industrial",
    "factory",
    "machine",
    "equipment",
    "generator",
    "compressor",
    "fan",
    "motor",
    "turbine",
    "pump",
];

fn keywords_for(category: SoundCategory) -> &'static [&'static str] {
    match category {
        SoundCategory::Traffic => TRAFFIC_KEYWORDS,
        SoundCategory::Construction => CONSTRUCTION_KEYWORDS,
        SoundCategory::Nature => NATURE_KEYWORDS,
        SoundCategory::Human => HUMAN_KEYWORDS,
        SoundCategory::Industrial => INDUSTRIAL_KEYWORDS,
        SoundCategory::Other => &[],
    }
}

/// Claim a lowercased label for exactly one category
///
/// First category (in declaration order) with a keyword substring hit wins;
/// labels nothing claims land in Other.
pub fn categorize(label_lower: &str) -> SoundCategory {
    for category in SoundCategory::ALL {
        if keywords_for(category)
            .iter()
            .any(|keyword| label_lower.contains(keyword))
        {
            return category;
        }
    }
    SoundCategory::Other
}

/// Fold model output into a ranked classification
///
/// # Arguments
/// * `labels` - (label, score) pairs from the model collaborator
///
/// # Returns
/// A `Classification` tagged `Origin::Model`, one entry per category,
/// clamped and sorted. Never fails; an empty input yields all-zero
/// confidences (callers that want the synthetic fallback for empty model
/// output decide that before calling).
pub fn map_labels(labels: &[LabelScore]) -> Classification {
    let mut totals = [0.0f64; 6];
    for entry in labels {
        let category = categorize(&entry.label.to_lowercase());
        totals[category.index()] += entry.score;
    }
    from_totals(totals, Origin::Model)
}

/// Clamp-and-sort path shared by the mapper and the synthetic fallback
pub(crate) fn from_totals(totals: [f64; 6], origin: Origin) -> Classification {
    let mut ranked: Vec<CategoryConfidence> = SoundCategory::ALL
        .iter()
        .map(|&category| CategoryConfidence {
            category,
            confidence: totals[category.index()].clamp(0.0, 1.0),
        })
        .collect();

    // Stable sort keeps declaration order for equal confidences
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    Classification { ranked, origin }
}

#[cfg(test)]
#[path = "taxonomy_tests.rs"]
mod tests;
