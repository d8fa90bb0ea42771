// Noise-level estimator - converts the dominant (category, confidence) pair
// into an estimated decibel value.
//
// estimated_db = baseline(category) + confidence * 10 * weight(category)
//
// This is a deliberately simple linear heuristic, not a calibrated acoustic
// model. Baselines and weights are fixed per category and loaded once at
// startup; a category missing from the loaded table falls back to the
// default profile instead of failing.

use serde::{Deserialize, Serialize};

use crate::config::ProfilesConfig;
use crate::taxonomy::{CategoryConfidence, SoundCategory};

/// Decibel span contributed by a full-confidence classification
pub const CONFIDENCE_SPAN_DB: f64 = 10.0;

/// Per-category static profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Scales the confidence contribution, in (0, 1]
    pub weight: f64,
    /// Typical loudness used as the additive offset
    pub baseline_db: f64,
}

impl CategoryProfile {
    pub const fn new(weight: f64, baseline_db: f64) -> Self {
        Self {
            weight,
            baseline_db,
        }
    }
}

/// Estimate for one classification event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseEstimate {
    pub category: SoundCategory,
    pub confidence: f64,
    pub decibels: f64,
}

/// Apply the linear heuristic to a profile
pub fn estimate_db(profile: &CategoryProfile, confidence: f64) -> f64 {
    profile.baseline_db + confidence * CONFIDENCE_SPAN_DB * profile.weight
}

/// Estimate the noise level for the top-ranked category entry
///
/// # Arguments
/// * `profiles` - loaded profile table (falls back internally for unknown
///   categories)
/// * `dominant` - top-ranked (category, confidence) pair from the mapper
pub fn estimate(profiles: &ProfilesConfig, dominant: &CategoryConfidence) -> NoiseEstimate {
    let profile = profiles.profile(dominant.category);
    NoiseEstimate {
        category: dominant.category,
        confidence: dominant.confidence,
        decibels: estimate_db(profile, dominant.confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfilesConfig;

    #[test]
    fn test_spec_scenario_traffic_estimate() {
        let profiles = ProfilesConfig::default();
        let dominant = CategoryConfidence {
            category: SoundCategory::Traffic,
            confidence: 0.6,
        };
        let estimate = estimate(&profiles, &dominant);
        // 75 + 0.6 * 10 * 0.8 = 79.8
        assert!((estimate.decibels - 79.8).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_in_confidence() {
        let profiles = ProfilesConfig::default();
        for category in SoundCategory::ALL {
            let mut previous = f64::NEG_INFINITY;
            for step in 0..=10 {
                let confidence = step as f64 / 10.0;
                let db = estimate_db(profiles.profile(category), confidence);
                assert!(
                    db >= previous,
                    "estimate for {:?} decreased at confidence {}",
                    category,
                    confidence
                );
                previous = db;
            }
        }
    }

    #[test]
    fn test_zero_confidence_yields_baseline() {
        let profiles = ProfilesConfig::default();
        let db = estimate_db(profiles.profile(SoundCategory::Construction), 0.0);
        assert!((db - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_category_uses_fallback_profile() {
        let mut profiles = ProfilesConfig::default();
        profiles.categories.remove("Nature");

        let profile = profiles.profile(SoundCategory::Nature);
        assert_eq!(*profile, profiles.fallback);
        // 45 + 1.0 * 10 * 0.5 = 50
        assert!((estimate_db(profile, 1.0) - 50.0).abs() < 1e-9);
    }
}
