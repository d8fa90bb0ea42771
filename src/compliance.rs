// Compliance evaluator - classifies an estimated decibel value against the
// WHO noise limits.
//
// The limits are named constants so they stay independently testable and
// overridable through ComplianceConfig. The daytime mapping has three bands
// (Safe / ExceedsLimit / Critical); the night mapping adds Moderate for the
// band between the night and daytime limits.

use serde::{Deserialize, Serialize};

use crate::config::ComplianceConfig;

/// WHO community noise guideline, night-time outdoor limit
pub const WHO_NIGHT_LIMIT_DB: f64 = 40.0;

/// WHO community noise guideline, daytime outdoor limit
pub const WHO_DAYTIME_LIMIT_DB: f64 = 55.0;

/// Level above which exposure is treated as a health risk
pub const WHO_CRITICAL_LIMIT_DB: f64 = 70.0;

/// Coarse compliance classification of an estimated decibel value
///
/// Ordered by severity; derives Ord so monotonicity is directly testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceVerdict {
    Safe,
    Moderate,
    ExceedsLimit,
    Critical,
}

impl ComplianceVerdict {
    /// Daytime mapping: < 55 Safe, [55, 70) ExceedsLimit, >= 70 Critical
    pub fn for_db(db: f64) -> Self {
        Self::for_db_with(db, &ComplianceConfig::default())
    }

    /// Daytime mapping against explicit limits
    pub fn for_db_with(db: f64, limits: &ComplianceConfig) -> Self {
        if db >= limits.critical_limit_db {
            ComplianceVerdict::Critical
        } else if db >= limits.daytime_limit_db {
            ComplianceVerdict::ExceedsLimit
        } else {
            ComplianceVerdict::Safe
        }
    }

    /// Night mapping: the band between the night and daytime limits is
    /// Moderate instead of Safe
    pub fn for_db_at_night(db: f64) -> Self {
        Self::for_db_at_night_with(db, &ComplianceConfig::default())
    }

    /// Night mapping against explicit limits
    pub fn for_db_at_night_with(db: f64, limits: &ComplianceConfig) -> Self {
        if db >= limits.critical_limit_db {
            ComplianceVerdict::Critical
        } else if db >= limits.daytime_limit_db {
            ComplianceVerdict::ExceedsLimit
        } else if db >= limits.night_limit_db {
            ComplianceVerdict::Moderate
        } else {
            ComplianceVerdict::Safe
        }
    }

    /// User-facing status text
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceVerdict::Safe => "Within Safe Limits",
            ComplianceVerdict::Moderate => "Exceeds Night Limit",
            ComplianceVerdict::ExceedsLimit => "Exceeds Daytime Limit",
            ComplianceVerdict::Critical => "Critical - Health Risk",
        }
    }

    pub fn exceeds_limit(&self) -> bool {
        !matches!(self, ComplianceVerdict::Safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daytime_boundaries_exact() {
        assert_eq!(ComplianceVerdict::for_db(54.9), ComplianceVerdict::Safe);
        assert_eq!(
            ComplianceVerdict::for_db(55.0),
            ComplianceVerdict::ExceedsLimit
        );
        assert_eq!(
            ComplianceVerdict::for_db(69.9),
            ComplianceVerdict::ExceedsLimit
        );
        assert_eq!(ComplianceVerdict::for_db(70.0), ComplianceVerdict::Critical);
    }

    #[test]
    fn test_daytime_monotone_in_db() {
        let mut previous = ComplianceVerdict::Safe;
        for tenth in 0..1400 {
            let db = tenth as f64 / 10.0;
            let verdict = ComplianceVerdict::for_db(db);
            assert!(verdict >= previous, "severity decreased at {} dB", db);
            previous = verdict;
        }
    }

    #[test]
    fn test_night_mapping_produces_moderate() {
        assert_eq!(
            ComplianceVerdict::for_db_at_night(39.9),
            ComplianceVerdict::Safe
        );
        assert_eq!(
            ComplianceVerdict::for_db_at_night(40.0),
            ComplianceVerdict::Moderate
        );
        assert_eq!(
            ComplianceVerdict::for_db_at_night(54.9),
            ComplianceVerdict::Moderate
        );
        assert_eq!(
            ComplianceVerdict::for_db_at_night(55.0),
            ComplianceVerdict::ExceedsLimit
        );
        assert_eq!(
            ComplianceVerdict::for_db_at_night(70.0),
            ComplianceVerdict::Critical
        );
    }

    #[test]
    fn test_overridden_limits() {
        let limits = ComplianceConfig {
            night_limit_db: 30.0,
            daytime_limit_db: 50.0,
            critical_limit_db: 65.0,
        };
        assert_eq!(
            ComplianceVerdict::for_db_with(52.0, &limits),
            ComplianceVerdict::ExceedsLimit
        );
        assert_eq!(
            ComplianceVerdict::for_db_with(65.0, &limits),
            ComplianceVerdict::Critical
        );
        assert_eq!(
            ComplianceVerdict::for_db_at_night_with(35.0, &limits),
            ComplianceVerdict::Moderate
        );
    }

    #[test]
    fn test_exceeds_limit_flag() {
        assert!(!ComplianceVerdict::Safe.exceeds_limit());
        assert!(ComplianceVerdict::Moderate.exceeds_limit());
        assert!(ComplianceVerdict::ExceedsLimit.exceeds_limit());
        assert!(ComplianceVerdict::Critical.exceeds_limit());
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            ComplianceVerdict::for_db(79.8).label(),
            "Critical - Health Risk"
        );
        assert_eq!(ComplianceVerdict::for_db(45.0).label(), "Within Safe Limits");
    }
}
