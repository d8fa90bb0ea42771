//! Configuration management for the monitoring pipeline
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling parameter changes without recompilation. Category profiles,
//! compliance limits, the geolocation fallback anchor, upload validation
//! bounds and the server binding can all be adjusted via the config file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregator::{
    FALLBACK_ANCHOR_LATITUDE, FALLBACK_ANCHOR_LONGITUDE, FALLBACK_JITTER_DEGREES,
};
use crate::compliance::{WHO_CRITICAL_LIMIT_DB, WHO_DAYTIME_LIMIT_DB, WHO_NIGHT_LIMIT_DB};
use crate::estimator::CategoryProfile;
use crate::taxonomy::SoundCategory;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub profiles: ProfilesConfig,
    pub compliance: ComplianceConfig,
    pub fallback: FallbackConfig,
    pub ingest: IngestConfig,
    pub feedback: FeedbackConfig,
    pub server: ServerConfig,
}

/// Per-category estimator profiles
///
/// Keyed by category name so a config file can override a subset; any
/// category missing from the map resolves to the fallback profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    pub categories: BTreeMap<String, CategoryProfile>,
    pub fallback: CategoryProfile,
}

impl ProfilesConfig {
    /// Resolve the profile for a category, falling back for unknown entries
    pub fn profile(&self, category: SoundCategory) -> &CategoryProfile {
        self.categories
            .get(category.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert("Traffic".to_string(), CategoryProfile::new(0.8, 75.0));
        categories.insert("Construction".to_string(), CategoryProfile::new(0.9, 85.0));
        categories.insert("Nature".to_string(), CategoryProfile::new(0.2, 45.0));
        categories.insert("Human".to_string(), CategoryProfile::new(0.6, 60.0));
        categories.insert("Industrial".to_string(), CategoryProfile::new(0.85, 80.0));
        categories.insert("Other".to_string(), CategoryProfile::new(0.5, 55.0));
        Self {
            categories,
            fallback: CategoryProfile::new(0.5, 45.0),
        }
    }
}

/// Compliance thresholds in dB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    pub night_limit_db: f64,
    pub daytime_limit_db: f64,
    pub critical_limit_db: f64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            night_limit_db: WHO_NIGHT_LIMIT_DB,
            daytime_limit_db: WHO_DAYTIME_LIMIT_DB,
            critical_limit_db: WHO_CRITICAL_LIMIT_DB,
        }
    }
}

/// Anchor and jitter bound for the no-geolocation fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub anchor_latitude: f64,
    pub anchor_longitude: f64,
    pub jitter_degrees: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            anchor_latitude: FALLBACK_ANCHOR_LATITUDE,
            anchor_longitude: FALLBACK_ANCHOR_LONGITUDE,
            jitter_degrees: FALLBACK_JITTER_DEGREES,
        }
    }
}

/// Upload validation bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum accepted payload size in bytes
    pub max_upload_bytes: usize,
    /// Minimum accepted sample rate in Hz
    pub min_sample_rate_hz: u32,
    /// Maximum accepted sample rate in Hz
    pub max_sample_rate_hz: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 16 * 1024 * 1024,
            min_sample_rate_hz: 8_000,
            max_sample_rate_hz: 192_000,
        }
    }
}

/// Feedback validation and transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Maximum report length in characters
    pub max_chars: usize,
    /// Submission endpoint; None disables the outbound transport
    pub endpoint: Option<String>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            endpoint: None,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            profiles: ProfilesConfig::default(),
            compliance: ComplianceConfig::default(),
            fallback: FallbackConfig::default(),
            ingest: IngestConfig::default(),
            feedback: FeedbackConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults if the file is missing or
    /// does not parse (both cases are logged, never fatal).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.compliance.daytime_limit_db, 55.0);
        assert_eq!(config.ingest.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.feedback.max_chars, 1000);
        assert_eq!(config.fallback.jitter_degrees, 0.05);
        assert_eq!(config.profiles.categories.len(), 6);
    }

    #[test]
    fn test_default_profiles_match_published_values() {
        let profiles = ProfilesConfig::default();
        let traffic = profiles.profile(SoundCategory::Traffic);
        assert_eq!(traffic.baseline_db, 75.0);
        assert_eq!(traffic.weight, 0.8);
        let construction = profiles.profile(SoundCategory::Construction);
        assert_eq!(construction.baseline_db, 85.0);
        assert_eq!(construction.weight, 0.9);
        let nature = profiles.profile(SoundCategory::Nature);
        assert_eq!(nature.baseline_db, 45.0);
        assert_eq!(nature.weight, 0.2);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.compliance, config.compliance);
        assert_eq!(parsed.fallback, config.fallback);
        assert_eq!(
            parsed.profiles.profile(SoundCategory::Traffic),
            config.profiles.profile(SoundCategory::Traffic)
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/ecosound.json");
        assert_eq!(config.server.bind_addr, "0.0.0.0:5000");
    }
}
