// Result aggregator / marker emitter - combines the estimator and evaluator
// outputs with a real or synthesized geolocation into an immutable map
// annotation.
//
// When no geolocation is available the annotation is placed by jittering a
// fixed anchor coordinate with bounded noise from the injectable
// RandomSource. That is a documented demo fallback, not a geolocation
// algorithm, and the annotation records that its location was synthesized.

use serde::{Deserialize, Serialize};

use crate::compliance::ComplianceVerdict;
use crate::config::FallbackConfig;
use crate::estimator::NoiseEstimate;
use crate::synthetic::RandomSource;
use crate::taxonomy::{Origin, SoundCategory};

/// Anchor used when no geolocation is available
pub const FALLBACK_ANCHOR_LATITUDE: f64 = 40.7128;
pub const FALLBACK_ANCHOR_LONGITUDE: f64 = -74.0060;

/// Maximum jitter applied to the anchor, in degrees
pub const FALLBACK_JITTER_DEGREES: f64 = 0.05;

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One classification event plotted on the map
///
/// Created here, never mutated afterwards; the map collaborator owns its
/// lifetime once handed off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapAnnotation {
    pub latitude: f64,
    pub longitude: f64,
    pub decibels: f64,
    pub confidence: f64,
    pub verdict: ComplianceVerdict,
    pub category: SoundCategory,
    pub origin: Origin,
    /// True when the location came from the anchor-jitter fallback
    pub synthesized_location: bool,
}

/// Build the annotation for one classification event
///
/// # Arguments
/// * `estimate` - dominant category estimate from the estimator
/// * `verdict` - compliance classification of the estimate
/// * `origin` - whether the classification was real or synthetic
/// * `location` - geolocation if the collaborator produced one
/// * `fallback` - anchor and jitter bound for the no-geolocation path
/// * `rng` - randomness source for the jitter
pub fn annotate(
    estimate: &NoiseEstimate,
    verdict: ComplianceVerdict,
    origin: Origin,
    location: Option<GeoPoint>,
    fallback: &FallbackConfig,
    rng: &mut dyn RandomSource,
) -> MapAnnotation {
    let (point, synthesized_location) = match location {
        Some(point) => (point, false),
        None => (jitter_anchor(fallback, rng), true),
    };

    MapAnnotation {
        latitude: point.latitude,
        longitude: point.longitude,
        decibels: estimate.decibels,
        confidence: estimate.confidence,
        verdict,
        category: estimate.category,
        origin,
        synthesized_location,
    }
}

/// Jitter the anchor by up to +/- jitter_degrees on each axis
fn jitter_anchor(fallback: &FallbackConfig, rng: &mut dyn RandomSource) -> GeoPoint {
    let latitude = fallback.anchor_latitude + signed_jitter(fallback.jitter_degrees, rng);
    let longitude = fallback.anchor_longitude + signed_jitter(fallback.jitter_degrees, rng);
    GeoPoint::new(latitude, longitude)
}

fn signed_jitter(bound_degrees: f64, rng: &mut dyn RandomSource) -> f64 {
    (rng.next_unit() * 2.0 - 1.0) * bound_degrees
}
