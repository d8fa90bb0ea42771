// Collaborator trait seams - the external interfaces the core consumes and
// produces at.
//
// The model and the feedback transport are the only async boundaries in the
// system; everything else is synchronous. Implementations shipped here are
// the demo set: a scripted model for deterministic runs, logging sinks for
// the CLI, and an HTTP feedback transport. Tests add recording variants in
// the testing module.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::aggregator::{GeoPoint, MapAnnotation};
use crate::audio::AudioClip;
use crate::error::ModelError;
use crate::events::StatusSeverity;
use crate::feedback::FeedbackRecord;
use crate::taxonomy::LabelScore;

/// External audio-tagging model
///
/// The model itself (loading, inference runtime) is out of scope; the core
/// only sees this boundary.
#[async_trait]
pub trait SoundModel: Send + Sync {
    /// Classify a clip into open-ended (label, score) pairs
    async fn classify(&self, clip: &AudioClip) -> Result<Vec<LabelScore>, ModelError>;

    /// Whether the collaborator expects classify to succeed
    fn is_available(&self) -> bool {
        true
    }
}

/// Geolocation collaborator; None is a defined state, not an error
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> Option<GeoPoint>;
}

/// Mapping collaborator receiving finished annotations
pub trait MapSink: Send + Sync {
    fn add_marker(&self, annotation: &MapAnnotation);
}

/// Notification collaborator for user-facing status messages
pub trait StatusSink: Send + Sync {
    fn show_status(&self, message: &str, severity: StatusSeverity);
}

/// Fire-and-forget feedback submission; returns whether delivery succeeded
#[async_trait]
pub trait FeedbackTransport: Send + Sync {
    async fn submit(&self, record: &FeedbackRecord) -> bool;
}

/// Model stand-in used when no inference service is wired up
///
/// Always reports unavailable, which routes every request through the
/// synthetic fallback path.
#[derive(Debug, Default)]
pub struct NullModel;

#[async_trait]
impl SoundModel for NullModel {
    async fn classify(&self, _clip: &AudioClip) -> Result<Vec<LabelScore>, ModelError> {
        Err(ModelError::Unavailable {
            reason: "no inference service configured".to_string(),
        })
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Scripted model returning a fixed label set, for demos and tests
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    labels: Vec<LabelScore>,
}

impl ScriptedModel {
    pub fn new(labels: Vec<LabelScore>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl SoundModel for ScriptedModel {
    async fn classify(&self, _clip: &AudioClip) -> Result<Vec<LabelScore>, ModelError> {
        Ok(self.labels.clone())
    }
}

/// Geolocator that never produces a fix (forces the jitter fallback)
#[derive(Debug, Default)]
pub struct NoGeolocator;

impl Geolocator for NoGeolocator {
    fn locate(&self) -> Option<GeoPoint> {
        None
    }
}

/// Geolocator pinned to a fixed coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    pub point: GeoPoint,
}

impl FixedGeolocator {
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> Option<GeoPoint> {
        Some(self.point)
    }
}

/// Map sink that logs markers instead of rendering them
#[derive(Debug, Default)]
pub struct LogMapSink;

impl MapSink for LogMapSink {
    fn add_marker(&self, annotation: &MapAnnotation) {
        info!(
            "[Map] marker at ({:.4}, {:.4}): {:.1} dB {} ({:?}, confidence {:.2})",
            annotation.latitude,
            annotation.longitude,
            annotation.decibels,
            annotation.verdict.label(),
            annotation.category,
            annotation.confidence
        );
    }
}

/// Status sink that logs messages at a level matching their severity
#[derive(Debug, Default)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn show_status(&self, message: &str, severity: StatusSeverity) {
        match severity {
            StatusSeverity::Warning | StatusSeverity::Error => {
                warn!("[Status] {}", message)
            }
            StatusSeverity::Info | StatusSeverity::Success => {
                info!("[Status] {}", message)
            }
        }
    }
}

/// Transport that drops reports locally (no endpoint configured)
#[derive(Debug, Default)]
pub struct DisabledFeedbackTransport;

#[async_trait]
impl FeedbackTransport for DisabledFeedbackTransport {
    async fn submit(&self, record: &FeedbackRecord) -> bool {
        debug!(
            "[Feedback] no endpoint configured, report dropped (urgency {:?})",
            record.analysis.urgency
        );
        true
    }
}

/// Fire-and-forget HTTP POST transport
pub struct HttpFeedbackTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFeedbackTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl FeedbackTransport for HttpFeedbackTransport {
    async fn submit(&self, record: &FeedbackRecord) -> bool {
        match self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(
                    "[Feedback] endpoint {} returned {}",
                    self.endpoint,
                    response.status()
                );
                false
            }
            Err(err) => {
                warn!("[Feedback] submission to {} failed: {}", self.endpoint, err);
                false
            }
        }
    }
}
