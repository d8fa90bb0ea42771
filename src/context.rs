// AppContext: Dependency Injection Container
//
// Centralizes what the original demo kept in module-level globals (map
// handles, recording flags, ad-hoc randomness) into a single context owned
// by the top-level application controller. The core pipeline stays pure;
// this is where collaborator calls, the synthetic fallback decision, and
// event emission happen.

use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::aggregator::{self, GeoPoint, MapAnnotation};
use crate::audio::AudioClip;
use crate::collaborators::{
    DisabledFeedbackTransport, FeedbackTransport, Geolocator, LogMapSink, LogStatusSink, MapSink,
    NoGeolocator, NullModel, SoundModel, StatusSink,
};
use crate::compliance::ComplianceVerdict;
use crate::config::AppConfig;
use crate::error::{log_model_error, FeedbackError};
use crate::estimator::{self, NoiseEstimate};
use crate::events::{AnnotationEvent, StatusSeverity};
use crate::feedback::{self, FeedbackRecord, FeedbackReport};
use crate::synthetic::{self, RandomSource, ThreadRngSource};
use crate::taxonomy::{self, Classification, LabelScore};

/// Broadcast capacity for annotation events; lagging subscribers drop
const ANNOTATION_CHANNEL_CAPACITY: usize = 64;

/// Everything produced for one classification event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub classification: Classification,
    pub estimate: NoiseEstimate,
    pub verdict: ComplianceVerdict,
    pub annotation: MapAnnotation,
}

/// Result of a feedback submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub record: FeedbackRecord,
    /// Whether the transport reported successful delivery
    pub delivered: bool,
}

/// AppContext: dependency injection container for the monitoring pipeline
///
/// Owns the loaded configuration (profile table, limits, fallback anchor),
/// the collaborator handles, the injectable randomness source, and the
/// annotation broadcast channel. The pipeline components themselves hold no
/// state across invocations.
pub struct AppContext {
    config: AppConfig,
    model: Arc<dyn SoundModel>,
    geolocator: Arc<dyn Geolocator>,
    map: Arc<dyn MapSink>,
    status: Arc<dyn StatusSink>,
    feedback: Arc<dyn FeedbackTransport>,
    rng: Mutex<Box<dyn RandomSource>>,
    annotations: broadcast::Sender<AnnotationEvent>,
    started: Instant,
}

impl AppContext {
    /// Create a context with the demo collaborator set
    ///
    /// Defaults: no model service (synthetic fallback path), no geolocation
    /// (anchor jitter), logging map/status sinks, disabled feedback
    /// transport, thread-RNG randomness. Each can be swapped via the
    /// with_* methods.
    pub fn new(config: AppConfig) -> Self {
        let (annotations, _) = broadcast::channel(ANNOTATION_CHANNEL_CAPACITY);
        Self {
            config,
            model: Arc::new(NullModel),
            geolocator: Arc::new(NoGeolocator),
            map: Arc::new(LogMapSink),
            status: Arc::new(LogStatusSink),
            feedback: Arc::new(DisabledFeedbackTransport),
            rng: Mutex::new(Box::new(ThreadRngSource)),
            annotations,
            started: Instant::now(),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn SoundModel>) -> Self {
        self.model = model;
        self
    }

    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = geolocator;
        self
    }

    pub fn with_map_sink(mut self, map: Arc<dyn MapSink>) -> Self {
        self.map = map;
        self
    }

    pub fn with_status_sink(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn with_feedback_transport(mut self, feedback: Arc<dyn FeedbackTransport>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_random_source(self, rng: Box<dyn RandomSource>) -> Self {
        // Mutex replaced wholesale; no guard state to carry over
        Self {
            rng: Mutex::new(rng),
            ..self
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn model_available(&self) -> bool {
        self.model.is_available()
    }

    pub fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Subscribe to annotation events (SSE stream, tests)
    pub fn subscribe_annotations(&self) -> broadcast::Receiver<AnnotationEvent> {
        self.annotations.subscribe()
    }

    // ========================================================================
    // BUSINESS LOGIC - CLASSIFICATION PIPELINE
    // ========================================================================

    /// Run the full pipeline on a decoded clip
    ///
    /// Model failure or empty model output is absorbed here by the synthetic
    /// fallback; the caller always gets a complete Analysis.
    ///
    /// # Arguments
    /// * `clip` - validated audio from ingest
    /// * `location_hint` - caller-supplied coordinate, tried before the
    ///   geolocation collaborator
    pub async fn analyze_clip(&self, clip: &AudioClip, location_hint: Option<GeoPoint>) -> Analysis {
        let classification = match self.model.classify(clip).await {
            Ok(labels) if !labels.is_empty() => taxonomy::map_labels(&labels),
            Ok(_) => {
                log::warn!("[Pipeline] model returned no labels, using synthetic fallback");
                self.synthetic_fallback()
            }
            Err(err) => {
                log_model_error(&err, "analyze_clip");
                self.synthetic_fallback()
            }
        };
        self.finish(classification, location_hint)
    }

    /// Run the pipeline on pre-computed label scores (real-time path)
    ///
    /// An empty label set is treated like a failed classification and takes
    /// the synthetic fallback.
    pub fn analyze_labels(
        &self,
        labels: &[LabelScore],
        location_hint: Option<GeoPoint>,
    ) -> Analysis {
        let classification = if labels.is_empty() {
            log::warn!("[Pipeline] empty label input, using synthetic fallback");
            self.synthetic_fallback()
        } else {
            taxonomy::map_labels(labels)
        };
        self.finish(classification, location_hint)
    }

    fn synthetic_fallback(&self) -> Classification {
        self.status.show_status(
            "Classification model unavailable - showing a synthetic demo result",
            StatusSeverity::Warning,
        );
        synthetic::synthetic_classification(self.lock_rng().as_mut())
    }

    /// Estimator, evaluator and aggregator stages plus event emission
    fn finish(&self, classification: Classification, location_hint: Option<GeoPoint>) -> Analysis {
        let estimate = estimator::estimate(&self.config.profiles, classification.dominant());
        let verdict = ComplianceVerdict::for_db_with(estimate.decibels, &self.config.compliance);

        let location = location_hint.or_else(|| self.geolocator.locate());
        let annotation = aggregator::annotate(
            &estimate,
            verdict,
            classification.origin,
            location,
            &self.config.fallback,
            self.lock_rng().as_mut(),
        );

        self.map.add_marker(&annotation);
        self.status.show_status(
            &format!(
                "{} at {:.1} dB - {}",
                estimate.category,
                estimate.decibels,
                verdict.label()
            ),
            severity_for(verdict),
        );
        let _ = self.annotations.send(AnnotationEvent {
            annotation: annotation.clone(),
            timestamp_ms: now_ms(),
        });

        Analysis {
            classification,
            estimate,
            verdict,
            annotation,
        }
    }

    // ========================================================================
    // BUSINESS LOGIC - FEEDBACK
    // ========================================================================

    /// Validate, analyze and submit a feedback report
    ///
    /// Transport failure is absorbed: the outcome records delivered=false and
    /// the user gets a warning status, never an error.
    pub async fn submit_feedback(
        &self,
        report: FeedbackReport,
    ) -> Result<FeedbackOutcome, FeedbackError> {
        let text = feedback::validate(&report.text, &self.config.feedback)?;
        let analysis = feedback::analyze(&text);
        let record = FeedbackRecord {
            report: FeedbackReport { text, ..report },
            analysis,
        };

        let delivered = self.feedback.submit(&record).await;
        if delivered {
            self.status.show_status(
                "Thank you for your report! Your feedback helps improve urban noise monitoring.",
                StatusSeverity::Success,
            );
        } else {
            self.status.show_status(
                "Your report was recorded locally but could not be delivered.",
                StatusSeverity::Warning,
            );
        }

        Ok(FeedbackOutcome { record, delivered })
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, Box<dyn RandomSource>> {
        // The randomness source has no invariants worth failing for; recover
        // the inner value if a panicking thread poisoned the lock.
        match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn severity_for(verdict: ComplianceVerdict) -> StatusSeverity {
    match verdict {
        ComplianceVerdict::Safe => StatusSeverity::Success,
        ComplianceVerdict::Moderate => StatusSeverity::Info,
        ComplianceVerdict::ExceedsLimit => StatusSeverity::Warning,
        ComplianceVerdict::Critical => StatusSeverity::Error,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SequenceSource;
    use crate::taxonomy::{Origin, SoundCategory};

    fn scenario_labels() -> Vec<LabelScore> {
        vec![
            LabelScore::new("car engine", 0.6),
            LabelScore::new("speech", 0.3),
        ]
    }

    #[test]
    fn test_analyze_labels_scenario() {
        let context = AppContext::new(AppConfig::default());
        let analysis =
            context.analyze_labels(&scenario_labels(), Some(GeoPoint::new(12.97, 77.59)));

        assert_eq!(analysis.estimate.category, SoundCategory::Traffic);
        assert!((analysis.estimate.decibels - 79.8).abs() < 1e-9);
        assert_eq!(analysis.verdict, ComplianceVerdict::Critical);
        assert_eq!(analysis.annotation.latitude, 12.97);
        assert!(!analysis.annotation.synthesized_location);
        assert_eq!(analysis.classification.origin, Origin::Model);
    }

    #[test]
    fn test_empty_labels_take_synthetic_path() {
        let context = AppContext::new(AppConfig::default())
            .with_random_source(Box::new(SequenceSource::new(vec![0.3, 0.5, 0.2, 0.1, 0.4, 0.6, 0.7, 0.8])));
        let analysis = context.analyze_labels(&[], None);

        assert!(analysis.classification.is_synthetic());
        assert_eq!(analysis.annotation.origin, Origin::Synthetic);
        assert!(analysis.annotation.synthesized_location);
        let anchor = &context.config().fallback;
        assert!((analysis.annotation.latitude - anchor.anchor_latitude).abs() <= 0.05);
        assert!((analysis.annotation.longitude - anchor.anchor_longitude).abs() <= 0.05);
    }

    #[test]
    fn test_annotation_event_broadcast() {
        let context = AppContext::new(AppConfig::default());
        let mut receiver = context.subscribe_annotations();

        let analysis = context.analyze_labels(&scenario_labels(), None);
        let event = receiver.try_recv().expect("annotation event");
        assert_eq!(event.annotation, analysis.annotation);
    }

    #[tokio::test]
    async fn test_submit_feedback_validates_first() {
        let context = AppContext::new(AppConfig::default());
        let result = context
            .submit_feedback(FeedbackReport {
                text: "   ".to_string(),
                location: None,
                noise_level_db: None,
            })
            .await;
        assert_eq!(result, Err(FeedbackError::EmptyFeedback));
    }

    #[tokio::test]
    async fn test_submit_feedback_analyzes_and_delivers() {
        let context = AppContext::new(AppConfig::default());
        let outcome = context
            .submit_feedback(FeedbackReport {
                text: "Unbearable construction noise at night".to_string(),
                location: None,
                noise_level_db: Some(82.0),
            })
            .await
            .unwrap();
        assert!(outcome.delivered);
        assert_eq!(
            outcome.record.analysis.urgency,
            crate::feedback::Urgency::High
        );
        assert!(outcome
            .record
            .analysis
            .noise_sources
            .contains(&"construction".to_string()));
    }
}
