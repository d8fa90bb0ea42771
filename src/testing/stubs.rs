//! Recording collaborator stubs for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::aggregator::MapAnnotation;
use crate::audio::AudioClip;
use crate::collaborators::{FeedbackTransport, MapSink, SoundModel, StatusSink};
use crate::error::ModelError;
use crate::events::StatusSeverity;
use crate::feedback::FeedbackRecord;
use crate::taxonomy::LabelScore;

/// Model that always fails with the given reason
#[derive(Debug)]
pub struct FailingModel {
    pub reason: String,
}

impl FailingModel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SoundModel for FailingModel {
    async fn classify(&self, _clip: &AudioClip) -> Result<Vec<LabelScore>, ModelError> {
        Err(ModelError::InferenceFailed {
            details: self.reason.clone(),
        })
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Map sink that records every marker it receives
#[derive(Debug, Default)]
pub struct RecordingMapSink {
    markers: Mutex<Vec<MapAnnotation>>,
}

impl RecordingMapSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> Vec<MapAnnotation> {
        self.markers
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl MapSink for RecordingMapSink {
    fn add_marker(&self, annotation: &MapAnnotation) {
        if let Ok(mut guard) = self.markers.lock() {
            guard.push(annotation.clone());
        }
    }
}

/// Status sink that records every message it receives
#[derive(Debug, Default)]
pub struct RecordingStatusSink {
    messages: Mutex<Vec<(String, StatusSeverity)>>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, StatusSeverity)> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl StatusSink for RecordingStatusSink {
    fn show_status(&self, message: &str, severity: StatusSeverity) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((message.to_string(), severity));
        }
    }
}

/// Transport that records submissions and returns a configured outcome
#[derive(Debug)]
pub struct RecordingFeedbackTransport {
    records: Mutex<Vec<FeedbackRecord>>,
    accept: bool,
}

impl RecordingFeedbackTransport {
    pub fn accepting() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            accept: true,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            accept: false,
        }
    }

    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeedbackTransport for RecordingFeedbackTransport {
    async fn submit(&self, record: &FeedbackRecord) -> bool {
        if let Ok(mut guard) = self.records.lock() {
            guard.push(record.clone());
        }
        self.accept
    }
}
