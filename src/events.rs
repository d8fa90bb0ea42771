//! Event payloads broadcast to presentation surfaces (SSE stream, CLI).

use serde::{Deserialize, Serialize};

use crate::aggregator::MapAnnotation;

/// Severity attached to user-facing status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSeverity {
    Info,
    Success,
    Warning,
    Error,
}

/// One annotation as published on the broadcast channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEvent {
    pub annotation: MapAnnotation,
    /// Milliseconds since the Unix epoch at emission time
    pub timestamp_ms: u64,
}
