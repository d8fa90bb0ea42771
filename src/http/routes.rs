use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::aggregator::GeoPoint;
use crate::audio::ingest;
use crate::context::{Analysis, AppContext};
use crate::error::{ErrorCode, FeedbackError, IngestError};
use crate::feedback::{FeedbackAnalysis, FeedbackReport};
use crate::taxonomy::LabelScore;

use super::sse;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AppContext>,
}

impl AppState {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    BadRequest { code: i32, message: String },
    PayloadTooLarge { code: i32, message: String },
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::PayloadTooLarge { code, message } => {
                (StatusCode::PAYLOAD_TOO_LARGE, code, message)
            }
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, 0, message),
        };

        (
            status,
            Json(serde_json::json!({ "error": message, "code": code })),
        )
            .into_response()
    }
}

impl From<IngestError> for HttpServerError {
    fn from(err: IngestError) -> Self {
        let code = err.code();
        let message = err.message();
        match err {
            IngestError::FileTooLarge { .. } => Self::PayloadTooLarge { code, message },
            _ => Self::BadRequest { code, message },
        }
    }
}

impl From<FeedbackError> for HttpServerError {
    fn from(err: FeedbackError) -> Self {
        Self::BadRequest {
            code: err.code(),
            message: err.message(),
        }
    }
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_ms: u64,
    pub model_available: bool,
}

/// API status payload listing the available endpoints.
#[derive(Debug, Serialize)]
pub struct ApiStatusResponse {
    pub message: &'static str,
    pub endpoints: EndpointList,
}

#[derive(Debug, Serialize)]
pub struct EndpointList {
    pub audio_classification: &'static str,
    pub audio_real_time: &'static str,
    pub feedback_submission: &'static str,
    pub annotation_stream: &'static str,
}

/// Query payload for the upload endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifyQuery {
    pub filename: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Upload classification response payload.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub measured_leq_db: f64,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Real-time request carrying pre-computed label scores.
#[derive(Debug, Deserialize)]
pub struct RealTimeRequest {
    pub labels: Vec<LabelScore>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Compact real-time response payload.
#[derive(Debug, Serialize)]
pub struct RealTimeResponse {
    pub noise_level: f64,
    pub dominant_source: String,
    pub confidence: f64,
    pub who_status: &'static str,
    pub exceeds_limit: bool,
    pub synthetic: bool,
}

/// Feedback submission request payload.
#[derive(Debug, Deserialize)]
pub struct FeedbackSubmitRequest {
    pub feedback: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub noise_level: Option<f64>,
}

/// Feedback submission response payload.
#[derive(Debug, Serialize)]
pub struct FeedbackSubmitResponse {
    pub success: bool,
    pub delivered: bool,
    pub message: &'static str,
    pub analysis: FeedbackAnalysis,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.context.config().ingest.max_upload_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(api_status))
        .route("/api/audio/classify", post(classify))
        .route("/api/audio/real-time", post(real_time))
        .route("/api/feedback/submit", post(submit_feedback))
        .route("/api/annotations/stream", get(annotation_stream))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Run the HTTP server loop.
pub async fn run_http_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding HTTP listener")?;
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .context("serving HTTP router")?;
    Ok(())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_ms: state.context.uptime_ms(),
        model_available: state.context.model_available(),
    })
}

pub async fn api_status() -> Json<ApiStatusResponse> {
    Json(ApiStatusResponse {
        message: "EcoSound Analyzer API is running",
        endpoints: EndpointList {
            audio_classification: "/api/audio/classify",
            audio_real_time: "/api/audio/real-time",
            feedback_submission: "/api/feedback/submit",
            annotation_stream: "/api/annotations/stream",
        },
    })
}

pub async fn classify(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
    body: Bytes,
) -> Result<Json<ClassifyResponse>, HttpServerError> {
    let filename = query.filename.as_deref().unwrap_or("upload.wav");
    ingest::validate_extension(filename)?;

    let clip = ingest::decode_wav(&body, &state.context.config().ingest)?;
    let location = location_from(query.latitude, query.longitude);
    let measured_leq_db = clip.approximate_leq_db();
    let analysis = state.context.analyze_clip(&clip, location).await;

    Ok(Json(ClassifyResponse {
        success: true,
        measured_leq_db,
        analysis,
    }))
}

pub async fn real_time(
    State(state): State<AppState>,
    Json(request): Json<RealTimeRequest>,
) -> Json<RealTimeResponse> {
    let location = location_from(request.latitude, request.longitude);
    let analysis = state.context.analyze_labels(&request.labels, location);

    Json(RealTimeResponse {
        noise_level: analysis.estimate.decibels,
        dominant_source: analysis.estimate.category.to_string(),
        confidence: analysis.estimate.confidence,
        who_status: analysis.verdict.label(),
        exceeds_limit: analysis.verdict.exceeds_limit(),
        synthetic: analysis.classification.is_synthetic(),
    })
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackSubmitRequest>,
) -> Result<Json<FeedbackSubmitResponse>, HttpServerError> {
    let report = FeedbackReport {
        text: request.feedback,
        location: location_from(request.latitude, request.longitude),
        noise_level_db: request.noise_level,
    };
    let outcome = state.context.submit_feedback(report).await?;

    Ok(Json(FeedbackSubmitResponse {
        success: true,
        delivered: outcome.delivered,
        message: "Thank you for your report! Your feedback helps improve urban noise monitoring.",
        analysis: outcome.record.analysis,
    }))
}

pub async fn annotation_stream(State(state): State<AppState>) -> sse::AnnotationStream {
    sse::annotations(&state.context)
}

fn location_from(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
        _ => None,
    }
}
