// HTTP surface - axum router over the monitoring pipeline
//
// Handlers validate input before the pipeline (rejected uploads never reach
// it) and translate outcomes to JSON. The SSE stream republishes the
// annotation broadcast channel.

pub mod routes;
pub mod sse;

pub use routes::{build_router, run_http_server, AppState};
