use std::convert::Infallible;
use std::pin::Pin;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::context::AppContext;

pub type AnnotationStream = Sse<Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>>;

/// Build a Server-Sent Events stream republishing annotation events.
///
/// Lagged or closed receivers simply end their stream; the broadcast channel
/// itself lives as long as the context.
pub fn annotations(context: &AppContext) -> AnnotationStream {
    let receiver = context.subscribe_annotations();

    let stream = BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(payload) => Some(Ok(Event::default().event("annotation").data(payload))),
                Err(_) => None,
            },
            Err(_) => None,
        }
    });

    Sse::new(Box::pin(stream) as Pin<Box<_>>).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}
