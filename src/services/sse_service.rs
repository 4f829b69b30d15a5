use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc, watch,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::{
    dto::sse::ServerEvent,
    state::{SharedState, hub::VizEvent, render_loop::LoopPhase},
};

/// Which engine events a stream forwards.
#[derive(Debug, Clone, Copy)]
pub struct StreamFilter {
    /// Forward `frame` events (one per render tick).
    pub frames: bool,
}

impl Default for StreamFilter {
    fn default() -> Self {
        Self { frames: true }
    }
}

impl StreamFilter {
    fn accepts(&self, event: &VizEvent) -> bool {
        self.frames || !matches!(event, VizEvent::Frame(_))
    }
}

/// Subscribe to the engine event hub.
pub fn subscribe(state: &SharedState) -> broadcast::Receiver<VizEvent> {
    state.hub().subscribe()
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}

/// Convert a hub receiver into an SSE response, forwarding events until the
/// client disconnects or the render loop is stopped.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<VizEvent>,
    filter: StreamFilter,
    mut render_loop: watch::Receiver<LoopPhase>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from the hub and pushes into mpsc; dropping tx ends the response
    tokio::spawn(async move {
        while *render_loop.borrow_and_update() == LoopPhase::Running {
            tokio::select! {
                _ = tx.closed() => break,
                changed = render_loop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(event) if filter.accepts(&event) => {
                            let payload = match event.to_server_event() {
                                Ok(payload) => payload,
                                Err(err) => {
                                    warn!(event = event.name(), error = %err, "failed to serialize SSE payload");
                                    continue;
                                }
                            };
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Ok(_) => continue,
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Frames are superseded by the next one anyway; keep the stream alive.
                            warn!(skipped, "SSE subscriber lagging behind");
                            continue;
                        }
                    }
                }
            }
        }

        info!("SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use axum::response::IntoResponse;
    use tokio::time::timeout;

    use super::*;
    use crate::{config::AppConfig, dto::sse::SensorStatusEvent, state::AppState};

    #[tokio::test]
    async fn destroy_ends_open_streams() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let response = to_sse_stream(
            subscribe(&state),
            StreamFilter::default(),
            state.render_loop().watcher(),
        )
        .into_response();

        state.destroy();

        let body = timeout(
            Duration::from_secs(3),
            axum::body::to_bytes(response.into_body(), usize::MAX),
        )
        .await
        .expect("event stream still open after destroy");
        assert!(body.is_ok());
    }

    #[tokio::test]
    async fn stream_opened_after_destroy_ends_immediately() {
        let state = AppState::new(AppConfig::default()).unwrap();
        state.destroy();

        let response = to_sse_stream(
            subscribe(&state),
            StreamFilter::default(),
            state.render_loop().watcher(),
        )
        .into_response();

        let body = timeout(
            Duration::from_secs(3),
            axum::body::to_bytes(response.into_body(), usize::MAX),
        )
        .await
        .expect("event stream opened after destroy stayed open");
        assert!(body.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filter_can_drop_frames_only() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let mut rx = subscribe(&state);
        state.with_viz(|viz| viz.tick(Instant::now())).await;
        let frame = rx.try_recv().unwrap();
        let status = VizEvent::SensorStatus(SensorStatusEvent { connected: 1 });

        let without_frames = StreamFilter { frames: false };
        assert!(!without_frames.accepts(&frame));
        assert!(without_frames.accepts(&status));
        assert!(StreamFilter::default().accepts(&frame));
    }
}
