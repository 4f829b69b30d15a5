use std::convert::Infallible;

use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::{
    services::sse_service::{self, StreamFilter},
    state::SharedState,
};

/// Options of the event stream.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StreamQuery {
    /// Include one `frame` event per render tick (default `true`).
    frames: Option<bool>,
}

/// Stream `frame`, `position_update`, `goal_scored` and `sensor_status` events.
#[utoipa::path(
    get,
    path = "/sse/events",
    tag = "sse",
    params(StreamQuery),
    responses((status = 200, description = "Engine event stream", content_type = "text/event-stream", body = String))
)]
pub async fn event_stream(
    State(state): State<SharedState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = sse_service::subscribe(&state);
    let filter = StreamFilter {
        frames: query.frames.unwrap_or(true),
    };
    info!(frames = filter.frames, "New SSE connection");
    sse_service::to_sse_stream(receiver, filter, state.render_loop().watcher())
}

/// Configure the SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/events", get(event_stream))
}
