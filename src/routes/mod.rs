use axum::Router;

use crate::state::SharedState;

pub mod control;
pub mod docs;
pub mod health;
pub mod sse;
pub mod websocket;

/// Compose the sensor, stream, control and documentation routes over `state`.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(sse::router())
        .merge(websocket::router())
        .merge(control::router())
        .merge(docs::router())
        .with_state(state)
}
