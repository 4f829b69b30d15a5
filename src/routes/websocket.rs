use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
};

use crate::{error::AppError, services::websocket_service, state::SharedState};

/// Position messages are a few hundred bytes; anything larger is not a sensor frame.
const MAX_SENSOR_FRAME: usize = 16 * 1024;

/// Upgrade the HTTP connection into a sensor feed WebSocket session.
#[utoipa::path(
    get,
    path = "/ws",
    tag = "sensors",
    responses(
        (status = 101, description = "Switching protocols to WebSocket"),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn ws_handler(
    State(state): State<SharedState>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    if !state.render_loop().is_running() {
        return Err(AppError::Conflict(
            "visualization has been destroyed".into(),
        ));
    }

    Ok(ws
        .max_message_size(MAX_SENSOR_FRAME)
        .on_upgrade(move |socket| websocket_service::handle_socket(state, socket)))
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/ws", get(ws_handler))
}
