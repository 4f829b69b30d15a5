use std::time::Instant;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::PositionMessage,
    engine::IngestOutcome,
    state::{SensorConnection, SharedState},
};

/// Handle the full lifecycle of one sensor feed WebSocket connection.
///
/// Every text frame is a position message in sensor units. Frames that fail to
/// parse are logged and skipped; the connection stays open.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps pongs and close frames flowing while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let sensor_id = Uuid::new_v4();
    state.register_sensor(SensorConnection {
        id: sensor_id,
        tx: outbound_tx.clone(),
    });
    info!(id = %sensor_id, "sensor feed connected");

    while let Some(message) = receiver.next().await {
        if !state.render_loop().is_running() {
            info!(id = %sensor_id, "visualization destroyed; closing sensor feed");
            let _ = outbound_tx.send(Message::Close(None));
            break;
        }

        match message {
            Ok(Message::Text(text)) => {
                handle_position_frame(&state, &sensor_id, &text).await;
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(id = %sensor_id, "sensor feed closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {
                debug!(id = %sensor_id, "ignoring binary frame from sensor feed");
            }
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(id = %sensor_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.unregister_sensor(&sensor_id);
    info!(id = %sensor_id, "sensor feed disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Parse and ingest one text frame.
async fn handle_position_frame(state: &SharedState, sensor_id: &Uuid, text: &str) -> IngestOutcome {
    let message = match PositionMessage::from_json_str(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(id = %sensor_id, error = %err, "failed to parse position message");
            return IngestOutcome::default();
        }
    };

    let outcome = state
        .with_viz(|viz| viz.ingest(&message, Instant::now()))
        .await;
    if outcome.rejected > 0 {
        debug!(
            id = %sensor_id,
            applied = outcome.applied,
            rejected = outcome.rejected,
            "position message partially applied"
        );
    }
    outcome
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, geometry::TrackedObject, state::AppState};

    #[tokio::test]
    async fn text_frames_reach_the_engine() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let id = Uuid::new_v4();

        let outcome =
            handle_position_frame(&state, &id, r#"{"puck": {"x": 0, "y": 200}}"#).await;

        assert_eq!(outcome.applied, 1);
        let puck = state
            .with_viz(|viz| viz.position(TrackedObject::Puck))
            .await;
        assert_eq!((puck.x, puck.y), (0.0, 13.0));
    }

    #[tokio::test]
    async fn unparsable_frames_are_skipped() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let outcome = handle_position_frame(&state, &Uuid::new_v4(), "not json").await;
        assert_eq!(outcome, IngestOutcome::default());
    }
}
