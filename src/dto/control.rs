use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::common::PointDto,
    engine::Snapshot,
    geometry::{TrackedObject, Viewport},
    state::{
        goal_detector::{DetectorPhase, ScoreState},
        render_loop::LoopPhase,
    },
};

/// Pause or resume the visualization.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PauseRequest {
    pub paused: bool,
}

/// Enable or disable position trails.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TrailsRequest {
    pub enabled: bool,
}

/// New size of the rendered viewport, in pixels.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ViewportRequest {
    #[validate(range(exclusive_min = 0.0, max = 16384.0))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0, max = 16384.0))]
    pub height: f64,
}

/// Pointer location in viewport pixels.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PointerRequest {
    pub x: f64,
    pub y: f64,
}

impl From<&PointerRequest> for PointDto {
    fn from(request: &PointerRequest) -> Self {
        Self {
            x: request.x,
            y: request.y,
        }
    }
}

/// Outcome of a pointer gesture.
#[derive(Debug, Serialize, ToSchema)]
pub struct PointerResponse {
    /// Paddle currently held by the pointer, if any.
    pub dragging: Option<TrackedObject>,
    /// Real-world position written to the dragged paddle, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PointDto>,
}

/// Display and real-world coordinates of a pointer location.
#[derive(Debug, Serialize, ToSchema)]
pub struct InspectResponse {
    pub display: PointDto,
    pub real: PointDto,
}

/// Generic acknowledgement for control operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub message: String,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Detector phase exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectorPhaseDto {
    Armed,
    Cooldown,
}

impl From<DetectorPhase> for DetectorPhaseDto {
    fn from(phase: DetectorPhase) -> Self {
        match phase {
            DetectorPhase::Armed => DetectorPhaseDto::Armed,
            DetectorPhase::Cooldown { .. } => DetectorPhaseDto::Cooldown,
        }
    }
}

/// Current state of the visualization engine.
#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub paddle_a: PointDto,
    pub paddle_b: PointDto,
    pub puck: PointDto,
    pub score: ScoreState,
    pub detector: DetectorPhaseDto,
    pub paused: bool,
    pub trails: bool,
    pub render_loop: LoopPhase,
    pub viewport: Viewport,
    pub dragging: Option<TrackedObject>,
}

impl SnapshotResponse {
    pub fn new(snapshot: Snapshot, render_loop: LoopPhase) -> Self {
        Self {
            paddle_a: snapshot.positions.paddle_a.into(),
            paddle_b: snapshot.positions.paddle_b.into(),
            puck: snapshot.positions.puck.into(),
            score: snapshot.score,
            detector: snapshot.detector.into(),
            paused: snapshot.paused,
            trails: snapshot.trails,
            render_loop,
            viewport: snapshot.viewport,
            dragging: snapshot.dragging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_request_rejects_zero_width() {
        let request = ViewportRequest {
            width: 0.0,
            height: 400.0,
        };
        assert!(request.validate().is_err());

        let ok = ViewportRequest {
            width: 1280.0,
            height: 640.0,
        };
        assert!(ok.validate().is_ok());
    }
}
