use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{common::PointDto, format_system_time},
    geometry::{Side, Viewport},
    state::goal_detector::{GoalEvent, ScoreState},
};

/// Dispatched payload carried across SSE channels.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize + ?Sized,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

/// Real-world positions (cm) after an ingested message was applied.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PositionUpdateEvent {
    pub paddle_a: PointDto,
    pub paddle_b: PointDto,
    pub puck: PointDto,
}

/// Broadcast when the goal detector confirms a goal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoalScoredEvent {
    pub id: Uuid,
    /// Goal the puck entered.
    pub goal: Side,
    /// Side credited with the point.
    pub scorer: Side,
    /// Backend team letter of the scorer (`A` or `B`).
    pub team: String,
    pub score: ScoreState,
    /// RFC 3339 timestamp of the detection.
    pub timestamp: String,
}

impl From<&GoalEvent> for GoalScoredEvent {
    fn from(event: &GoalEvent) -> Self {
        Self {
            id: event.id,
            goal: event.goal,
            scorer: event.scorer,
            team: event.scorer.team_code().to_string(),
            score: event.score,
            timestamp: format_system_time(event.timestamp),
        }
    }
}

/// Render data for a single object.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ObjectFrame {
    /// Center in viewport pixels.
    pub display: PointDto,
    /// Center in centimeters.
    pub real: PointDto,
    /// Object radius in pixels along each axis.
    pub radius_px: PointDto,
}

/// Recent display-space samples per object, oldest first.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TrailsFrame {
    pub paddle_a: Vec<PointDto>,
    pub paddle_b: Vec<PointDto>,
    pub puck: Vec<PointDto>,
}

/// One presented frame of the table visualization.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FrameEvent {
    /// Monotonic frame counter for this engine instance.
    pub sequence: u64,
    pub viewport: Viewport,
    pub paddle_a: ObjectFrame,
    pub paddle_b: ObjectFrame,
    pub puck: ObjectFrame,
    pub score: ScoreState,
    /// Puck speed in cm/s, from the last two ingested puck samples.
    pub puck_speed: f64,
    /// Ingested messages per second over the last complete window.
    pub update_rate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trails: Option<TrailsFrame>,
}

/// Broadcast when a sensor feed connects or disconnects.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SensorStatusEvent {
    pub connected: usize,
}
