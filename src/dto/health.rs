use serde::Serialize;
use utoipa::ToSchema;

use crate::state::render_loop::LoopPhase;

/// Liveness report returned by `/healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub render_loop: LoopPhase,
    /// Number of sensor feeds currently connected.
    pub sensor_feeds: usize,
}

impl HealthResponse {
    pub fn is_live(&self) -> bool {
        self.render_loop == LoopPhase::Running
    }
}
