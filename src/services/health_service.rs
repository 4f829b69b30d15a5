use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the render loop phase along with the number of connected sensor feeds.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let response = HealthResponse {
        render_loop: state.render_loop().phase(),
        sensor_feeds: state.sensors().len(),
    };
    if !response.is_live() {
        warn!("health check while the visualization is destroyed");
    }
    response
}
