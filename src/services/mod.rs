/// Pause, trails, viewport, pointer and reset operations.
pub mod control_service;
/// Synthetic sensor feed used when no tracker is connected.
pub mod demo_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Forwards confirmed goals to the scoring backend.
#[cfg(feature = "goal-reporter")]
pub mod goal_reporter;
/// Health check service.
pub mod health_service;
/// Frame-rate render loop driving the engine.
pub mod render_service;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Sensor feed WebSocket handling.
pub mod websocket_service;
