use utoipa::OpenApi;

/// Aggregated OpenAPI specification for the table visualization service.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::event_stream,
        crate::routes::websocket::ws_handler,
        crate::routes::control::snapshot,
        crate::routes::control::pause,
        crate::routes::control::trails,
        crate::routes::control::viewport,
        crate::routes::control::pointer_down,
        crate::routes::control::pointer_move,
        crate::routes::control::pointer_up,
        crate::routes::control::inspect,
        crate::routes::control::reset,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::PointDto,
            crate::dto::ws::PositionMessage,
            crate::dto::sse::PositionUpdateEvent,
            crate::dto::sse::GoalScoredEvent,
            crate::dto::sse::FrameEvent,
            crate::dto::sse::ObjectFrame,
            crate::dto::sse::TrailsFrame,
            crate::dto::sse::SensorStatusEvent,
            crate::dto::control::PauseRequest,
            crate::dto::control::TrailsRequest,
            crate::dto::control::ViewportRequest,
            crate::dto::control::PointerRequest,
            crate::dto::control::PointerResponse,
            crate::dto::control::InspectResponse,
            crate::dto::control::ActionResponse,
            crate::dto::control::SnapshotResponse,
            crate::dto::control::DetectorPhaseDto,
            crate::geometry::Side,
            crate::geometry::TrackedObject,
            crate::geometry::Viewport,
            crate::state::goal_detector::ScoreState,
            crate::state::render_loop::LoopPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "sensors", description = "WebSocket ingest for sensor feeds"),
        (name = "control", description = "Visualization control and inspection"),
    )
)]
pub struct ApiDoc;
