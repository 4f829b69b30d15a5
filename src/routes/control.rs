use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        control::{
            ActionResponse, InspectResponse, PauseRequest, PointerRequest, PointerResponse,
            SnapshotResponse, TrailsRequest, ViewportRequest,
        },
        common::PointDto,
    },
    error::AppError,
    services::control_service,
    state::SharedState,
};

/// Routes driving and inspecting the visualization.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/snapshot", get(snapshot))
        .route("/control/pause", post(pause))
        .route("/control/trails", post(trails))
        .route("/control/viewport", post(viewport))
        .route("/control/pointer/down", post(pointer_down))
        .route("/control/pointer/move", post(pointer_move))
        .route("/control/pointer/up", post(pointer_up))
        .route("/control/inspect", post(inspect))
        .route("/control/reset", post(reset))
}

/// Current positions, score, detector phase and toggles.
#[utoipa::path(
    get,
    path = "/snapshot",
    tag = "control",
    responses((status = 200, description = "Engine snapshot", body = SnapshotResponse))
)]
pub async fn snapshot(State(state): State<SharedState>) -> Json<SnapshotResponse> {
    Json(control_service::snapshot(&state).await)
}

/// Pause or resume ingestion and rendering.
#[utoipa::path(
    post,
    path = "/control/pause",
    tag = "control",
    request_body = PauseRequest,
    responses(
        (status = 200, description = "Pause state updated", body = ActionResponse),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn pause(
    State(state): State<SharedState>,
    Json(payload): Json<PauseRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    control_service::set_paused(&state, payload.paused).await?;
    let message = if payload.paused { "paused" } else { "resumed" };
    Ok(Json(ActionResponse::new(message)))
}

/// Enable or disable position trails.
#[utoipa::path(
    post,
    path = "/control/trails",
    tag = "control",
    request_body = TrailsRequest,
    responses(
        (status = 200, description = "Trails toggled", body = ActionResponse),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn trails(
    State(state): State<SharedState>,
    Json(payload): Json<TrailsRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    control_service::set_trails(&state, payload.enabled).await?;
    let message = if payload.enabled {
        "trails enabled"
    } else {
        "trails disabled"
    };
    Ok(Json(ActionResponse::new(message)))
}

/// Resize the viewport used for display conversions.
#[utoipa::path(
    post,
    path = "/control/viewport",
    tag = "control",
    request_body = ViewportRequest,
    responses(
        (status = 200, description = "Viewport resized", body = ActionResponse),
        (status = 400, description = "Invalid viewport size"),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn viewport(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ViewportRequest>>,
) -> Result<Json<ActionResponse>, AppError> {
    let viewport = control_service::resize_viewport(&state, &payload)?;
    Ok(Json(ActionResponse::new(format!(
        "viewport set to {}x{}",
        viewport.width(),
        viewport.height()
    ))))
}

/// Grab the paddle under the pointer.
#[utoipa::path(
    post,
    path = "/control/pointer/down",
    tag = "control",
    request_body = PointerRequest,
    responses(
        (status = 200, description = "Paddle grabbed, if any was in reach", body = PointerResponse),
        (status = 400, description = "Non-finite pointer coordinates"),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn pointer_down(
    State(state): State<SharedState>,
    Json(payload): Json<PointerRequest>,
) -> Result<Json<PointerResponse>, AppError> {
    let response = control_service::pointer_down(&state, PointDto::from(&payload)).await?;
    Ok(Json(response))
}

/// Drag the grabbed paddle.
#[utoipa::path(
    post,
    path = "/control/pointer/move",
    tag = "control",
    request_body = PointerRequest,
    responses(
        (status = 200, description = "Paddle moved when dragging", body = PointerResponse),
        (status = 400, description = "Non-finite pointer coordinates"),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn pointer_move(
    State(state): State<SharedState>,
    Json(payload): Json<PointerRequest>,
) -> Result<Json<PointerResponse>, AppError> {
    let response = control_service::pointer_move(&state, PointDto::from(&payload)).await?;
    Ok(Json(response))
}

/// Release the grabbed paddle.
#[utoipa::path(
    post,
    path = "/control/pointer/up",
    tag = "control",
    responses(
        (status = 200, description = "Drag released", body = PointerResponse),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn pointer_up(
    State(state): State<SharedState>,
) -> Result<Json<PointerResponse>, AppError> {
    Ok(Json(control_service::pointer_up(&state).await?))
}

/// Real-world coordinates under a pointer location.
#[utoipa::path(
    post,
    path = "/control/inspect",
    tag = "control",
    request_body = PointerRequest,
    responses(
        (status = 200, description = "Coordinate readout", body = InspectResponse),
        (status = 400, description = "Non-finite pointer coordinates")
    )
)]
pub async fn inspect(
    State(state): State<SharedState>,
    Json(payload): Json<PointerRequest>,
) -> Result<Json<InspectResponse>, AppError> {
    let response = control_service::inspect(&state, PointDto::from(&payload)).await?;
    Ok(Json(response))
}

/// Re-initialize positions, score and statistics.
#[utoipa::path(
    post,
    path = "/control/reset",
    tag = "control",
    responses(
        (status = 200, description = "Visualization reset", body = ActionResponse),
        (status = 409, description = "Visualization destroyed")
    )
)]
pub async fn reset(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    control_service::reset(&state).await?;
    Ok(Json(ActionResponse::new("visualization reset")))
}
