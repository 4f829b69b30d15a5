use std::time::Instant;

use tracing::info;

use crate::{
    dto::{
        common::PointDto,
        control::{InspectResponse, PointerResponse, SnapshotResponse, ViewportRequest},
    },
    error::ServiceError,
    geometry::{DisplayPos, Viewport},
    state::SharedState,
};

fn ensure_running(state: &SharedState) -> Result<(), ServiceError> {
    if state.render_loop().is_running() {
        Ok(())
    } else {
        Err(ServiceError::InvalidState(
            "visualization has been destroyed".into(),
        ))
    }
}

fn display_point(point: PointDto) -> Result<DisplayPos, ServiceError> {
    let position: DisplayPos = point.into_position();
    if position.is_finite() {
        Ok(position)
    } else {
        Err(ServiceError::InvalidInput(
            "pointer coordinates must be finite".into(),
        ))
    }
}

pub async fn snapshot(state: &SharedState) -> SnapshotResponse {
    let snapshot = state.with_viz(|viz| viz.snapshot(Instant::now())).await;
    SnapshotResponse::new(snapshot, state.render_loop().phase())
}

pub async fn set_paused(state: &SharedState, paused: bool) -> Result<(), ServiceError> {
    ensure_running(state)?;
    state.with_viz(|viz| viz.set_paused(paused)).await;
    Ok(())
}

pub async fn set_trails(state: &SharedState, enabled: bool) -> Result<(), ServiceError> {
    ensure_running(state)?;
    state.with_viz(|viz| viz.set_trails(enabled)).await;
    info!(enabled, "trails toggled");
    Ok(())
}

pub fn resize_viewport(
    state: &SharedState,
    request: &ViewportRequest,
) -> Result<Viewport, ServiceError> {
    ensure_running(state)?;
    let viewport = Viewport::new(request.width, request.height)?;
    state.resize_viewport(viewport);
    Ok(viewport)
}

pub async fn pointer_down(
    state: &SharedState,
    point: PointDto,
) -> Result<PointerResponse, ServiceError> {
    ensure_running(state)?;
    let display = display_point(point)?;
    let dragging = state.with_viz(|viz| viz.pointer_down(display)).await;
    Ok(PointerResponse {
        dragging,
        position: None,
    })
}

pub async fn pointer_move(
    state: &SharedState,
    point: PointDto,
) -> Result<PointerResponse, ServiceError> {
    ensure_running(state)?;
    let display = display_point(point)?;
    let (dragging, moved) = state
        .with_viz(|viz| {
            let moved = viz.pointer_move(display, Instant::now());
            (viz.dragging(), moved)
        })
        .await;
    Ok(PointerResponse {
        dragging,
        position: moved.map(Into::into),
    })
}

pub async fn pointer_up(state: &SharedState) -> Result<PointerResponse, ServiceError> {
    ensure_running(state)?;
    state.with_viz(|viz| viz.pointer_up()).await;
    Ok(PointerResponse {
        dragging: None,
        position: None,
    })
}

pub async fn inspect(state: &SharedState, point: PointDto) -> Result<InspectResponse, ServiceError> {
    let display = display_point(point)?;
    let real = state.with_viz(|viz| viz.inspect(display)).await;
    Ok(InspectResponse {
        display: display.into(),
        real: real.into(),
    })
}

pub async fn reset(state: &SharedState) -> Result<(), ServiceError> {
    ensure_running(state)?;
    state.with_viz(|viz| viz.reset()).await;
    Ok(())
}
