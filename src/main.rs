//! hockey-viz binary entrypoint wiring the visualization engine to WebSocket, SSE and REST layers.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hockey_viz::{
    config::AppConfig,
    routes,
    services::{demo_service, render_service},
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config).context("initializing table visualization")?;

    let render_task = render_service::spawn(app_state.clone());
    if app_state.config().demo_mode() {
        demo_service::spawn(app_state.clone());
    }
    spawn_goal_reporter(&app_state);

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state.clone());

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal(app_state.clone()))
        .await
        .context("serving axum")?;

    app_state.destroy();
    render_task.await.context("joining render loop")?;

    Ok(())
}

#[cfg(feature = "goal-reporter")]
fn spawn_goal_reporter(state: &SharedState) {
    use hockey_viz::services::goal_reporter::{self, GoalReporter};
    use tracing::warn;

    let Some(url) = state.config().goal_report_url() else {
        return;
    };
    match GoalReporter::new(url) {
        Ok(reporter) => {
            goal_reporter::spawn(state.clone(), reporter);
        }
        Err(err) => warn!(error = %err, "goal reporting disabled"),
    }
}

#[cfg(not(feature = "goal-reporter"))]
fn spawn_goal_reporter(state: &SharedState) {
    if state.config().goal_report_url().is_some() {
        tracing::warn!("goal_report_url is set but the goal-reporter feature is disabled");
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM, then destroy the visualization so background tasks wind down.
async fn shutdown_signal(state: SharedState) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
    state.destroy();
}
