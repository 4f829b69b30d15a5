use std::time::Instant;

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info};

use crate::state::SharedState;

/// Start the render loop on the runtime.
pub fn spawn(state: SharedState) -> JoinHandle<()> {
    tokio::spawn(run(state))
}

/// Tick the engine at the configured frame rate until the loop is stopped.
///
/// The phase is checked before every tick, so a tick already running when
/// the visualization is destroyed completes but nothing is scheduled after it.
pub async fn run(state: SharedState) {
    let period = state.config().frame_interval();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut watcher = state.render_loop().watcher();

    info!(period_ms = period.as_millis() as u64, "render loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !state.render_loop().is_running() {
                    break;
                }
                let presented = state.with_viz(|viz| viz.tick(Instant::now())).await;
                if presented.is_none() {
                    debug!("render tick skipped while paused");
                }
            }
            changed = watcher.changed() => {
                if changed.is_err() || !state.render_loop().is_running() {
                    break;
                }
            }
        }
    }

    info!("render loop stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{sleep, timeout};

    use super::*;
    use crate::{
        config::AppConfig,
        state::{AppState, hub::VizEvent},
    };

    #[tokio::test]
    async fn loop_presents_frames_until_destroyed() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let mut rx = state.hub().subscribe();
        let handle = spawn(state.clone());

        let first = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no frame within 2s")
            .unwrap();
        assert!(matches!(first, VizEvent::Frame(_)));

        assert!(state.destroy());
        timeout(Duration::from_secs(2), handle)
            .await
            .expect("render loop kept running after destroy")
            .unwrap();
    }

    #[tokio::test]
    async fn destroyed_loop_never_ticks() {
        let state = AppState::new(AppConfig::default()).unwrap();
        state.destroy();
        let mut rx = state.hub().subscribe();

        timeout(Duration::from_secs(2), run(state.clone()))
            .await
            .unwrap();
        sleep(Duration::from_millis(50)).await;

        assert!(rx.try_recv().is_err());
    }
}
