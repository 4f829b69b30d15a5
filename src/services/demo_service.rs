//! Synthetic sensor feed for running the visualization without a tracker.

use std::{
    f64::consts::TAU,
    time::{Duration, Instant},
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::info;

use crate::{
    dto::{common::PointDto, ws::PositionMessage},
    geometry::SensorDomain,
    state::SharedState,
};

/// Rate at which demo messages are produced (20 Hz).
pub const DEMO_PERIOD: Duration = Duration::from_millis(50);
/// Maximum tracker noise added to each coordinate, in sensor units.
const JITTER: f64 = 2.0;

/// Position message for time `t` (seconds since the feed started).
///
/// Paddles sway around their own half while the puck follows a Lissajous
/// path spanning most of the table, with a little tracker noise on top.
/// Every point lies inside `domain`.
pub fn demo_message(t: f64, domain: &SensorDomain, rng: &mut impl Rng) -> PositionMessage {
    let (w, h) = (domain.width, domain.height);
    let mut point = |x: f64, y: f64| {
        Some(PointDto {
            x: x + rng.random_range(-JITTER..=JITTER),
            y: y + rng.random_range(-JITTER..=JITTER),
        })
    };

    PositionMessage::from_points(
        point(
            w * (0.2 + 0.08 * (t * 0.9).sin()),
            h * (0.5 + 0.3 * (t * 1.3).sin()),
        ),
        point(
            w * (0.8 + 0.08 * (t * 1.1).cos()),
            h * (0.5 + 0.3 * (t * 0.7).cos()),
        ),
        point(
            w * (0.5 + 0.45 * (TAU * t / 7.0).sin()),
            h * (0.5 + 0.45 * (TAU * t / 3.0).sin()),
        ),
    )
}

/// Feed demo messages into the engine until the render loop stops.
pub fn spawn(state: SharedState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let domain = state.config().engine_settings().sensor;
        let started = Instant::now();
        let mut rng = StdRng::from_os_rng();
        let mut ticker = interval(DEMO_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("demo sensor feed started");

        while state.render_loop().is_running() {
            ticker.tick().await;
            let now = Instant::now();
            let message = demo_message(
                now.duration_since(started).as_secs_f64(),
                &domain,
                &mut rng,
            );
            state.with_viz(|viz| viz.ingest(&message, now)).await;
        }

        info!("demo sensor feed stopped");
    })
}
