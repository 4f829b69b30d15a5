use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use crate::geometry::{RealPos, TrackedObject};

/// Default number of samples kept per trail.
pub const DEFAULT_TRAIL_CAPACITY: usize = 50;
/// Default age after which a trail sample is dropped.
pub const DEFAULT_TRAIL_MAX_AGE: Duration = Duration::from_secs(5);

const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Limits applied to position trails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSettings {
    pub capacity: usize,
    pub max_age: Duration,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TRAIL_CAPACITY,
            max_age: DEFAULT_TRAIL_MAX_AGE,
        }
    }
}

/// A position sample kept for trail rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: RealPos,
    pub at: Instant,
}

/// Trails, puck speed and ingest rate.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    settings: TrailSettings,
    enabled: bool,
    trails: [VecDeque<TrailPoint>; 3],
    last_puck: Option<TrailPoint>,
    puck_speed: f64,
    window_start: Option<Instant>,
    window_count: u32,
    update_rate: u32,
}

impl MotionTracker {
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            settings,
            enabled: true,
            trails: Default::default(),
            last_puck: None,
            puck_speed: 0.0,
            window_start: None,
            window_count: 0,
            update_rate: 0,
        }
    }

    pub fn trails_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle trail recording. Disabling drops the recorded samples.
    pub fn set_trails_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.trails.iter_mut().for_each(VecDeque::clear);
        }
    }

    /// Record a position written for `object`.
    ///
    /// Puck samples also update the speed estimate (cm/s).
    pub fn record_position(&mut self, object: TrackedObject, position: RealPos, now: Instant) {
        let sample = TrailPoint { position, at: now };

        if object == TrackedObject::Puck {
            if let Some(previous) = self.last_puck {
                let elapsed = now.saturating_duration_since(previous.at).as_secs_f64();
                if elapsed > 0.0 {
                    self.puck_speed = position.distance_to(&previous.position) / elapsed;
                }
            }
            self.last_puck = Some(sample);
        }

        if self.enabled {
            let trail = &mut self.trails[object.index()];
            trail.push_back(sample);
            while trail.len() > self.settings.capacity {
                trail.pop_front();
            }
        }
    }

    /// Count one ingested message toward the update rate.
    pub fn record_message(&mut self, now: Instant) {
        let start = *self.window_start.get_or_insert(now);
        self.window_count += 1;
        if now.saturating_duration_since(start) >= RATE_WINDOW {
            self.update_rate = self.window_count;
            self.window_count = 0;
            self.window_start = Some(now);
        }
    }

    /// Drop trail samples older than the configured maximum age.
    pub fn prune(&mut self, now: Instant) {
        let max_age = self.settings.max_age;
        for trail in &mut self.trails {
            trail.retain(|point| now.saturating_duration_since(point.at) < max_age);
        }
    }

    pub fn trail(&self, object: TrackedObject) -> &VecDeque<TrailPoint> {
        &self.trails[object.index()]
    }

    pub fn puck_speed(&self) -> f64 {
        self.puck_speed
    }

    pub fn update_rate(&self) -> u32 {
        self.update_rate
    }

    /// Forget everything except the settings and the enabled flag.
    pub fn reset(&mut self) {
        let enabled = self.enabled;
        *self = Self::new(self.settings);
        self.enabled = enabled;
    }
}
