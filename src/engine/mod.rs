//! The visualization engine: one context object owning every piece of live
//! table state.
//!
//! [`Visualization`] is synchronous. Position ingestion, the render tick and
//! pointer control are methods on it, so whoever owns the instance decides how
//! those calls interleave; none of them can overlap.

mod ingest;
mod manual;
pub mod motion;
mod render;
pub mod surface;

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::{
    dto::sse::PositionUpdateEvent,
    error::EngineError,
    geometry::{
        BoundaryValidator, CoordinateMapper, DisplayPos, RealDimensions, RealPos, SensorDomain,
        TrackedObject, Viewport,
    },
    state::{
        goal_detector::{DetectorPhase, GOAL_COOLDOWN, GoalDetector, ScoreState},
        hub::{EventHub, VizEvent},
    },
};

pub use self::ingest::{IngestOutcome, validate_position_data};
pub use self::motion::{MotionTracker, TrailSettings};
pub use self::surface::{BroadcastSurface, RenderSurface, RenderTarget};

/// Static parameters of an engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub dimensions: RealDimensions,
    pub sensor: SensorDomain,
    pub goal_cooldown: Duration,
    /// Maximum real-world distance (cm) between pointer and paddle for a grab.
    pub hit_radius: f64,
    pub trails: TrailSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let dimensions = RealDimensions::default();
        Self {
            dimensions,
            sensor: SensorDomain::default(),
            goal_cooldown: GOAL_COOLDOWN,
            hit_radius: dimensions.pusher_diameter,
            trails: TrailSettings::default(),
        }
    }
}

/// Real-world positions of the three objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Positions {
    pub paddle_a: RealPos,
    pub paddle_b: RealPos,
    pub puck: RealPos,
}

impl Positions {
    /// Paddles at 20% and 80% of the length, puck at the center.
    pub fn initial(dims: &RealDimensions) -> Self {
        let center_y = dims.table_width / 2.0;
        Self {
            paddle_a: RealPos::new(dims.table_length * 0.2, center_y),
            paddle_b: RealPos::new(dims.table_length * 0.8, center_y),
            puck: RealPos::new(dims.table_length * 0.5, center_y),
        }
    }

    pub fn get(&self, object: TrackedObject) -> RealPos {
        match object {
            TrackedObject::PaddleA => self.paddle_a,
            TrackedObject::PaddleB => self.paddle_b,
            TrackedObject::Puck => self.puck,
        }
    }

    fn set(&mut self, object: TrackedObject, position: RealPos) {
        match object {
            TrackedObject::PaddleA => self.paddle_a = position,
            TrackedObject::PaddleB => self.paddle_b = position,
            TrackedObject::Puck => self.puck = position,
        }
    }
}

/// Point-in-time view of the engine state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub positions: Positions,
    pub score: ScoreState,
    pub detector: DetectorPhase,
    pub paused: bool,
    pub trails: bool,
    pub viewport: Viewport,
    pub dragging: Option<TrackedObject>,
}

/// Live table visualization.
pub struct Visualization {
    mapper: CoordinateMapper,
    boundary: BoundaryValidator,
    detector: GoalDetector,
    positions: Positions,
    motion: MotionTracker,
    drag: Option<TrackedObject>,
    paused: bool,
    hit_radius: f64,
    sequence: u64,
    surface: Box<dyn RenderSurface>,
    hub: EventHub,
}

impl Visualization {
    /// Build the engine on top of `surface`.
    ///
    /// Fails with [`EngineError::ElementMissing`] when the surface lacks one of
    /// [`RenderTarget::REQUIRED`].
    pub fn init(
        settings: &EngineSettings,
        surface: Box<dyn RenderSurface>,
        hub: EventHub,
    ) -> Result<Self, EngineError> {
        if let Some(missing) = RenderTarget::REQUIRED
            .into_iter()
            .find(|target| !surface.has_target(*target))
        {
            error!(render_target = %missing, "render surface lacks a required target");
            return Err(EngineError::ElementMissing(missing));
        }

        let dims = settings.dimensions;
        info!(
            table_length = dims.table_length,
            table_width = dims.table_width,
            goal_length = dims.goal_length,
            sensor_width = settings.sensor.width,
            sensor_height = settings.sensor.height,
            "table visualization initialized"
        );

        Ok(Self {
            mapper: CoordinateMapper::new(dims, settings.sensor),
            boundary: BoundaryValidator::new(dims),
            detector: GoalDetector::new(settings.goal_cooldown),
            positions: Positions::initial(&dims),
            motion: MotionTracker::new(settings.trails),
            drag: None,
            paused: false,
            hit_radius: settings.hit_radius,
            sequence: 0,
            surface,
            hub,
        })
    }

    /// Re-initialize positions, score, detector and statistics.
    pub fn reset(&mut self) {
        self.positions = Positions::initial(self.mapper.dimensions());
        self.detector.reset();
        self.motion.reset();
        self.drag = None;
        info!("table visualization reset");
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            info!(paused, "visualization pause toggled");
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_trails(&mut self, enabled: bool) {
        self.motion.set_trails_enabled(enabled);
    }

    pub fn trails_enabled(&self) -> bool {
        self.motion.trails_enabled()
    }

    pub fn position(&self, object: TrackedObject) -> RealPos {
        self.positions.get(object)
    }

    pub fn positions(&self) -> Positions {
        self.positions
    }

    pub fn score(&self) -> ScoreState {
        self.detector.score()
    }

    pub fn detector_phase(&self, now: Instant) -> DetectorPhase {
        self.detector.phase(now)
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn motion(&self) -> &MotionTracker {
        &self.motion
    }

    /// Viewport as currently reported by the surface.
    pub fn viewport(&self) -> Viewport {
        self.surface.viewport()
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot {
        Snapshot {
            positions: self.positions,
            score: self.detector.score(),
            detector: self.detector.phase(now),
            paused: self.paused,
            trails: self.motion.trails_enabled(),
            viewport: self.surface.viewport(),
            dragging: self.drag,
        }
    }

    /// Real-world coordinates under a pointer location.
    pub fn inspect(&self, display: DisplayPos) -> RealPos {
        self.mapper.display_to_real(display, self.surface.viewport())
    }

    fn write_position(&mut self, object: TrackedObject, position: RealPos, now: Instant) {
        self.positions.set(object, position);
        self.motion.record_position(object, position, now);
    }

    fn publish_positions(&self) {
        self.hub
            .publish(VizEvent::PositionUpdate(PositionUpdateEvent {
                paddle_a: self.positions.paddle_a.into(),
                paddle_b: self.positions.paddle_b.into(),
                puck: self.positions.puck.into(),
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::{surface::testing::RecordingSurface, *};

    pub(super) fn engine() -> (Visualization, RecordingSurface, EventHub) {
        let surface = RecordingSurface::new(Viewport::new(860.0, 520.0).unwrap());
        let hub = EventHub::new(64);
        let viz = Visualization::init(
            &EngineSettings::default(),
            Box::new(surface.clone()),
            hub.clone(),
        )
        .unwrap();
        (viz, surface, hub)
    }

    #[test]
    fn init_places_objects_at_initial_positions() {
        let (viz, _, _) = engine();
        let paddle_a = viz.position(TrackedObject::PaddleA);
        assert!((paddle_a.x - 8.6).abs() < 1e-9);
        assert_eq!(paddle_a.y, 13.0);
        assert_eq!(viz.position(TrackedObject::Puck), RealPos::new(21.5, 13.0));
        assert_eq!(viz.score(), ScoreState::default());
    }

    #[test]
    fn init_fails_when_a_required_target_is_missing() {
        let mut surface = RecordingSurface::new(Viewport::default());
        surface.targets.retain(|target| *target != RenderTarget::PaddleB);

        let result = Visualization::init(
            &EngineSettings::default(),
            Box::new(surface),
            EventHub::new(4),
        );
        assert!(matches!(
            result,
            Err(EngineError::ElementMissing(RenderTarget::PaddleB))
        ));
    }

    #[test]
    fn position_indicator_is_optional() {
        let mut surface = RecordingSurface::new(Viewport::default());
        surface
            .targets
            .retain(|target| *target != RenderTarget::PositionIndicator);
        assert!(
            Visualization::init(
                &EngineSettings::default(),
                Box::new(surface),
                EventHub::new(4)
            )
            .is_ok()
        );
    }

    #[test]
    fn reset_restores_initial_state() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();
        let initial = viz.positions();
        viz.pointer_down(DisplayPos::new(172.0, 260.0));
        viz.pointer_move(DisplayPos::new(300.0, 100.0), now);
        viz.set_trails(false);

        viz.reset();

        let snapshot = viz.snapshot(now);
        assert_eq!(snapshot.positions, initial);
        assert_eq!(snapshot.dragging, None);
        assert_eq!(snapshot.detector, DetectorPhase::Armed);
        assert!(!snapshot.trails);
        assert!(viz.motion().trail(TrackedObject::PaddleA).is_empty());
    }

    #[test]
    fn inspect_converts_pointer_to_real() {
        let (viz, _, _) = engine();
        let real = viz.inspect(DisplayPos::new(430.0, 260.0));
        assert!((real.x - 21.5).abs() < 1e-9);
        assert!((real.y - 13.0).abs() < 1e-9);
    }
}
