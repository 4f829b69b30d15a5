use std::time::Instant;

use crate::{
    dto::{
        common::PointDto,
        sse::{FrameEvent, GoalScoredEvent, ObjectFrame, TrailsFrame},
    },
    engine::Visualization,
    geometry::{TrackedObject, Viewport},
    state::hub::VizEvent,
};

impl Visualization {
    /// Run one frame: constrain positions, evaluate goals, then present.
    ///
    /// Returns `None` without touching anything while paused.
    pub fn tick(&mut self, now: Instant) -> Option<FrameEvent> {
        if self.paused {
            return None;
        }

        self.enforce_boundaries();

        let puck_radius = self.mapper.dimensions().puck_radius();
        if let Some(goal) =
            self.detector
                .evaluate(&self.boundary, self.positions.puck, puck_radius, now)
        {
            self.hub
                .publish(VizEvent::GoalScored(GoalScoredEvent::from(&goal)));
        }

        self.motion.prune(now);

        let frame = self.project(self.surface.viewport());
        self.surface.present(&frame);
        Some(frame)
    }

    fn enforce_boundaries(&mut self) {
        let dims = *self.mapper.dimensions();
        for object in TrackedObject::ALL {
            let kind = object.kind();
            let clamped =
                self.boundary
                    .clamp(kind, self.positions.get(object), dims.radius_of(kind));
            self.positions.set(object, clamped);
        }
    }

    fn project(&mut self, viewport: Viewport) -> FrameEvent {
        self.sequence += 1;

        let (scale_x, scale_y) = self.mapper.scale(viewport);
        let dims = self.mapper.dimensions();
        let object_frame = |object: TrackedObject| {
            let real = self.positions.get(object);
            let radius = dims.radius_of(object.kind());
            ObjectFrame {
                display: self.mapper.real_to_display(real, viewport).into(),
                real: real.into(),
                radius_px: PointDto {
                    x: radius * scale_x,
                    y: radius * scale_y,
                },
            }
        };

        let trails = self.motion.trails_enabled().then(|| {
            let trail = |object: TrackedObject| -> Vec<PointDto> {
                self.motion
                    .trail(object)
                    .iter()
                    .map(|point| self.mapper.real_to_display(point.position, viewport).into())
                    .collect()
            };
            TrailsFrame {
                paddle_a: trail(TrackedObject::PaddleA),
                paddle_b: trail(TrackedObject::PaddleB),
                puck: trail(TrackedObject::Puck),
            }
        });

        FrameEvent {
            sequence: self.sequence,
            viewport,
            paddle_a: object_frame(TrackedObject::PaddleA),
            paddle_b: object_frame(TrackedObject::PaddleB),
            puck: object_frame(TrackedObject::Puck),
            score: self.detector.score(),
            puck_speed: self.motion.puck_speed(),
            update_rate: self.motion.update_rate(),
            trails,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        dto::ws::PositionMessage,
        engine::tests::engine,
        geometry::{RealPos, Side},
        state::goal_detector::{DetectorPhase, ScoreState},
    };

    fn puck_at(x: f64, y: f64) -> PositionMessage {
        PositionMessage::from_points(None, None, Some(PointDto { x, y }))
    }

    #[test]
    fn puck_on_left_goal_line_scores_once_for_the_right_side() {
        let (mut viz, surface, hub) = engine();
        let mut rx = hub.subscribe();
        let start = Instant::now();

        viz.ingest(&puck_at(0.0, 200.0), start);
        let frame = viz.tick(start).unwrap();

        assert_eq!(frame.puck.display.x, 0.0);
        assert_eq!(frame.puck.display.y, 260.0);
        assert_eq!(frame.score, ScoreState { left: 0, right: 1 });
        assert_eq!(surface.presented(), 1);

        let mut goals = 0;
        while let Ok(event) = rx.try_recv() {
            if let VizEvent::GoalScored(goal) = event {
                assert_eq!(goal.goal, Side::Left);
                assert_eq!(goal.scorer, Side::Right);
                assert_eq!(goal.team, "B");
                goals += 1;
            }
        }
        assert_eq!(goals, 1);

        for step in 1..=10 {
            viz.tick(start + Duration::from_millis(step * 100));
        }
        assert_eq!(viz.score(), ScoreState { left: 0, right: 1 });
        assert!(matches!(
            viz.detector_phase(start + Duration::from_millis(1000)),
            DetectorPhase::Cooldown { .. }
        ));
    }

    #[test]
    fn goal_counts_again_after_cooldown() {
        let (mut viz, _, _) = engine();
        let start = Instant::now();

        viz.ingest(&puck_at(800.0, 200.0), start);
        viz.tick(start);
        viz.tick(start + Duration::from_millis(1999));
        assert_eq!(viz.score().left, 1);

        viz.tick(start + Duration::from_millis(2000));
        assert_eq!(viz.score().left, 2);
    }

    #[test]
    fn puck_outside_aperture_is_clamped_not_scored() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();

        viz.ingest(&puck_at(0.0, 20.0), now);
        viz.tick(now);

        assert_eq!(viz.score(), ScoreState::default());
        let puck = viz.position(TrackedObject::Puck);
        assert_eq!(puck, RealPos::new(2.0, 2.0));
    }

    #[test]
    fn paddles_are_clamped_before_projection() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();
        let message = PositionMessage::from_points(
            Some(PointDto { x: 0.0, y: 200.0 }),
            Some(PointDto { x: 800.0, y: 400.0 }),
            None,
        );

        viz.ingest(&message, now);
        let frame = viz.tick(now).unwrap();

        assert_eq!(frame.paddle_a.real, PointDto { x: 2.5, y: 13.0 });
        assert_eq!(frame.paddle_b.real, PointDto { x: 40.5, y: 23.5 });
    }

    #[test]
    fn paused_tick_presents_nothing() {
        let (mut viz, surface, _) = engine();
        let now = Instant::now();
        viz.ingest(&puck_at(0.0, 200.0), now);
        viz.set_paused(true);

        assert!(viz.tick(now).is_none());
        assert_eq!(surface.presented(), 0);
        assert_eq!(viz.score(), ScoreState::default());
    }

    #[test]
    fn resized_viewport_applies_to_the_next_frame() {
        let (mut viz, surface, _) = engine();
        let now = Instant::now();

        let first = viz.tick(now).unwrap();
        assert_eq!(first.puck.display, PointDto { x: 430.0, y: 260.0 });

        surface.resize(Viewport::new(430.0, 130.0).unwrap());
        let second = viz.tick(now).unwrap();

        assert_eq!(second.puck.display, PointDto { x: 215.0, y: 65.0 });
        assert_eq!(second.sequence, first.sequence + 1);
        assert_eq!(second.viewport.width(), 430.0);
    }

    #[test]
    fn radius_is_scaled_per_axis() {
        let (mut viz, _, _) = engine();
        let frame = viz.tick(Instant::now()).unwrap();

        assert_eq!(frame.puck.radius_px, PointDto { x: 40.0, y: 40.0 });
        assert_eq!(frame.paddle_a.radius_px, PointDto { x: 50.0, y: 50.0 });
    }

    #[test]
    fn trails_follow_the_toggle() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();
        viz.ingest(&puck_at(400.0, 200.0), now);

        let frame = viz.tick(now).unwrap();
        let trails = frame.trails.unwrap();
        assert_eq!(trails.puck, vec![PointDto { x: 430.0, y: 260.0 }]);

        viz.set_trails(false);
        assert!(viz.tick(now).unwrap().trails.is_none());
    }
}
