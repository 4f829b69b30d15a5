use std::time::Instant;

use tracing::debug;

use crate::{
    engine::Visualization,
    geometry::{DisplayPos, RealPos, TrackedObject},
};

impl Visualization {
    /// Grab the nearest paddle within the hit radius of the pointer.
    pub fn pointer_down(&mut self, display: DisplayPos) -> Option<TrackedObject> {
        let pointer = self.inspect(display);
        self.drag = TrackedObject::PADDLES
            .into_iter()
            .map(|paddle| (paddle, self.positions.get(paddle).distance_to(&pointer)))
            .filter(|(_, distance)| *distance <= self.hit_radius)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(paddle, _)| paddle);

        if let Some(paddle) = self.drag {
            debug!(paddle = paddle.label(), pointer = %pointer, "paddle grabbed");
        }
        self.drag
    }

    /// Move the grabbed paddle under the pointer.
    ///
    /// The converted position is written as is. Ingest validation does not
    /// apply; the next tick clamps it onto the table.
    pub fn pointer_move(&mut self, display: DisplayPos, now: Instant) -> Option<RealPos> {
        let paddle = self.drag?;
        let real = self.inspect(display);
        self.write_position(paddle, real, now);
        self.publish_positions();
        Some(real)
    }

    pub fn pointer_up(&mut self) {
        if let Some(paddle) = self.drag.take() {
            debug!(paddle = paddle.label(), "paddle released");
        }
    }

    pub fn dragging(&self) -> Option<TrackedObject> {
        self.drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::engine;

    #[test]
    fn drag_writes_display_position_directly() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();

        // paddle A rests at (8.6, 13) cm, i.e. (172, 260) px
        assert_eq!(
            viz.pointer_down(DisplayPos::new(175.0, 255.0)),
            Some(TrackedObject::PaddleA)
        );

        let moved = viz.pointer_move(DisplayPos::new(100.0, 50.0), now).unwrap();
        assert_eq!(moved, RealPos::new(5.0, 2.5));
        assert_eq!(viz.position(TrackedObject::PaddleA), RealPos::new(5.0, 2.5));

        viz.pointer_up();
        assert_eq!(viz.dragging(), None);
        assert!(viz.pointer_move(DisplayPos::new(300.0, 300.0), now).is_none());
        assert_eq!(viz.position(TrackedObject::PaddleA), RealPos::new(5.0, 2.5));
    }

    #[test]
    fn dragged_paddle_is_clamped_on_the_next_tick() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();

        viz.pointer_down(DisplayPos::new(172.0, 260.0));
        viz.pointer_move(DisplayPos::new(100.0, 50.0), now);
        viz.tick(now);

        assert_eq!(viz.position(TrackedObject::PaddleA), RealPos::new(5.0, 2.5));

        viz.pointer_move(DisplayPos::new(0.0, 0.0), now);
        viz.tick(now);
        assert_eq!(viz.position(TrackedObject::PaddleA), RealPos::new(2.5, 2.5));
    }

    #[test]
    fn pointer_far_from_paddles_grabs_nothing() {
        let (mut viz, _, _) = engine();
        // table center: puck only, both paddles more than 5 cm away
        assert_eq!(viz.pointer_down(DisplayPos::new(430.0, 260.0)), None);
    }

    #[test]
    fn nearest_paddle_wins() {
        let (mut viz, _, _) = engine();
        let now = Instant::now();
        viz.pointer_down(DisplayPos::new(172.0, 260.0));
        viz.pointer_move(DisplayPos::new(600.0, 260.0), now);
        viz.pointer_up();

        // paddle A at 30 cm, paddle B at 34.4 cm; pointer at 32 cm
        assert_eq!(
            viz.pointer_down(DisplayPos::new(640.0, 260.0)),
            Some(TrackedObject::PaddleA)
        );
    }
}
