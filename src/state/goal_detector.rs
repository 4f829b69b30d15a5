use std::time::{Duration, Instant, SystemTime};

use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::geometry::{BoundaryValidator, RealPos, Side};

/// Refractory period after a goal during which no further goal is counted.
pub const GOAL_COOLDOWN: Duration = Duration::from_millis(2000);

/// Phases of the goal detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorPhase {
    /// Goals are being evaluated.
    Armed,
    /// A goal was just scored; evaluation is skipped until the cooldown elapses.
    Cooldown {
        /// Moment the goal was detected.
        since: Instant,
    },
}

/// Goals scored by each side in the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreState {
    pub left: u32,
    pub right: u32,
}

impl ScoreState {
    fn credit(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// A confirmed goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalEvent {
    pub id: Uuid,
    /// Goal the puck entered.
    pub goal: Side,
    /// Side credited with the point.
    pub scorer: Side,
    /// Score after crediting the goal.
    pub score: ScoreState,
    pub timestamp: SystemTime,
}

/// Puck-in-goal detector with a fixed cooldown.
///
/// The detector owns the score. The cooldown is measured against the
/// monotonic clock supplied by the caller, so the return to [`DetectorPhase::Armed`]
/// is observed at the first evaluation after the window has elapsed. Once a
/// cooldown starts only [`GoalDetector::reset`] can cut it short.
#[derive(Debug, Clone)]
pub struct GoalDetector {
    phase: DetectorPhase,
    score: ScoreState,
    cooldown: Duration,
}

impl Default for GoalDetector {
    fn default() -> Self {
        Self::new(GOAL_COOLDOWN)
    }
}

impl GoalDetector {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            phase: DetectorPhase::Armed,
            score: ScoreState::default(),
            cooldown,
        }
    }

    /// Current phase as of `now`, accounting for an elapsed cooldown.
    pub fn phase(&self, now: Instant) -> DetectorPhase {
        match self.phase {
            DetectorPhase::Cooldown { since } if self.cooldown_elapsed(since, now) => {
                DetectorPhase::Armed
            }
            phase => phase,
        }
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    /// Run one evaluation pass for the puck at `puck`.
    ///
    /// Returns the goal event when a goal is confirmed. Nothing is evaluated
    /// while cooling down.
    pub fn evaluate(
        &mut self,
        boundary: &BoundaryValidator,
        puck: RealPos,
        puck_radius: f64,
        now: Instant,
    ) -> Option<GoalEvent> {
        if let DetectorPhase::Cooldown { since } = self.phase {
            if !self.cooldown_elapsed(since, now) {
                return None;
            }
            debug!("goal cooldown elapsed; detector re-armed");
            self.phase = DetectorPhase::Armed;
        }

        let goal = boundary.goal_mouth(puck, puck_radius)?;
        let scorer = goal.opponent();
        self.score.credit(scorer);
        self.phase = DetectorPhase::Cooldown { since: now };

        info!(
            goal = %goal,
            scorer = %scorer,
            left = self.score.left,
            right = self.score.right,
            "goal scored"
        );

        Some(GoalEvent {
            id: Uuid::new_v4(),
            goal,
            scorer,
            score: self.score,
            timestamp: SystemTime::now(),
        })
    }

    /// Zero the score and re-arm immediately.
    pub fn reset(&mut self) {
        self.phase = DetectorPhase::Armed;
        self.score = ScoreState::default();
    }

    fn cooldown_elapsed(&self, since: Instant, now: Instant) -> bool {
        now.saturating_duration_since(since) >= self.cooldown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RealDimensions;

    fn boundary() -> BoundaryValidator {
        BoundaryValidator::new(RealDimensions::default())
    }

    #[test]
    fn left_goal_scores_for_right_once_during_cooldown() {
        let mut detector = GoalDetector::default();
        let start = Instant::now();
        let puck = RealPos::new(0.0, 13.0);

        let event = detector
            .evaluate(&boundary(), puck, 2.0, start)
            .expect("goal expected");
        assert_eq!(event.goal, Side::Left);
        assert_eq!(event.scorer, Side::Right);
        assert_eq!(detector.score(), ScoreState { left: 0, right: 1 });

        let again = detector.evaluate(&boundary(), puck, 2.0, start + Duration::from_millis(1999));
        assert!(again.is_none());
        assert_eq!(detector.score(), ScoreState { left: 0, right: 1 });
    }

    #[test]
    fn rearms_after_cooldown() {
        let mut detector = GoalDetector::default();
        let start = Instant::now();
        let puck = RealPos::new(43.0, 13.0);

        detector.evaluate(&boundary(), puck, 2.0, start).unwrap();
        assert!(matches!(
            detector.phase(start + Duration::from_millis(500)),
            DetectorPhase::Cooldown { .. }
        ));
        assert_eq!(detector.phase(start + GOAL_COOLDOWN), DetectorPhase::Armed);

        let second = detector
            .evaluate(&boundary(), puck, 2.0, start + GOAL_COOLDOWN)
            .expect("detector should be armed again");
        assert_eq!(second.scorer, Side::Left);
        assert_eq!(second.score, ScoreState { left: 2, right: 0 });
    }

    #[test]
    fn no_goal_outside_the_aperture() {
        let mut detector = GoalDetector::default();
        let event = detector.evaluate(&boundary(), RealPos::new(2.0, 3.0), 2.0, Instant::now());
        assert!(event.is_none());
        assert_eq!(detector.phase(Instant::now()), DetectorPhase::Armed);
    }

    #[test]
    fn reset_clears_score_and_cooldown() {
        let mut detector = GoalDetector::default();
        let now = Instant::now();
        detector.evaluate(&boundary(), RealPos::new(0.0, 13.0), 2.0, now);

        detector.reset();
        assert_eq!(detector.score(), ScoreState::default());
        assert_eq!(detector.phase(now), DetectorPhase::Armed);
        assert!(
            detector
                .evaluate(&boundary(), RealPos::new(0.0, 13.0), 2.0, now)
                .is_some()
        );
    }
}
