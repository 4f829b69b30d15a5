use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    error::EngineError,
    geometry::space::SensorPos,
};

/// Physical table geometry, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_table_shape"))]
pub struct RealDimensions {
    /// Distance between the two goal lines.
    #[validate(range(exclusive_min = 0.0))]
    pub table_length: f64,
    /// Distance between the two side rails.
    #[validate(range(exclusive_min = 0.0))]
    pub table_width: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub puck_diameter: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub pusher_diameter: f64,
    /// Length of each goal aperture, measured along the table width.
    #[validate(range(exclusive_min = 0.0))]
    pub goal_length: f64,
}

impl Default for RealDimensions {
    fn default() -> Self {
        Self {
            table_length: 43.0,
            table_width: 26.0,
            puck_diameter: 4.0,
            pusher_diameter: 5.0,
            goal_length: 9.0,
        }
    }
}

impl RealDimensions {
    pub fn puck_radius(&self) -> f64 {
        self.puck_diameter / 2.0
    }

    pub fn pusher_radius(&self) -> f64 {
        self.pusher_diameter / 2.0
    }

    /// Radius used when constraining an object of the given kind.
    pub fn radius_of(&self, kind: ObjectKind) -> f64 {
        match kind {
            ObjectKind::Paddle => self.pusher_radius(),
            ObjectKind::Puck => self.puck_radius(),
        }
    }

    /// Goal zone for one side, centered on the table width.
    pub fn goal_zone(&self, side: Side) -> GoalZone {
        let x = match side {
            Side::Left => -self.puck_diameter,
            Side::Right => self.table_length,
        };
        GoalZone {
            x,
            y: (self.table_width - self.goal_length) / 2.0,
            width: self.puck_diameter,
            height: self.goal_length,
        }
    }
}

fn validate_table_shape(dims: &RealDimensions) -> Result<(), ValidationError> {
    if dims.table_length <= dims.table_width {
        let mut err = ValidationError::new("table_shape");
        err.message = Some("table length must exceed table width".into());
        return Err(err);
    }
    if dims.goal_length >= dims.table_width {
        let mut err = ValidationError::new("goal_length");
        err.message = Some("goal aperture must be narrower than the table".into());
        return Err(err);
    }
    if dims.puck_diameter >= dims.table_width || dims.pusher_diameter >= dims.table_width {
        let mut err = ValidationError::new("object_diameter");
        err.message = Some("puck and pusher must fit across the table width".into());
        return Err(err);
    }
    Ok(())
}

/// Calibration domain of the tracking source, in sensor units.
///
/// This is a fixed calibration constant of the tracker and is deliberately
/// not derived from [`RealDimensions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SensorDomain {
    #[validate(range(exclusive_min = 0.0))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
}

impl Default for SensorDomain {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

impl SensorDomain {
    /// Check that `pos` lies inside `[0, width] x [0, height]`.
    pub fn check(&self, pos: SensorPos) -> Result<(), EngineError> {
        let inside = (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y);
        if inside {
            Ok(())
        } else {
            Err(EngineError::OutOfDomain {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Size of the rendered viewport in pixels. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Build a viewport, rejecting empty or non-finite sizes.
    pub fn new(width: f64, height: f64) -> Result<Self, EngineError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(EngineError::InvalidInput(format!(
                "viewport must be positive and finite (got {width}x{height})"
            )))
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Scoring area behind one goal line, in real-world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GoalZone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GoalZone {
    /// Whether `y` falls within the aperture's vertical span, edges included.
    pub fn spans(&self, y: f64) -> bool {
        y >= self.y && y <= self.y + self.height
    }
}

/// One end of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Team letter used by the scoring backend (`A` plays left, `B` plays right).
    pub fn team_code(self) -> &'static str {
        match self {
            Side::Left => "A",
            Side::Right => "B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Shape class of a tracked object; drives which boundary rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Paddle,
    Puck,
}

/// The three objects on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrackedObject {
    PaddleA,
    PaddleB,
    Puck,
}

impl TrackedObject {
    /// All tracked objects, paddles first.
    pub const ALL: [TrackedObject; 3] = [
        TrackedObject::PaddleA,
        TrackedObject::PaddleB,
        TrackedObject::Puck,
    ];

    /// Objects that can be grabbed by pointer control.
    pub const PADDLES: [TrackedObject; 2] = [TrackedObject::PaddleA, TrackedObject::PaddleB];

    pub fn kind(self) -> ObjectKind {
        match self {
            TrackedObject::PaddleA | TrackedObject::PaddleB => ObjectKind::Paddle,
            TrackedObject::Puck => ObjectKind::Puck,
        }
    }

    /// Stable index into per-object arrays.
    pub fn index(self) -> usize {
        match self {
            TrackedObject::PaddleA => 0,
            TrackedObject::PaddleB => 1,
            TrackedObject::Puck => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackedObject::PaddleA => "paddle_a",
            TrackedObject::PaddleB => "paddle_b",
            TrackedObject::Puck => "puck",
        }
    }
}
