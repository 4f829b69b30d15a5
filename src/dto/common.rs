use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geometry::{Position, Space};

/// Untagged point used on the wire; the coordinate space is implied by the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointDto {
    pub x: f64,
    pub y: f64,
}

impl<S: Space> From<Position<S>> for PointDto {
    fn from(position: Position<S>) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl PointDto {
    /// Reattach a coordinate space to a wire point.
    pub fn into_position<S: Space>(self) -> Position<S> {
        Position::new(self.x, self.y)
    }
}
