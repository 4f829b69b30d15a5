use crate::geometry::{
    dimensions::{GoalZone, ObjectKind, RealDimensions, Side},
    mapper::clamp_axis,
    space::RealPos,
};

/// Keeps objects on the playing surface.
///
/// Paddles never leave the rectangle. The puck is clamped the same way unless
/// it is crossing a goal line inside the aperture, in which case it is left
/// where it is so goal detection can see it. Clamping must therefore happen
/// before, never instead of, goal evaluation.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryValidator {
    dims: RealDimensions,
    left: GoalZone,
    right: GoalZone,
}

impl BoundaryValidator {
    pub fn new(dims: RealDimensions) -> Self {
        Self {
            dims,
            left: dims.goal_zone(Side::Left),
            right: dims.goal_zone(Side::Right),
        }
    }

    /// Side whose goal mouth the puck is currently in, left checked first.
    pub fn goal_mouth(&self, puck: RealPos, radius: f64) -> Option<Side> {
        if puck.x - radius <= 0.0 && self.left.spans(puck.y) {
            return Some(Side::Left);
        }
        if puck.x + radius >= self.dims.table_length && self.right.spans(puck.y) {
            return Some(Side::Right);
        }
        None
    }

    /// Constrain `position` for an object of `kind` with the given radius.
    pub fn clamp(&self, kind: ObjectKind, position: RealPos, radius: f64) -> RealPos {
        if kind == ObjectKind::Puck && self.goal_mouth(position, radius).is_some() {
            return position;
        }

        RealPos::new(
            clamp_axis(position.x, radius, self.dims.table_length - radius),
            clamp_axis(position.y, radius, self.dims.table_width - radius),
        )
    }
}
