use std::{fmt, marker::PhantomData};

use serde::Serialize;

/// Marker trait implemented by the three coordinate spaces.
pub trait Space: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Short name used in diagnostics.
    const NAME: &'static str;
}

/// Raw tracker units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sensor;

/// Centimeters on the physical table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Real;

/// Pixels inside the rendered viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Display;

impl Space for Sensor {
    const NAME: &'static str = "sensor";
}

impl Space for Real {
    const NAME: &'static str = "real";
}

impl Space for Display {
    const NAME: &'static str = "display";
}

/// A point tagged with the coordinate space it lives in.
///
/// Values from different spaces are distinct types, so passing a display
/// position where a real-world one is expected does not compile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position<S: Space> {
    /// Horizontal coordinate (along the table length).
    pub x: f64,
    /// Vertical coordinate (along the table width).
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

/// Position in sensor units.
pub type SensorPos = Position<Sensor>;
/// Position in centimeters on the table.
pub type RealPos = Position<Real>;
/// Position in viewport pixels.
pub type DisplayPos = Position<Display>;

impl<S: Space> Position<S> {
    /// Build a position in space `S`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point of the same space.
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl<S: Space> fmt::Display for Position<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:.2}, {:.2})", S::NAME, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = RealPos::new(0.0, 0.0);
        let b = RealPos::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn display_names_the_space() {
        assert_eq!(SensorPos::new(1.0, 2.5).to_string(), "sensor(1.00, 2.50)");
    }

    #[test]
    fn serializes_as_plain_point() {
        let json = serde_json::to_value(DisplayPos::new(10.0, 20.0)).unwrap();
        assert_eq!(json, serde_json::json!({"x": 10.0, "y": 20.0}));
    }
}
