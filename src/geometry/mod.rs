//! Table geometry: coordinate spaces, table dimensions, the coordinate mapper
//! and the boundary validator.
//!
//! Three coordinate spaces coexist and are kept apart at the type level:
//!
//! - **sensor**: raw tracker units, a fixed calibration domain (800 x 400 by default);
//! - **real**: centimeters on the physical table, origin at a corner;
//! - **display**: pixels inside the rendered viewport.

pub mod boundary;
pub mod dimensions;
pub mod mapper;
pub mod space;

pub use self::boundary::BoundaryValidator;
pub use self::dimensions::{
    GoalZone, ObjectKind, RealDimensions, SensorDomain, Side, TrackedObject, Viewport,
};
pub use self::mapper::CoordinateMapper;
pub use self::space::{Display, DisplayPos, Position, Real, RealPos, Sensor, SensorPos, Space};
