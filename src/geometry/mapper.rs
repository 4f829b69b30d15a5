use tracing::warn;

use crate::{
    error::EngineError,
    geometry::{
        dimensions::{RealDimensions, SensorDomain, Viewport},
        space::{DisplayPos, RealPos, SensorPos},
    },
};

/// Converts positions between the sensor, real-world and display spaces.
///
/// The mapper is pure apart from the diagnostic it logs when sensor data falls
/// outside the calibration domain. Display conversions take the viewport as an
/// argument on every call; nothing about the viewport is cached.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    dims: RealDimensions,
    sensor: SensorDomain,
}

impl CoordinateMapper {
    pub fn new(dims: RealDimensions, sensor: SensorDomain) -> Self {
        Self { dims, sensor }
    }

    pub fn dimensions(&self) -> &RealDimensions {
        &self.dims
    }

    /// Rescale a sensor reading onto the table.
    ///
    /// Non-finite input is rejected with [`EngineError::InvalidInput`]; the
    /// caller must keep the previous position. Readings outside the sensor
    /// domain are clamped onto the table and logged, never rejected.
    pub fn sensor_to_real(&self, sensor: SensorPos) -> Result<RealPos, EngineError> {
        if !sensor.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "sensor coordinates must be finite numbers (got {}, {})",
                sensor.x, sensor.y
            )));
        }

        if let Err(err) = self.sensor.check(sensor) {
            warn!(error = %err, "clamping out-of-domain sensor reading");
        }

        let x = sensor.x / self.sensor.width * self.dims.table_length;
        let y = sensor.y / self.sensor.height * self.dims.table_width;

        Ok(RealPos::new(
            clamp_axis(x, 0.0, self.dims.table_length),
            clamp_axis(y, 0.0, self.dims.table_width),
        ))
    }

    pub fn real_to_display(&self, real: RealPos, viewport: Viewport) -> DisplayPos {
        let (scale_x, scale_y) = self.scale(viewport);
        DisplayPos::new(real.x * scale_x, real.y * scale_y)
    }

    /// Exact inverse of [`CoordinateMapper::real_to_display`].
    pub fn display_to_real(&self, display: DisplayPos, viewport: Viewport) -> RealPos {
        let (scale_x, scale_y) = self.scale(viewport);
        RealPos::new(display.x / scale_x, display.y / scale_y)
    }

    /// Pixels per centimeter along each axis.
    pub fn scale(&self, viewport: Viewport) -> (f64, f64) {
        (
            viewport.width() / self.dims.table_length,
            viewport.height() / self.dims.table_width,
        )
    }
}

/// Clamp without panicking on inverted bounds.
pub(crate) fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
