use std::time::Instant;

use serde_json::Value;
use tracing::{trace, warn};

use crate::{
    dto::ws::PositionMessage, engine::Visualization, error::EngineError, geometry::SensorPos,
};

/// Result of applying one position message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Fields written to the engine.
    pub applied: usize,
    /// Fields dropped because they failed validation.
    pub rejected: usize,
    /// The whole message was skipped because the visualization is paused.
    pub ignored: bool,
}

/// Check that a raw message field is an object with finite numeric `x` and `y`.
pub fn validate_position_data(value: &Value) -> Result<SensorPos, EngineError> {
    let Some(object) = value.as_object() else {
        return Err(EngineError::InvalidInput(
            "position must be an object with `x` and `y`".to_string(),
        ));
    };

    let coordinate = |axis: &str| {
        object
            .get(axis)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .ok_or_else(|| EngineError::InvalidInput(format!("`{axis}` must be a finite number")))
    };

    Ok(SensorPos::new(coordinate("x")?, coordinate("y")?))
}

impl Visualization {
    /// Apply a sensor message.
    ///
    /// Each present field is validated and converted on its own. A field that
    /// fails leaves its object at the last known position; absent fields are
    /// untouched. Nothing is applied while paused.
    pub fn ingest(&mut self, message: &PositionMessage, now: Instant) -> IngestOutcome {
        if self.paused {
            trace!("visualization paused; position message ignored");
            return IngestOutcome {
                ignored: true,
                ..IngestOutcome::default()
            };
        }

        self.motion.record_message(now);

        let mut outcome = IngestOutcome::default();
        for (object, raw) in message.fields() {
            let converted =
                validate_position_data(raw).and_then(|sensor| self.mapper.sensor_to_real(sensor));
            match converted {
                Ok(real) => {
                    self.write_position(object, real, now);
                    outcome.applied += 1;
                }
                Err(err) => {
                    warn!(
                        object = object.label(),
                        error = %err,
                        "rejected position field; keeping last known position"
                    );
                    outcome.rejected += 1;
                }
            }
        }

        if outcome.applied > 0 {
            self.publish_positions();
        }
        outcome
    }
}
