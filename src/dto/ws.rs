use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{dto::common::PointDto, geometry::TrackedObject};

/// Position message pushed by a sensor feed, in sensor units.
///
/// Every field is optional. Fields are kept as raw JSON so that a malformed
/// entry only invalidates itself instead of the whole message.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct PositionMessage {
    #[serde(default, alias = "paddleA", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PointDto>)]
    pub pusher1: Option<Value>,
    #[serde(default, alias = "paddleB", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PointDto>)]
    pub pusher2: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PointDto>)]
    pub puck: Option<Value>,
}

impl PositionMessage {
    /// Parse a text frame received from a sensor feed.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Build a message from numeric sensor points.
    ///
    /// Non-finite coordinates cannot be represented in JSON and turn into `null`,
    /// which ingestion rejects.
    pub fn from_points(
        pusher1: Option<PointDto>,
        pusher2: Option<PointDto>,
        puck: Option<PointDto>,
    ) -> Self {
        let encode = |point: PointDto| serde_json::json!({ "x": point.x, "y": point.y });
        Self {
            pusher1: pusher1.map(encode),
            pusher2: pusher2.map(encode),
            puck: puck.map(encode),
        }
    }

    /// Present fields paired with the object they describe.
    pub fn fields(&self) -> impl Iterator<Item = (TrackedObject, &Value)> {
        [
            (TrackedObject::PaddleA, self.pusher1.as_ref()),
            (TrackedObject::PaddleB, self.pusher2.as_ref()),
            (TrackedObject::Puck, self.puck.as_ref()),
        ]
        .into_iter()
        .filter_map(|(object, value)| value.map(|value| (object, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_messages() {
        let message = PositionMessage::from_json_str(r#"{"puck": {"x": 0, "y": 200}}"#).unwrap();
        let fields: Vec<_> = message.fields().map(|(object, _)| object).collect();
        assert_eq!(fields, vec![TrackedObject::Puck]);
    }

    #[test]
    fn accepts_paddle_aliases_and_null_fields() {
        let message = PositionMessage::from_json_str(
            r#"{"paddleA": {"x": 1, "y": 2}, "pusher2": null, "extra": true}"#,
        )
        .unwrap();
        assert!(message.pusher1.is_some());
        assert!(message.pusher2.is_none());
        assert!(message.puck.is_none());
    }

    #[test]
    fn keeps_malformed_fields_for_per_field_validation() {
        let message =
            PositionMessage::from_json_str(r#"{"pusher1": {"x": "left", "y": 3}}"#).unwrap();
        assert!(message.pusher1.is_some());
    }

    #[test]
    fn empty_object_has_no_fields() {
        assert!(PositionMessage::from_json_str("{}").unwrap().is_empty());
    }
}
