use tokio::sync::broadcast;

use crate::dto::sse::{
    FrameEvent, GoalScoredEvent, PositionUpdateEvent, SensorStatusEvent, ServerEvent,
};

const EVENT_POSITION_UPDATE: &str = "position_update";
const EVENT_GOAL_SCORED: &str = "goal_scored";
const EVENT_FRAME: &str = "frame";
const EVENT_SENSOR_STATUS: &str = "sensor_status";

/// Typed events published by the visualization engine.
#[derive(Debug, Clone)]
pub enum VizEvent {
    /// Positions changed after an ingested message.
    PositionUpdate(PositionUpdateEvent),
    /// The goal detector confirmed a goal.
    GoalScored(GoalScoredEvent),
    /// A frame was presented by the render loop.
    Frame(Box<FrameEvent>),
    /// The number of connected sensor feeds changed.
    SensorStatus(SensorStatusEvent),
}

impl VizEvent {
    /// Wire name of the event, used as the SSE `event:` field.
    pub fn name(&self) -> &'static str {
        match self {
            VizEvent::PositionUpdate(_) => EVENT_POSITION_UPDATE,
            VizEvent::GoalScored(_) => EVENT_GOAL_SCORED,
            VizEvent::Frame(_) => EVENT_FRAME,
            VizEvent::SensorStatus(_) => EVENT_SENSOR_STATUS,
        }
    }

    /// Serialize into a named SSE payload.
    pub fn to_server_event(&self) -> serde_json::Result<ServerEvent> {
        let name = Some(self.name().to_string());
        match self {
            VizEvent::PositionUpdate(payload) => ServerEvent::json(name, payload),
            VizEvent::GoalScored(payload) => ServerEvent::json(name, payload),
            VizEvent::Frame(payload) => ServerEvent::json(name, payload.as_ref()),
            VizEvent::SensorStatus(payload) => ServerEvent::json(name, payload),
        }
    }
}

/// Broadcast hub fanning engine events out to every subscriber.
#[derive(Clone)]
pub struct EventHub {
    sender: broadcast::Sender<VizEvent>,
}

impl EventHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<VizEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn publish(&self, event: VizEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_published_events() {
        let hub = EventHub::new(4);
        let mut rx = hub.subscribe();
        hub.publish(VizEvent::SensorStatus(SensorStatusEvent { connected: 2 }));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.name(), "sensor_status");
        let server_event = event.to_server_event().unwrap();
        assert_eq!(server_event.event.as_deref(), Some("sensor_status"));
        assert_eq!(server_event.data, r#"{"connected":2}"#);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let hub = EventHub::new(4);
        hub.publish(VizEvent::SensorStatus(SensorStatusEvent { connected: 0 }));
    }
}
