use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use utoipa::ToSchema;

use crate::{
    dto::sse::FrameEvent,
    geometry::Viewport,
    state::hub::{EventHub, VizEvent},
};

/// Elements a rendering surface can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderTarget {
    Table,
    PaddleA,
    PaddleB,
    Puck,
    /// Optional readout for pointer coordinates.
    PositionIndicator,
}

impl RenderTarget {
    /// Targets without which the visualization cannot start.
    pub const REQUIRED: [RenderTarget; 4] = [
        RenderTarget::Table,
        RenderTarget::PaddleA,
        RenderTarget::PaddleB,
        RenderTarget::Puck,
    ];

    /// Every known target.
    pub const ALL: [RenderTarget; 5] = [
        RenderTarget::Table,
        RenderTarget::PaddleA,
        RenderTarget::PaddleB,
        RenderTarget::Puck,
        RenderTarget::PositionIndicator,
    ];
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderTarget::Table => "table",
            RenderTarget::PaddleA => "paddle_a",
            RenderTarget::PaddleB => "paddle_b",
            RenderTarget::Puck => "puck",
            RenderTarget::PositionIndicator => "position_indicator",
        };
        f.write_str(name)
    }
}

/// Where frames end up.
///
/// The viewport is queried on every conversion, so implementations must
/// return the current size rather than a value captured at construction.
pub trait RenderSurface: Send {
    /// Whether the surface can draw `target`.
    fn has_target(&self, target: RenderTarget) -> bool;

    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Draw one frame.
    fn present(&mut self, frame: &FrameEvent);
}

/// Surface that publishes frames on the event hub for SSE clients.
///
/// The viewport follows a watch channel updated by resize requests.
pub struct BroadcastSurface {
    targets: Vec<RenderTarget>,
    viewport: watch::Receiver<Viewport>,
    hub: EventHub,
}

impl BroadcastSurface {
    pub fn new(
        targets: Vec<RenderTarget>,
        viewport: watch::Receiver<Viewport>,
        hub: EventHub,
    ) -> Self {
        Self {
            targets,
            viewport,
            hub,
        }
    }
}

impl RenderSurface for BroadcastSurface {
    fn has_target(&self, target: RenderTarget) -> bool {
        self.targets.contains(&target)
    }

    fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    fn present(&mut self, frame: &FrameEvent) {
        self.hub.publish(VizEvent::Frame(Box::new(frame.clone())));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_surface_reads_viewport_live() {
        let hub = EventHub::new(4);
        let (tx, rx) = watch::channel(Viewport::default());
        let surface = BroadcastSurface::new(RenderTarget::ALL.to_vec(), rx, hub);

        assert_eq!(surface.viewport(), Viewport::default());
        tx.send(Viewport::new(1200.0, 600.0).unwrap()).unwrap();
        assert_eq!(surface.viewport().width(), 1200.0);
    }

    #[test]
    fn broadcast_surface_reports_configured_targets() {
        let (_tx, rx) = watch::channel(Viewport::default());
        let surface = BroadcastSurface::new(
            vec![RenderTarget::Table, RenderTarget::Puck],
            rx,
            EventHub::new(4),
        );
        assert!(surface.has_target(RenderTarget::Puck));
        assert!(!surface.has_target(RenderTarget::PaddleA));
    }
}
