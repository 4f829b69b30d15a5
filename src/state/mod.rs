pub mod goal_detector;
pub mod hub;
pub mod render_loop;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::sse::SensorStatusEvent,
    engine::{BroadcastSurface, Visualization},
    error::EngineError,
    geometry::Viewport,
};

use self::{
    hub::{EventHub, VizEvent},
    render_loop::LoopControl,
};

pub type SharedState = Arc<AppState>;

const EVENT_CAPACITY: usize = 64;

/// Handle used to push messages to a connected sensor feed.
#[derive(Clone)]
pub struct SensorConnection {
    pub id: Uuid,
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state: the visualization engine and its connections.
pub struct AppState {
    config: Arc<AppConfig>,
    viz: Mutex<Visualization>,
    hub: EventHub,
    render_loop: LoopControl,
    sensors: DashMap<Uuid, SensorConnection>,
    viewport: watch::Sender<Viewport>,
}

impl AppState {
    /// Build the engine on a [`BroadcastSurface`] and wrap everything in an [`Arc`].
    ///
    /// Fails when the configured render targets lack a required element.
    pub fn new(config: AppConfig) -> Result<SharedState, EngineError> {
        let hub = EventHub::new(EVENT_CAPACITY);
        let (viewport, viewport_rx) = watch::channel(config.initial_viewport());
        let surface = BroadcastSurface::new(
            config.render_targets().to_vec(),
            viewport_rx,
            hub.clone(),
        );
        let viz = Visualization::init(config.engine_settings(), Box::new(surface), hub.clone())?;

        Ok(Arc::new(Self {
            config: Arc::new(config),
            viz: Mutex::new(viz),
            hub,
            render_loop: LoopControl::new(),
            sensors: DashMap::new(),
            viewport,
        }))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run `op` against the engine while holding its lock.
    pub async fn with_viz<T>(&self, op: impl FnOnce(&mut Visualization) -> T) -> T {
        let mut viz = self.viz.lock().await;
        op(&mut *viz)
    }

    /// Broadcast hub carrying engine events.
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    pub fn render_loop(&self) -> &LoopControl {
        &self.render_loop
    }

    /// Change the viewport seen by the surface from the next conversion on.
    pub fn resize_viewport(&self, viewport: Viewport) {
        self.viewport.send_replace(viewport);
        info!(
            width = viewport.width(),
            height = viewport.height(),
            "viewport resized"
        );
    }

    /// Stop the render loop and ask every sensor feed to close.
    ///
    /// Returns `false` when the visualization was already destroyed.
    pub fn destroy(&self) -> bool {
        if !self.render_loop.stop() {
            return false;
        }
        for connection in self.sensors.iter() {
            let _ = connection.tx.send(Message::Close(None));
        }
        self.sensors.clear();
        info!("visualization destroyed");
        true
    }

    /// Registry of connected sensor feeds keyed by connection id.
    pub fn sensors(&self) -> &DashMap<Uuid, SensorConnection> {
        &self.sensors
    }

    pub fn register_sensor(&self, connection: SensorConnection) {
        self.sensors.insert(connection.id, connection);
        self.publish_sensor_status();
    }

    pub fn unregister_sensor(&self, id: &Uuid) {
        if self.sensors.remove(id).is_some() {
            self.publish_sensor_status();
        }
    }

    fn publish_sensor_status(&self) {
        self.hub.publish(VizEvent::SensorStatus(SensorStatusEvent {
            connected: self.sensors.len(),
        }));
    }
}
