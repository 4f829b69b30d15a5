use serde::Serialize;
use tokio::sync::watch;
use utoipa::ToSchema;

/// Lifecycle of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    /// Ticks are scheduled at frame rate.
    Running,
    /// The loop has been destroyed; no tick will be scheduled again.
    Stopped,
}

/// Running/stopped switch shared by the render task and whoever owns the engine.
///
/// The render task checks the phase before scheduling each tick, so an
/// in-flight tick completes but never reschedules itself after [`LoopControl::stop`].
pub struct LoopControl {
    phase: watch::Sender<LoopPhase>,
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopControl {
    pub fn new() -> Self {
        let (phase, _rx) = watch::channel(LoopPhase::Running);
        Self { phase }
    }

    pub fn phase(&self) -> LoopPhase {
        *self.phase.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.phase() == LoopPhase::Running
    }

    /// Move to [`LoopPhase::Stopped`]. Returns `false` when already stopped.
    pub fn stop(&self) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase == LoopPhase::Stopped {
                return false;
            }
            *phase = LoopPhase::Stopped;
            true
        })
    }

    /// Subscribe to phase changes.
    pub fn watcher(&self) -> watch::Receiver<LoopPhase> {
        self.phase.subscribe()
    }
}
