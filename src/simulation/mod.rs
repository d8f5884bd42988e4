//! Controller - the worker-side owner of a simulation session
//!
//! Receives validated commands from the UI thread, drains stroke records from
//! the shared input ring once per tick, advances the engine and records undo
//! history. It never talks to the UI directly: replies are queued in an outbox
//! that the host drains and posts.
//!
//! The engine itself sits behind [`SimulationBackend`]. Per-concern logic lives
//! in the `#[path]` submodules below as free functions over the controller.

use thiserror::Error;
use tracing::debug;

use crate::config::{BridgeConfig, ConfigError};
use crate::core::shared::{HeapRegion, InputRing, RingError, RingLayout, SharedRegion};
use crate::domain::command::{BrushShape, CameraTransform, Command, RenderMode, Size};
use crate::domain::input_event::RawEvent;
use crate::domain::message::MessageValue;
use crate::domain::outbound::Outbound;
use crate::systems::history::SnapshotHistory;
use crate::systems::validation::{parse_command, CommandError};

pub mod backend;
#[path = "input/stroke.rs"]
pub mod stroke;
#[path = "input/tools.rs"]
mod tools;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "init/content.rs"]
mod content;
#[path = "commands/commands.rs"]
mod commands;
#[path = "commands/undo.rs"]
mod undo;
#[path = "step/tick.rs"]
mod tick;
#[path = "rigid/rigid.rs"]
mod rigid;
mod facade;

pub use backend::{BackendError, BackendFactory, SimulationBackend};
pub use facade::{create_input_buffer, Bridge, InputWriter, JsWorld, JsWorldFactory, TickStats};
pub use stroke::{Brush, StrokePoint, StrokeTracker};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Ring(#[from] RingError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("input ring layout {actual:?} does not match the configured {expected:?}")]
    LayoutMismatch {
        expected: RingLayout,
        actual: RingLayout,
    },
}

/// What a single tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Records drained from the input ring
    pub events: usize,
    /// Stroke points applied to the world
    pub strokes: usize,
    pub steps: u32,
    pub overflowed: bool,
}

/// Per-session state that survives backend re-creation
#[derive(Debug)]
pub(crate) struct Session {
    running: bool,
    speed: f32,
    step_accumulator: f32,
    render_mode: RenderMode,
    viewport: Option<Size>,
    transform: CameraTransform,
    brush_shape: BrushShape,
    /// Highest element id the decoder accepts
    max_element_id: i32,
    gravity: Option<(f32, f32)>,
    ambient_temperature: Option<f32>,
    /// Last accepted bundle, replayed onto a resized world
    content_bundle: Option<String>,
    stroke: StrokeTracker,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            running: false,
            speed: 1.0,
            step_accumulator: 0.0,
            render_mode: RenderMode::default(),
            viewport: None,
            transform: CameraTransform::default(),
            brush_shape: BrushShape::default(),
            max_element_id: 0,
            gravity: None,
            ambient_temperature: None,
            content_bundle: None,
            stroke: StrokeTracker::default(),
        }
    }
}

pub struct Controller<F: BackendFactory, R: SharedRegion = HeapRegion> {
    factory: F,
    backend: Option<F::Backend>,
    config: BridgeConfig,
    history: SnapshotHistory,
    session: Session,
    input: Option<InputRing<R>>,
    /// Reused between ticks
    drained: Vec<RawEvent>,
    outbox: Vec<Outbound>,
}

impl<F: BackendFactory, R: SharedRegion> Controller<F, R> {
    pub fn new(factory: F, config: BridgeConfig) -> Result<Self, BridgeError> {
        config.validate()?;
        Ok(init::create_controller(factory, config))
    }

    /// Parse a raw control message and apply it.
    ///
    /// Malformed messages are rejected before anything is touched.
    pub fn handle_message(&mut self, raw: &MessageValue) -> Result<(), BridgeError> {
        let command = parse_command(raw).map_err(|err| {
            debug!(%err, "rejected control message");
            err
        })?;
        self.apply(command)
    }

    pub fn apply(&mut self, command: Command) -> Result<(), BridgeError> {
        commands::apply(self, command)
    }

    pub fn tick(&mut self) -> TickReport {
        tick::tick(self)
    }

    /// Attach the consumer end of an input ring. The ring must use the
    /// configured layout so both sides agree on record positions.
    pub fn attach_input(&mut self, ring: InputRing<R>) -> Result<(), BridgeError> {
        let expected = self.config.ring_layout();
        if ring.layout() != expected {
            return Err(BridgeError::LayoutMismatch {
                expected,
                actual: ring.layout(),
            });
        }
        self.session.stroke.reset();
        self.input = Some(ring);
        Ok(())
    }

    pub fn detach_input(&mut self) -> Option<InputRing<R>> {
        self.session.stroke.reset();
        self.input.take()
    }

    pub fn take_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    /// Drains the outbox as a JSON array. On failure the replies stay queued.
    pub fn take_outbox_json(&mut self) -> Result<String, serde_json::Error> {
        let json = Outbound::batch_to_json(&self.outbox)?;
        self.outbox.clear();
        Ok(json)
    }

    pub fn teardown(&mut self) {
        init::teardown(self);
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn backend(&self) -> Option<&F::Backend> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut F::Backend> {
        self.backend.as_mut()
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    pub fn speed(&self) -> f32 {
        self.session.speed
    }

    pub fn render_mode(&self) -> RenderMode {
        self.session.render_mode
    }

    pub fn viewport(&self) -> Option<Size> {
        self.session.viewport
    }

    pub fn transform(&self) -> CameraTransform {
        self.session.transform
    }

    pub fn brush_shape(&self) -> BrushShape {
        self.session.brush_shape
    }

    pub fn max_element_id(&self) -> i32 {
        self.session.max_element_id
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    fn post(&mut self, message: Outbound) {
        self.outbox.push(message);
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
