//! JS-facing surface of the bridge
//!
//! The UI thread owns an [`InputWriter`] over a `SharedArrayBuffer`; the
//! worker owns a [`Bridge`], which drives the engine world created by a JS
//! factory function and hands replies back through `take_messages`.

use js_sys::{Array, Function, Int32Array, SharedArrayBuffer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::BridgeConfig;
use crate::core::shared::{InputRing, JsRegion, RingLayout};
use crate::domain::elements::ElementId;
use crate::domain::input_event::RawEvent;
use crate::domain::message::MessageValue;

use super::backend::{BackendError, BackendFactory, SimulationBackend};
use super::{Controller, TickReport};

#[wasm_bindgen]
extern "C" {
    /// World object returned by the host's factory function. It must expose
    /// the members bound below; `load_snapshot` and `load_content_bundle`
    /// may throw to report a rejected payload.
    pub type JsWorld;

    #[wasm_bindgen(method, getter)]
    fn width(this: &JsWorld) -> u32;
    #[wasm_bindgen(method, getter)]
    fn height(this: &JsWorld) -> u32;
    #[wasm_bindgen(method, getter)]
    fn particle_count(this: &JsWorld) -> u32;
    #[wasm_bindgen(method)]
    fn element_count(this: &JsWorld) -> u32;
    #[wasm_bindgen(method)]
    fn step(this: &JsWorld);
    #[wasm_bindgen(method)]
    fn add_particle(this: &JsWorld, x: u32, y: u32, element: u8) -> bool;
    #[wasm_bindgen(method)]
    fn remove_particle(this: &JsWorld, x: u32, y: u32) -> bool;
    #[wasm_bindgen(method)]
    fn add_particles_in_radius(this: &JsWorld, cx: i32, cy: i32, radius: i32, element: u8);
    #[wasm_bindgen(method)]
    fn remove_particles_in_radius(this: &JsWorld, cx: i32, cy: i32, radius: i32);
    #[wasm_bindgen(method)]
    fn flood_fill(this: &JsWorld, x: u32, y: u32, element: u8, limit: u32) -> u32;
    #[wasm_bindgen(method)]
    fn get_element_at(this: &JsWorld, x: u32, y: u32) -> Option<u8>;
    #[wasm_bindgen(method)]
    fn save_snapshot(this: &JsWorld) -> Vec<u8>;
    #[wasm_bindgen(method, catch)]
    fn load_snapshot(this: &JsWorld, bytes: &[u8]) -> Result<(), JsValue>;
    #[wasm_bindgen(method)]
    fn set_gravity(this: &JsWorld, x: f32, y: f32);
    #[wasm_bindgen(method)]
    fn set_ambient_temperature(this: &JsWorld, temp: f32);
    #[wasm_bindgen(method)]
    fn clear(this: &JsWorld);
    #[wasm_bindgen(method, catch)]
    fn load_content_bundle(this: &JsWorld, json: &str) -> Result<(), JsValue>;
    #[wasm_bindgen(method)]
    fn spawn_rigid_body(this: &JsWorld, x: f32, y: f32, w: i32, h: i32, element: u8) -> u32;
    #[wasm_bindgen(method)]
    fn spawn_rigid_circle(this: &JsWorld, x: f32, y: f32, radius: i32, element: u8) -> u32;
}

fn js_error_text(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", err))
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

impl SimulationBackend for JsWorld {
    fn width(&self) -> u32 {
        JsWorld::width(self)
    }

    fn height(&self) -> u32 {
        JsWorld::height(self)
    }

    fn element_count(&self) -> usize {
        JsWorld::element_count(self) as usize
    }

    fn particle_count(&self) -> u32 {
        JsWorld::particle_count(self)
    }

    fn step(&mut self) {
        JsWorld::step(self);
    }

    fn add_particle(&mut self, x: u32, y: u32, element: ElementId) -> bool {
        JsWorld::add_particle(self, x, y, element)
    }

    fn remove_particle(&mut self, x: u32, y: u32) -> bool {
        JsWorld::remove_particle(self, x, y)
    }

    fn add_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32, element: ElementId) {
        JsWorld::add_particles_in_radius(self, cx, cy, radius, element);
    }

    fn remove_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32) {
        JsWorld::remove_particles_in_radius(self, cx, cy, radius);
    }

    fn flood_fill(&mut self, x: u32, y: u32, element: ElementId, limit: u32) -> u32 {
        JsWorld::flood_fill(self, x, y, element, limit)
    }

    fn element_at(&self, x: u32, y: u32) -> Option<ElementId> {
        JsWorld::get_element_at(self, x, y)
    }

    fn save_snapshot(&self) -> Vec<u8> {
        JsWorld::save_snapshot(self)
    }

    fn load_snapshot(&mut self, bytes: &[u8]) -> Result<(), BackendError> {
        JsWorld::load_snapshot(self, bytes).map_err(|e| BackendError::Snapshot(js_error_text(&e)))
    }

    fn set_gravity(&mut self, x: f32, y: f32) {
        JsWorld::set_gravity(self, x, y);
    }

    fn set_ambient_temperature(&mut self, temp: f32) {
        JsWorld::set_ambient_temperature(self, temp);
    }

    fn clear(&mut self) {
        JsWorld::clear(self);
    }

    fn load_content_bundle(&mut self, json: &str) -> Result<(), BackendError> {
        JsWorld::load_content_bundle(self, json).map_err(|e| BackendError::Content(js_error_text(&e)))
    }

    fn spawn_rigid_body(&mut self, x: f32, y: f32, w: i32, h: i32, element: ElementId) -> u32 {
        JsWorld::spawn_rigid_body(self, x, y, w, h, element)
    }

    fn spawn_rigid_circle(&mut self, x: f32, y: f32, radius: i32, element: ElementId) -> u32 {
        JsWorld::spawn_rigid_circle(self, x, y, radius, element)
    }
}

/// `(width, height) => World` supplied by the worker script
pub struct JsWorldFactory {
    create: Function,
}

impl BackendFactory for JsWorldFactory {
    type Backend = JsWorld;

    fn create(&mut self, width: u32, height: u32) -> Result<JsWorld, BackendError> {
        let fail = |reason: String| BackendError::Create { width, height, reason };
        let world = self
            .create
            .call2(&JsValue::NULL, &width.into(), &height.into())
            .map_err(|e| fail(js_error_text(&e)))?;
        if world.is_null() || world.is_undefined() {
            return Err(fail("factory returned no world".to_string()));
        }
        Ok(world.unchecked_into())
    }
}

/// Allocate the shared cells for the input ring described by `config_json`
/// (defaults when `None`). Pass the same config to `InputWriter` and `Bridge`.
#[wasm_bindgen]
pub fn create_input_buffer(config_json: Option<String>) -> Result<Int32Array, JsValue> {
    let layout = ring_layout(config_json)?;
    layout.validate().map_err(to_js_error)?;
    let bytes = layout
        .required_cells()
        .checked_mul(std::mem::size_of::<i32>())
        .and_then(|bytes| u32::try_from(bytes).ok())
        .ok_or_else(|| JsValue::from_str(&format!("input ring of {} records is too large", layout.capacity)))?;
    let buffer = SharedArrayBuffer::new(bytes);
    Ok(Int32Array::new(&buffer))
}

fn ring_layout(config_json: Option<String>) -> Result<RingLayout, JsValue> {
    let config = match config_json {
        Some(json) => BridgeConfig::from_json(&json).map_err(to_js_error)?,
        None => BridgeConfig::default(),
    };
    Ok(config.ring_layout())
}

/// Producer end of the input ring (UI thread)
#[wasm_bindgen]
pub struct InputWriter {
    ring: InputRing<JsRegion>,
}

#[wasm_bindgen]
impl InputWriter {
    #[wasm_bindgen(constructor)]
    pub fn new(buffer: Int32Array, config_json: Option<String>) -> Result<InputWriter, JsValue> {
        let layout = ring_layout(config_json)?;
        let ring = InputRing::new(JsRegion::new(buffer), layout).map_err(to_js_error)?;
        Ok(Self { ring })
    }

    /// Returns `false` when the ring is full and the point was dropped
    pub fn push_stroke(&self, x: i32, y: i32, element: u8, radius: i32) -> bool {
        self.ring.push(RawEvent::stroke(x, y, element, radius))
    }

    pub fn push_erase(&self, x: i32, y: i32, radius: i32) -> bool {
        self.ring.push(RawEvent::erase(x, y, radius))
    }

    pub fn end_stroke(&self) -> bool {
        self.ring.push(RawEvent::end_stroke())
    }

    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> u32 {
        self.ring.pending_count() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn capacity(&self) -> u32 {
        self.ring.capacity() as u32
    }
}

#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct TickStats {
    pub events: u32,
    pub strokes: u32,
    pub steps: u32,
    pub overflowed: bool,
}

impl From<TickReport> for TickStats {
    fn from(report: TickReport) -> Self {
        Self {
            events: report.events as u32,
            strokes: report.strokes as u32,
            steps: report.steps,
            overflowed: report.overflowed,
        }
    }
}

/// Consumer end: owns the world, the history and the input ring (worker)
#[wasm_bindgen]
pub struct Bridge {
    controller: Controller<JsWorldFactory, JsRegion>,
}

#[wasm_bindgen]
impl Bridge {
    #[wasm_bindgen(constructor)]
    pub fn new(factory: Function, config_json: Option<String>) -> Result<Bridge, JsValue> {
        let config = match config_json {
            Some(json) => BridgeConfig::from_json(&json).map_err(to_js_error)?,
            None => BridgeConfig::default(),
        };
        let controller = Controller::new(JsWorldFactory { create: factory }, config).map_err(to_js_error)?;
        Ok(Self { controller })
    }

    pub fn attach_input_buffer(&mut self, buffer: Int32Array) -> Result<(), JsValue> {
        let layout = self.controller.config().ring_layout();
        let ring = InputRing::new(JsRegion::new(buffer), layout).map_err(to_js_error)?;
        self.controller.attach_input(ring).map_err(to_js_error)
    }

    pub fn detach_input_buffer(&mut self) {
        self.controller.detach_input();
    }

    /// Apply one control message. Rejected messages leave the session
    /// untouched and come back as the error.
    pub fn post_message(&mut self, message: JsValue) -> Result<(), JsValue> {
        let raw = MessageValue::from_js(&message);
        self.controller.handle_message(&raw).map_err(to_js_error)
    }

    pub fn tick(&mut self) -> TickStats {
        self.controller.tick().into()
    }

    /// Replies queued since the last call, as plain JS objects
    pub fn take_messages(&mut self) -> Array {
        self.controller.take_outbox().iter().map(|m| m.to_js()).collect()
    }

    /// Same replies as a JSON array string
    pub fn take_messages_json(&mut self) -> Result<String, JsValue> {
        self.controller.take_outbox_json().map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.controller.history().can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.controller.history().can_redo()
    }

    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn teardown(&mut self) {
        self.controller.teardown();
    }
}
