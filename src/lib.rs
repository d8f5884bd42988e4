//! Particula Bridge - control plane between the UI thread and the simulation worker
//!
//! Architecture:
//! - core/        - Shared-memory plumbing (regions, SPSC input ring)
//! - domain/      - Wire values: stroke records, commands, outbound messages
//! - systems/     - Command validation and undo/redo history
//! - simulation/  - Controller that composes them around an engine backend
//! - config       - Bridge configuration

pub mod config;
pub mod core;
pub mod domain;
pub mod simulation;
pub mod systems;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the bridge
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"🦀 Particula bridge initialized!".into());
}

/// Get bridge version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use config::{BridgeConfig, ConfigError};
pub use crate::core::shared::{HeapRegion, InputRing, JsRegion, RingError, RingLayout, SharedRegion};
pub use domain::command::Command;
pub use domain::input_event::{DecodedEvent, RawEvent};
pub use domain::message::MessageValue;
pub use domain::outbound::Outbound;
pub use simulation::{
    create_input_buffer, BackendError, BackendFactory, Bridge, BridgeError, Controller, InputWriter,
    SimulationBackend, TickReport,
};
pub use systems::{parse_command, CommandError, HistoryLimits, SnapshotHistory};

// Input record kinds for JS producers
#[wasm_bindgen]
pub fn input_end_stroke() -> i32 { domain::input_event::INPUT_END_STROKE }
#[wasm_bindgen]
pub fn input_erase() -> i32 { domain::input_event::INPUT_ERASE }
#[wasm_bindgen]
pub fn input_brush_offset() -> i32 { domain::input_event::INPUT_BRUSH_OFFSET }
