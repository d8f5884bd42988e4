//! Memory shared between the UI thread and the simulation worker

pub mod region;
pub mod ring_buffer;

pub use region::{HeapRegion, JsRegion, SharedRegion};
pub use ring_buffer::{InputRing, RingError, RingLayout};
