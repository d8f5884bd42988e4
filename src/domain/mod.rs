//! Values that cross the UI/worker boundary

pub mod command;
pub mod content;
pub mod elements;
pub mod input_event;
pub mod message;
pub mod outbound;
