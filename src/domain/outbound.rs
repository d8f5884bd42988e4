//! Worker -> UI messages

use js_sys::{Object, Reflect, Uint8Array};
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::domain::elements::ElementId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Outbound {
    Ready { width: u32, height: u32 },
    SnapshotResult { id: u32, buffer: Vec<u8> },
    PipetteResult { element_id: ElementId },
    HistoryState { can_undo: bool, can_redo: bool },
    ContentLoaded { element_count: usize },
    Error { message: String },
}

impl Outbound {
    /// JSON array of replies, for hosts that relay messages as text
    pub fn batch_to_json(messages: &[Outbound]) -> Result<String, serde_json::Error> {
        serde_json::to_string(messages)
    }

    /// Plain JS object for `postMessage`; byte buffers become `Uint8Array`
    pub fn to_js(&self) -> JsValue {
        let obj = Object::new();
        let set = |key: &str, value: JsValue| {
            let _ = Reflect::set(&obj, &JsValue::from_str(key), &value);
        };
        match self {
            Self::Ready { width, height } => {
                set("type", "READY".into());
                set("width", (*width).into());
                set("height", (*height).into());
            }
            Self::SnapshotResult { id, buffer } => {
                set("type", "SNAPSHOT_RESULT".into());
                set("id", (*id).into());
                set("buffer", Uint8Array::from(buffer.as_slice()).into());
            }
            Self::PipetteResult { element_id } => {
                set("type", "PIPETTE_RESULT".into());
                set("elementId", (*element_id).into());
            }
            Self::HistoryState { can_undo, can_redo } => {
                set("type", "HISTORY_STATE".into());
                set("canUndo", (*can_undo).into());
                set("canRedo", (*can_redo).into());
            }
            Self::ContentLoaded { element_count } => {
                set("type", "CONTENT_LOADED".into());
                set("elementCount", (*element_count as u32).into());
            }
            Self::Error { message } => {
                set("type", "ERROR".into());
                set("message", message.as_str().into());
            }
        }
        obj.into()
    }
}
