//! Untyped inbound messages
//!
//! Commands arrive as structured-clone values from `postMessage` or as JSON.
//! Neither `serde_json::Value` nor `JsValue` fits both: JSON cannot carry NaN
//! or raw byte buffers, and `JsValue` does not exist off the browser. The
//! validator therefore works on this small tree, built from either source.

use std::collections::BTreeMap;

use js_sys::{Array, ArrayBuffer, Object, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MessageValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<MessageValue>),
    Object(BTreeMap<String, MessageValue>),
}

impl MessageValue {
    /// Build an object from `(key, value)` pairs
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MessageValue)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, MessageValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&MessageValue> {
        self.as_object()?.get(key)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in validation errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self::from(value))
    }

    /// Convert a structured-clone value received by a worker.
    ///
    /// `Uint8Array` and `ArrayBuffer` become [`MessageValue::Bytes`]; functions,
    /// symbols and other host objects collapse to `Null`.
    pub fn from_js(value: &JsValue) -> Self {
        if value.is_null() || value.is_undefined() {
            return Self::Null;
        }
        if let Some(b) = value.as_bool() {
            return Self::Bool(b);
        }
        if let Some(n) = value.as_f64() {
            return Self::Number(n);
        }
        if let Some(s) = value.as_string() {
            return Self::String(s);
        }
        if let Some(bytes) = value.dyn_ref::<Uint8Array>() {
            return Self::Bytes(bytes.to_vec());
        }
        if let Some(buffer) = value.dyn_ref::<ArrayBuffer>() {
            return Self::Bytes(Uint8Array::new(buffer).to_vec());
        }
        if Array::is_array(value) {
            let array: &Array = value.unchecked_ref();
            return Self::Array(array.iter().map(|v| Self::from_js(&v)).collect());
        }
        if value.is_object() && !value.is_function() {
            let object: &Object = value.unchecked_ref();
            let mut map = BTreeMap::new();
            for entry in Object::entries(object).iter() {
                let pair: Array = entry.unchecked_into();
                if let Some(key) = pair.get(0).as_string() {
                    map.insert(key, Self::from_js(&pair.get(1)));
                }
            }
            return Self::Object(map);
        }
        Self::Null
    }
}

impl From<serde_json::Value> for MessageValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<f64> for MessageValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for MessageValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for MessageValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for MessageValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<u8>> for MessageValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}
