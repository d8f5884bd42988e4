use std::collections::BTreeMap;

use crate::domain::message::MessageValue;

use super::{CommandError, FieldProblem};

/// Typed access to the fields of one inbound message.
///
/// `null` is treated the same as an absent field.
pub(super) struct Fields<'a> {
    message_type: &'static str,
    map: &'a BTreeMap<String, MessageValue>,
}

impl<'a> Fields<'a> {
    pub(super) fn new(message_type: &'static str, map: &'a BTreeMap<String, MessageValue>) -> Self {
        Self { message_type, map }
    }

    /// Fields of a nested object, reported under the same message type
    pub(super) fn nested<'b>(&self, map: &'b BTreeMap<String, MessageValue>) -> Fields<'b> {
        Fields {
            message_type: self.message_type,
            map,
        }
    }

    fn get(&self, key: &str) -> Option<&'a MessageValue> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, field: &'static str) -> CommandError {
        CommandError::MissingField {
            message_type: self.message_type,
            field,
        }
    }

    fn invalid(&self, field: &'static str, problem: FieldProblem) -> CommandError {
        CommandError::InvalidField {
            message_type: self.message_type,
            field,
            problem,
        }
    }

    fn expected(&self, field: &'static str, expected: &'static str, found: &MessageValue) -> CommandError {
        self.invalid(
            field,
            FieldProblem::Expected {
                expected,
                found: found.kind_name(),
            },
        )
    }

    fn finite(&self, value: &MessageValue, field: &'static str) -> Result<f64, CommandError> {
        let Some(n) = value.as_f64() else {
            return Err(self.expected(field, "number", value));
        };
        if !n.is_finite() {
            return Err(self.invalid(field, FieldProblem::NotFinite));
        }
        Ok(n)
    }

    pub(super) fn float(&self, field: &'static str, min: f32, max: f32) -> Result<f32, CommandError> {
        self.float_named(field, field, min, max)
    }

    /// `key` is looked up, `field` is what errors report (e.g. `gravity.x`)
    pub(super) fn float_named(
        &self,
        key: &str,
        field: &'static str,
        min: f32,
        max: f32,
    ) -> Result<f32, CommandError> {
        let value = self.get(key).ok_or_else(|| self.missing(field))?;
        let n = self.finite(value, field)?;
        Ok(n.clamp(f64::from(min), f64::from(max)) as f32)
    }

    pub(super) fn opt_float(
        &self,
        field: &'static str,
        min: f32,
        max: f32,
    ) -> Result<Option<f32>, CommandError> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.float(field, min, max).map(Some),
        }
    }

    pub(super) fn uint(&self, field: &'static str, min: u32, max: u32) -> Result<u32, CommandError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        let n = self.finite(value, field)?;
        Ok(n.floor().clamp(f64::from(min), f64::from(max)) as u32)
    }

    pub(super) fn string(&self, field: &'static str) -> Result<&'a str, CommandError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        value.as_str().ok_or_else(|| self.expected(field, "string", value))
    }

    pub(super) fn bytes(&self, field: &'static str) -> Result<&'a [u8], CommandError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        value.as_bytes().ok_or_else(|| self.expected(field, "byte buffer", value))
    }

    pub(super) fn keyword<T>(
        &self,
        field: &'static str,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, CommandError> {
        let s = self.string(field)?;
        parse(s).ok_or_else(|| self.invalid(field, FieldProblem::UnknownVariant(s.to_string())))
    }

    pub(super) fn opt_keyword<T>(
        &self,
        field: &'static str,
        parse: fn(&str) -> Option<T>,
    ) -> Result<Option<T>, CommandError> {
        match self.get(field) {
            None => Ok(None),
            Some(_) => self.keyword(field, parse).map(Some),
        }
    }

    pub(super) fn opt_object(
        &self,
        field: &'static str,
    ) -> Result<Option<&'a BTreeMap<String, MessageValue>>, CommandError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value
                .as_object()
                .map(Some)
                .ok_or_else(|| self.expected(field, "object", value)),
        }
    }
}
