//! Control-channel parser
//!
//! `parse_command` is the only way to obtain a [`Command`] from an inbound
//! message. Parsing is all-or-nothing: either every field of the message is
//! present, typed and clamped into range, or an error names the first field
//! that is not.
//!
//! Numeric policy:
//! - a field that is not a number, or is NaN/infinite, is rejected;
//! - a finite number outside its range is clamped, never rejected;
//! - integer fields are floored before clamping.

mod fields;

use thiserror::Error;

use crate::domain::command::*;
use crate::domain::elements::MAX_ELEMENT_ID;
use crate::domain::message::MessageValue;

use fields::Fields;

/// What was wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Expected { expected: &'static str, found: &'static str },
    NotFinite,
    UnknownVariant(String),
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expected { expected, found } => write!(f, "expected {}, got {}", expected, found),
            Self::NotFinite => write!(f, "must be a finite number"),
            Self::UnknownVariant(v) => write!(f, "has unsupported value \"{}\"", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("message must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("message has no `type` field")]
    MissingType,
    #[error("message `type` must be a string, got {0}")]
    InvalidType(&'static str),
    #[error("unknown message type: {0}")]
    UnknownType(String),
    #[error("{message_type}: missing required field `{field}`")]
    MissingField {
        message_type: &'static str,
        field: &'static str,
    },
    #[error("{message_type}: field `{field}` {problem}")]
    InvalidField {
        message_type: &'static str,
        field: &'static str,
        problem: FieldProblem,
    },
}

impl CommandError {
    /// Offending field, when the error is about one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Discriminant of the message the error was raised for, when known
    pub fn message_type(&self) -> Option<&str> {
        match self {
            Self::MissingField { message_type, .. } | Self::InvalidField { message_type, .. } => {
                Some(*message_type)
            }
            Self::UnknownType(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

/// Parse an untyped inbound message into a typed command.
pub fn parse_command(raw: &MessageValue) -> Result<Command, CommandError> {
    let Some(map) = raw.as_object() else {
        return Err(CommandError::NotAnObject(raw.kind_name()));
    };
    let type_name = match map.get("type") {
        None | Some(MessageValue::Null) => return Err(CommandError::MissingType),
        Some(MessageValue::String(s)) => s.as_str(),
        Some(other) => return Err(CommandError::InvalidType(other.kind_name())),
    };

    match type_name {
        "INIT" => Ok(Command::Init(world_size(&Fields::new("INIT", map))?)),
        "RESIZE" => Ok(Command::Resize(world_size(&Fields::new("RESIZE", map))?)),
        "SET_VIEWPORT" => {
            let f = Fields::new("SET_VIEWPORT", map);
            Ok(Command::SetViewport(Size {
                width: f.uint("width", 1, MAX_VIEWPORT_SIZE)?,
                height: f.uint("height", 1, MAX_VIEWPORT_SIZE)?,
            }))
        }
        "TRANSFORM" => {
            let f = Fields::new("TRANSFORM", map);
            Ok(Command::Transform(CameraTransform {
                zoom: f.float("zoom", MIN_ZOOM, MAX_ZOOM)?,
                pan_x: f.float("panX", -MAX_PAN, MAX_PAN)?,
                pan_y: f.float("panY", -MAX_PAN, MAX_PAN)?,
            }))
        }
        "SETTINGS" => parse_settings(&Fields::new("SETTINGS", map)).map(Command::Settings),
        "INPUT" => parse_input(&Fields::new("INPUT", map)).map(Command::Input),
        "INPUT_END" => Ok(Command::InputEnd),
        "SET_RENDER_MODE" => {
            let f = Fields::new("SET_RENDER_MODE", map);
            Ok(Command::SetRenderMode(f.keyword("mode", RenderMode::parse)?))
        }
        "PLAY" => Ok(Command::Play),
        "PAUSE" => Ok(Command::Pause),
        "STEP" => Ok(Command::Step),
        "CLEAR" => Ok(Command::Clear),
        "LOAD_CONTENT_BUNDLE" => {
            let f = Fields::new("LOAD_CONTENT_BUNDLE", map);
            Ok(Command::LoadContentBundle {
                json: f.string("json")?.to_string(),
            })
        }
        "FILL" => {
            let f = Fields::new("FILL", map);
            Ok(Command::Fill(FillCommand {
                x: f.uint("x", 0, MAX_WORLD_SIZE)?,
                y: f.uint("y", 0, MAX_WORLD_SIZE)?,
                element_id: f.element_id("elementId")?,
            }))
        }
        "PIPETTE" => {
            let f = Fields::new("PIPETTE", map);
            Ok(Command::Pipette {
                x: f.uint("x", 0, MAX_WORLD_SIZE)?,
                y: f.uint("y", 0, MAX_WORLD_SIZE)?,
            })
        }
        "SNAPSHOT" => {
            let f = Fields::new("SNAPSHOT", map);
            Ok(Command::Snapshot {
                id: f.uint("id", 0, MAX_SNAPSHOT_ID)?,
            })
        }
        "LOAD_SNAPSHOT" => {
            let f = Fields::new("LOAD_SNAPSHOT", map);
            Ok(Command::LoadSnapshot {
                buffer: f.bytes("buffer")?.to_vec(),
            })
        }
        "SPAWN_RIGID_BODY" => {
            let f = Fields::new("SPAWN_RIGID_BODY", map);
            Ok(Command::SpawnRigidBody(RigidBodyCommand {
                x: f.float("x", 0.0, MAX_WORLD_SIZE as f32)?,
                y: f.float("y", 0.0, MAX_WORLD_SIZE as f32)?,
                size: f.uint("size", 1, MAX_RIGID_BODY_SIZE)?,
                shape: f.keyword("shape", RigidShape::parse)?,
                element_id: f.element_id("elementId")?,
            }))
        }
        "UNDO" => Ok(Command::Undo),
        "REDO" => Ok(Command::Redo),
        "CAPTURE_HISTORY" => Ok(Command::CaptureHistory),
        "SAVE_STATE" => Ok(Command::SaveState),
        "RESTORE_STATE" => Ok(Command::RestoreState),
        other => Err(CommandError::UnknownType(other.to_string())),
    }
}

fn world_size(f: &Fields<'_>) -> Result<Size, CommandError> {
    Ok(Size {
        width: f.uint("width", MIN_WORLD_SIZE, MAX_WORLD_SIZE)?,
        height: f.uint("height", MIN_WORLD_SIZE, MAX_WORLD_SIZE)?,
    })
}

fn parse_settings(f: &Fields<'_>) -> Result<SettingsUpdate, CommandError> {
    let gravity = match f.opt_object("gravity")? {
        None => None,
        Some(g) => {
            let g = f.nested(g);
            Some((
                g.float_named("x", "gravity.x", -MAX_GRAVITY, MAX_GRAVITY)?,
                g.float_named("y", "gravity.y", -MAX_GRAVITY, MAX_GRAVITY)?,
            ))
        }
    };
    Ok(SettingsUpdate {
        gravity,
        ambient_temperature: f.opt_float(
            "ambientTemperature",
            MIN_AMBIENT_TEMPERATURE,
            MAX_AMBIENT_TEMPERATURE,
        )?,
        speed: f.opt_float("speed", MIN_SPEED, MAX_SPEED)?,
    })
}

fn parse_input(f: &Fields<'_>) -> Result<InputCommand, CommandError> {
    Ok(InputCommand {
        x: f.float("x", -MAX_INPUT_COORD, MAX_INPUT_COORD)?,
        y: f.float("y", -MAX_INPUT_COORD, MAX_INPUT_COORD)?,
        radius: f.uint("radius", 0, crate::domain::input_event::MAX_BRUSH_RADIUS as u32)?,
        element_id: f.element_id("elementId")?,
        tool: f.keyword("tool", Tool::parse)?,
        brush_shape: f.opt_keyword("brushShape", BrushShape::parse)?.unwrap_or_default(),
    })
}

impl Fields<'_> {
    fn element_id(&self, field: &'static str) -> Result<u8, CommandError> {
        Ok(self.uint(field, 0, MAX_ELEMENT_ID as u32)? as u8)
    }
}

#[cfg(test)]
mod tests;
