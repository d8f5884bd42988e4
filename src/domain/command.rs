//! Typed control commands
//!
//! Everything here is already validated and clamped; see
//! `systems::validation` for the parser that produces these values.

use crate::domain::elements::ElementId;

/// Simulation grid limits
pub const MIN_WORLD_SIZE: u32 = 1;
pub const MAX_WORLD_SIZE: u32 = 4096;
pub const MAX_VIEWPORT_SIZE: u32 = 8192;

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 50.0;
pub const MAX_PAN: f32 = 1_000_000.0;

pub const MAX_GRAVITY: f32 = 50.0;
pub const MIN_AMBIENT_TEMPERATURE: f32 = -273.0;
pub const MAX_AMBIENT_TEMPERATURE: f32 = 5000.0;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 8.0;

pub const MAX_INPUT_COORD: f32 = 1_000_000.0;
pub const MAX_RIGID_BODY_SIZE: u32 = 127;
pub const MAX_SNAPSHOT_ID: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    Pipette,
    Fill,
    Move,
}

impl Tool {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brush" => Some(Self::Brush),
            "eraser" => Some(Self::Eraser),
            "pipette" => Some(Self::Pipette),
            "fill" => Some(Self::Fill),
            "move" => Some(Self::Move),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushShape {
    #[default]
    Circle,
    Square,
    /// Straight segment from stroke start to stroke end
    Line,
}

impl BrushShape {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "circle" => Some(Self::Circle),
            "square" => Some(Self::Square),
            "line" => Some(Self::Line),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Normal,
    Thermal,
}

impl RenderMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "thermal" => Some(Self::Thermal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidShape {
    Box,
    Circle,
}

impl RigidShape {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "box" => Some(Self::Box),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Camera state, owned by the renderer but relayed through the worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self { zoom: 1.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

/// Partial settings update; `None` leaves the current value alone
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SettingsUpdate {
    pub gravity: Option<(f32, f32)>,
    pub ambient_temperature: Option<f32>,
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputCommand {
    pub x: f32,
    pub y: f32,
    pub radius: u32,
    pub element_id: ElementId,
    pub tool: Tool,
    pub brush_shape: BrushShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillCommand {
    pub x: u32,
    pub y: u32,
    pub element_id: ElementId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyCommand {
    pub x: f32,
    pub y: f32,
    pub size: u32,
    pub shape: RigidShape,
    pub element_id: ElementId,
}

/// One message on the control channel
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Init(Size),
    Resize(Size),
    SetViewport(Size),
    Transform(CameraTransform),
    Settings(SettingsUpdate),
    Input(InputCommand),
    InputEnd,
    SetRenderMode(RenderMode),
    Play,
    Pause,
    Step,
    Clear,
    LoadContentBundle { json: String },
    Fill(FillCommand),
    Pipette { x: u32, y: u32 },
    Snapshot { id: u32 },
    LoadSnapshot { buffer: Vec<u8> },
    SpawnRigidBody(RigidBodyCommand),
    Undo,
    Redo,
    CaptureHistory,
    SaveState,
    RestoreState,
}

impl Command {
    /// Wire discriminant
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Init(_) => "INIT",
            Self::Resize(_) => "RESIZE",
            Self::SetViewport(_) => "SET_VIEWPORT",
            Self::Transform(_) => "TRANSFORM",
            Self::Settings(_) => "SETTINGS",
            Self::Input(_) => "INPUT",
            Self::InputEnd => "INPUT_END",
            Self::SetRenderMode(_) => "SET_RENDER_MODE",
            Self::Play => "PLAY",
            Self::Pause => "PAUSE",
            Self::Step => "STEP",
            Self::Clear => "CLEAR",
            Self::LoadContentBundle { .. } => "LOAD_CONTENT_BUNDLE",
            Self::Fill(_) => "FILL",
            Self::Pipette { .. } => "PIPETTE",
            Self::Snapshot { .. } => "SNAPSHOT",
            Self::LoadSnapshot { .. } => "LOAD_SNAPSHOT",
            Self::SpawnRigidBody(_) => "SPAWN_RIGID_BODY",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
            Self::CaptureHistory => "CAPTURE_HISTORY",
            Self::SaveState => "SAVE_STATE",
            Self::RestoreState => "RESTORE_STATE",
        }
    }
}
