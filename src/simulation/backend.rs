//! The engine as seen from the controller
//!
//! The particle engine is an external collaborator. The controller only ever
//! talks to it through [`SimulationBackend`] and creates it through
//! [`BackendFactory`], which keeps it swappable for a JS-side world object or a
//! test double.

use thiserror::Error;

use crate::domain::elements::ElementId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("failed to create world {width}x{height}: {reason}")]
    Create {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("snapshot rejected: {0}")]
    Snapshot(String),
    #[error("content bundle rejected: {0}")]
    Content(String),
}

pub trait SimulationBackend {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Number of entries in the active element table, `EL_EMPTY` included
    fn element_count(&self) -> usize;

    fn particle_count(&self) -> u32;

    fn step(&mut self);

    fn add_particle(&mut self, x: u32, y: u32, element: ElementId) -> bool;
    fn remove_particle(&mut self, x: u32, y: u32) -> bool;
    fn add_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32, element: ElementId);
    fn remove_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32);

    /// Replace the connected region under (x, y) with `element`, touching at
    /// most `limit` cells. Returns the number of cells changed.
    fn flood_fill(&mut self, x: u32, y: u32, element: ElementId, limit: u32) -> u32;

    /// Element under (x, y), `None` outside the world
    fn element_at(&self, x: u32, y: u32) -> Option<ElementId>;

    fn save_snapshot(&self) -> Vec<u8>;
    fn load_snapshot(&mut self, bytes: &[u8]) -> Result<(), BackendError>;

    fn set_gravity(&mut self, x: f32, y: f32);
    fn set_ambient_temperature(&mut self, temp: f32);

    fn clear(&mut self);

    fn load_content_bundle(&mut self, json: &str) -> Result<(), BackendError>;

    /// Returns the body id
    fn spawn_rigid_body(&mut self, x: f32, y: f32, w: i32, h: i32, element: ElementId) -> u32;
    fn spawn_rigid_circle(&mut self, x: f32, y: f32, radius: i32, element: ElementId) -> u32;
}

pub trait BackendFactory {
    type Backend: SimulationBackend;

    fn create(&mut self, width: u32, height: u32) -> Result<Self::Backend, BackendError>;
}

impl<B, F> BackendFactory for F
where
    B: SimulationBackend,
    F: FnMut(u32, u32) -> Result<B, BackendError>,
{
    type Backend = B;

    fn create(&mut self, width: u32, height: u32) -> Result<B, BackendError> {
        self(width, height)
    }
}
