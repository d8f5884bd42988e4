use tracing::{debug, warn};

use crate::core::shared::SharedRegion;
use crate::domain::command::{RigidBodyCommand, RigidShape};
use crate::domain::elements::is_paintable;

use super::backend::{BackendFactory, SimulationBackend};
use super::{undo, Controller};

/// Returns the engine's body id, 0 when nothing was spawned
pub(super) fn spawn_rigid_body<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    cmd: RigidBodyCommand,
) -> u32 {
    if cmd.size == 0 || !is_paintable(cmd.element_id, ctl.session.max_element_id) {
        warn!(size = cmd.size, element = cmd.element_id, "rigid body request ignored");
        return 0;
    }
    let Some(backend) = ctl.backend.as_mut() else {
        return 0;
    };

    let size = cmd.size as i32;
    let id = match cmd.shape {
        RigidShape::Box => backend.spawn_rigid_body(cmd.x, cmd.y, size, size, cmd.element_id),
        RigidShape::Circle => backend.spawn_rigid_circle(cmd.x, cmd.y, size, cmd.element_id),
    };
    debug!(id, shape = ?cmd.shape, "rigid body spawned");

    // 0 means the engine found no room for it
    if id != 0 {
        undo::capture(ctl);
    }
    id
}
