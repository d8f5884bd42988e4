use tracing::{debug, warn};

use crate::core::shared::SharedRegion;
use crate::domain::command::{FillCommand, InputCommand, Tool};
use crate::domain::elements::{is_paintable, ElementId, EL_EMPTY};
use crate::domain::outbound::Outbound;

use super::backend::{BackendFactory, SimulationBackend};
use super::stroke::{Brush, StrokePoint};
use super::{undo, Controller};

/// One pointer sample sent over the control channel (the slow path; the
/// input ring carries the same strokes without a message per point).
pub(super) fn handle_input<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, input: InputCommand) {
    ctl.session.brush_shape = input.brush_shape;
    let x = input.x.floor() as i32;
    let y = input.y.floor() as i32;

    match input.tool {
        Tool::Brush | Tool::Eraser => {
            let brush = if input.tool == Tool::Eraser {
                Brush::Erase
            } else if is_paintable(input.element_id, ctl.session.max_element_id) {
                Brush::Paint(input.element_id)
            } else {
                warn!(
                    element = input.element_id,
                    max = ctl.session.max_element_id,
                    "brush element outside the loaded table"
                );
                return;
            };
            let Some(backend) = ctl.backend.as_mut() else {
                return;
            };
            let point = StrokePoint { x, y, radius: input.radius as i32, brush };
            ctl.session.stroke.apply(backend, point, input.brush_shape);
        }
        Tool::Pipette => {
            if x >= 0 && y >= 0 {
                pipette(ctl, x as u32, y as u32);
            }
        }
        Tool::Fill => {
            if x >= 0 && y >= 0 {
                fill(
                    ctl,
                    FillCommand { x: x as u32, y: y as u32, element_id: input.element_id },
                );
            }
        }
        // Camera panning is the renderer's business.
        Tool::Move => {}
    }
}

/// Commit whatever the current stroke drew as one undo step
pub(super) fn end_stroke<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) {
    let Some(backend) = ctl.backend.as_mut() else {
        ctl.session.stroke.reset();
        return;
    };
    ctl.session.stroke.finish(backend);
    if ctl.session.stroke.take_dirty() {
        undo::capture(ctl);
    }
}

pub(super) fn fill<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, cmd: FillCommand) {
    if cmd.element_id != EL_EMPTY && !is_paintable(cmd.element_id, ctl.session.max_element_id) {
        warn!(element = cmd.element_id, "fill element outside the loaded table");
        return;
    }
    let limit = ctl.config.fill_limit;
    let Some(backend) = ctl.backend.as_mut() else {
        return;
    };
    let changed = backend.flood_fill(cmd.x, cmd.y, cmd.element_id, limit);
    debug!(x = cmd.x, y = cmd.y, element = cmd.element_id, changed, "flood fill");
    if changed > 0 {
        undo::capture(ctl);
    }
}

pub(super) fn pipette<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, x: u32, y: u32) {
    let Some(backend) = ctl.backend.as_ref() else {
        return;
    };
    let picked: Option<ElementId> = backend.element_at(x, y);
    match picked {
        Some(element_id) => ctl.post(Outbound::PipetteResult { element_id }),
        None => debug!(x, y, "pipette outside the world"),
    }
}
