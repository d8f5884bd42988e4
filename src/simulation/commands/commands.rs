use tracing::debug;

use crate::core::shared::SharedRegion;
use crate::domain::command::Command;

use super::backend::{BackendFactory, SimulationBackend};
use super::{content, init, rigid, settings, tools, undo, BridgeError, Controller};

/// Apply one validated command.
///
/// Anything that needs a world is a no-op until `INIT` has created one;
/// session-level settings are still recorded so the first world picks them up.
pub(super) fn apply<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    command: Command,
) -> Result<(), BridgeError> {
    debug!(command = command.type_name(), "apply");

    match command {
        Command::Init(size) => init::start_world(ctl, size)?,
        Command::Resize(size) => init::resize_world(ctl, size)?,
        Command::SetViewport(size) => settings::set_viewport(ctl, size),
        Command::Transform(transform) => settings::set_transform(ctl, transform),
        Command::Settings(update) => settings::apply_settings(ctl, update),
        Command::SetRenderMode(mode) => settings::set_render_mode(ctl, mode),
        Command::Play => settings::set_running(ctl, true),
        Command::Pause => settings::set_running(ctl, false),
        Command::Step => step_once(ctl),
        Command::Input(input) => tools::handle_input(ctl, input),
        Command::InputEnd => tools::end_stroke(ctl),
        Command::Fill(fill) => tools::fill(ctl, fill),
        Command::Pipette { x, y } => tools::pipette(ctl, x, y),
        Command::Clear => clear(ctl),
        Command::LoadContentBundle { json } => content::load_content_bundle(ctl, json)?,
        Command::Snapshot { id } => undo::snapshot(ctl, id),
        Command::LoadSnapshot { buffer } => undo::load_snapshot(ctl, &buffer)?,
        Command::SpawnRigidBody(cmd) => {
            rigid::spawn_rigid_body(ctl, cmd);
        }
        Command::Undo => undo::undo(ctl)?,
        Command::Redo => undo::redo(ctl)?,
        Command::CaptureHistory => undo::capture(ctl),
        Command::SaveState => undo::save_state(ctl),
        Command::RestoreState => undo::restore_state(ctl)?,
    }
    Ok(())
}

fn step_once<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) {
    if let Some(backend) = ctl.backend.as_mut() {
        backend.step();
    }
}

/// Clearing is an edit like any other: it lands in history and can be undone.
fn clear<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) {
    let Some(backend) = ctl.backend.as_mut() else {
        return;
    };
    backend.clear();
    ctl.session.stroke.reset();
    undo::capture(ctl);
}
