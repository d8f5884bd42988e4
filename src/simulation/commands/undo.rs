use tracing::{debug, warn};

use crate::core::shared::SharedRegion;
use crate::domain::outbound::Outbound;
use crate::systems::history::SnapshotHistory;

use super::backend::{BackendFactory, SimulationBackend};
use super::{BridgeError, Controller};

/// Snapshot the current world into history and tell the UI what is possible now
pub(super) fn capture<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) {
    let Some(backend) = ctl.backend.as_ref() else {
        return;
    };
    capture_parts(backend, &mut ctl.history, &mut ctl.outbox);
}

/// Same as [`capture`] for callers that already hold split borrows
pub(super) fn capture_parts<B: SimulationBackend>(
    backend: &B,
    history: &mut SnapshotHistory,
    outbox: &mut Vec<Outbound>,
) {
    history.capture_undo(backend.save_snapshot());
    outbox.push(history_state(history));
}

pub(super) fn history_state(history: &SnapshotHistory) -> Outbound {
    Outbound::HistoryState {
        can_undo: history.can_undo(),
        can_redo: history.can_redo(),
    }
}

pub(super) fn undo<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) -> Result<(), BridgeError> {
    if ctl.backend.is_none() {
        return Ok(());
    }
    match ctl.history.undo() {
        Some(buffer) => {
            if let Err(err) = restore(ctl, &buffer) {
                // The world did not change, so neither does the cursor.
                ctl.history.redo();
                return Err(err);
            }
        }
        None => debug!("nothing to undo"),
    }
    let state = history_state(&ctl.history);
    ctl.post(state);
    Ok(())
}

pub(super) fn redo<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) -> Result<(), BridgeError> {
    if ctl.backend.is_none() {
        return Ok(());
    }
    match ctl.history.redo() {
        Some(buffer) => {
            if let Err(err) = restore(ctl, &buffer) {
                // The world did not change, so neither does the cursor.
                ctl.history.undo();
                return Err(err);
            }
        }
        None => debug!("nothing to redo"),
    }
    let state = history_state(&ctl.history);
    ctl.post(state);
    Ok(())
}

pub(super) fn save_state<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) {
    let Some(backend) = ctl.backend.as_ref() else {
        return;
    };
    ctl.history.set_saved(backend.save_snapshot());
    debug!("world state saved");
}

/// Load the saved slot (if any). The restore itself becomes an undo step.
pub(super) fn restore_state<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
) -> Result<(), BridgeError> {
    if ctl.backend.is_none() {
        return Ok(());
    }
    let Some(buffer) = ctl.history.saved_copy() else {
        debug!("no saved state to restore");
        return Ok(());
    };
    restore(ctl, &buffer)?;
    capture(ctl);
    Ok(())
}

/// Load an external snapshot; like any other edit it can be undone
pub(super) fn load_snapshot<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    buffer: &[u8],
) -> Result<(), BridgeError> {
    if ctl.backend.is_none() {
        return Ok(());
    }
    restore(ctl, buffer)?;
    capture(ctl);
    Ok(())
}

pub(super) fn snapshot<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, id: u32) {
    let Some(backend) = ctl.backend.as_ref() else {
        return;
    };
    let buffer = backend.save_snapshot();
    ctl.post(Outbound::SnapshotResult { id, buffer });
}

fn restore<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, buffer: &[u8]) -> Result<(), BridgeError> {
    let Some(backend) = ctl.backend.as_mut() else {
        return Ok(());
    };
    // Any stroke in flight was drawn on the state being replaced.
    ctl.session.stroke.reset();
    if let Err(err) = backend.load_snapshot(buffer) {
        warn!(%err, bytes = buffer.len(), "snapshot load failed");
        ctl.post(Outbound::Error { message: err.to_string() });
        return Err(err.into());
    }
    Ok(())
}
