use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::core::shared::SharedRegion;
use crate::domain::command::Size;
use crate::domain::elements::max_element_id_for_count;
use crate::domain::outbound::Outbound;
use crate::systems::history::SnapshotHistory;

use super::backend::{BackendFactory, SimulationBackend};
use super::{undo, BridgeError, Controller, Session};

pub(super) fn create_controller<F: BackendFactory, R: SharedRegion>(
    factory: F,
    config: BridgeConfig,
) -> Controller<F, R> {
    Controller {
        factory,
        backend: None,
        history: SnapshotHistory::new(config.history_limits()),
        session: Session::default(),
        input: None,
        drained: Vec::with_capacity(config.input_capacity),
        outbox: Vec::new(),
        config,
    }
}

/// Build a fresh world of `size`, replacing any existing one.
///
/// Session settings (gravity, temperature, the loaded content bundle) are
/// replayed onto the new world; history restarts from a single baseline.
pub(super) fn start_world<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    size: Size,
) -> Result<(), BridgeError> {
    let mut backend = ctl.factory.create(size.width, size.height).map_err(|err| {
        warn!(%err, "world creation failed");
        ctl.post(Outbound::Error { message: err.to_string() });
        err
    })?;

    if let Some((gx, gy)) = ctl.session.gravity {
        backend.set_gravity(gx, gy);
    }
    if let Some(temp) = ctl.session.ambient_temperature {
        backend.set_ambient_temperature(temp);
    }
    // Already accepted once; a failure here means the engine changed its mind.
    let replay = ctl.session.content_bundle.as_deref().map(|json| backend.load_content_bundle(json));
    if let Some(Err(err)) = replay {
        warn!(%err, "replaying content bundle onto new world failed");
        ctl.session.content_bundle = None;
    }

    ctl.session.max_element_id = max_element_id_for_count(backend.element_count());
    ctl.session.stroke.reset();
    ctl.session.step_accumulator = 0.0;
    ctl.backend = Some(backend);

    ctl.history.clear();
    undo::capture(ctl);

    info!(
        width = size.width,
        height = size.height,
        max_element_id = ctl.session.max_element_id,
        "world ready"
    );
    ctl.post(Outbound::Ready { width: size.width, height: size.height });
    Ok(())
}

pub(super) fn resize_world<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    size: Size,
) -> Result<(), BridgeError> {
    if let Some(backend) = ctl.backend.as_ref() {
        if backend.width() == size.width && backend.height() == size.height {
            debug!(width = size.width, height = size.height, "resize to current size ignored");
            return Ok(());
        }
    }
    start_world(ctl, size)
}

pub(super) fn teardown<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) {
    if ctl.backend.take().is_some() {
        debug!("world dropped");
    }
    ctl.history.clear();
    ctl.session = Session::default();
    // Strokes queued for the old world are meaningless now. The producer may
    // still be running, so discard through the consumer side only.
    if let Some(ring) = ctl.input.as_ref() {
        let discarded = ring.drain_into(&mut ctl.drained);
        ring.clear_overflow();
        if discarded > 0 {
            debug!(discarded, "dropped pending input on teardown");
        }
    }
    ctl.drained.clear();
}
