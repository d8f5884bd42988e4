use tracing::{info, warn};

use crate::core::shared::SharedRegion;
use crate::domain::content::ContentSummary;
use crate::domain::elements::max_element_id_for_count;
use crate::domain::outbound::Outbound;

use super::backend::{BackendError, BackendFactory, SimulationBackend};
use super::{undo, BridgeError, Controller};

/// Swap the element table.
///
/// The bundle is checked before the engine sees it, so a bad bundle leaves
/// the running world and its history untouched. On success the decoder picks
/// up the new id range and history restarts, since old snapshots reference
/// ids from the previous table.
pub(super) fn load_content_bundle<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    json: String,
) -> Result<(), BridgeError> {
    let summary = match ContentSummary::from_bundle_json(&json) {
        Ok(summary) => summary,
        Err(reason) => return Err(reject(ctl, BackendError::Content(reason))),
    };

    let Some(backend) = ctl.backend.as_mut() else {
        // No world yet: keep it for the next INIT.
        info!(elements = summary.element_count, "content bundle queued until a world exists");
        ctl.session.content_bundle = Some(json);
        return Ok(());
    };

    if let Err(err) = backend.load_content_bundle(&json) {
        return Err(reject(ctl, err));
    }

    let element_count = backend.element_count();
    ctl.session.max_element_id = max_element_id_for_count(element_count);
    ctl.session.content_bundle = Some(json);
    ctl.session.stroke.reset();

    ctl.history.clear();
    undo::capture(ctl);

    info!(
        elements = element_count,
        reactions = summary.reaction_count,
        max_element_id = ctl.session.max_element_id,
        "content bundle loaded"
    );
    ctl.post(Outbound::ContentLoaded { element_count });
    Ok(())
}

fn reject<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, err: BackendError) -> BridgeError {
    warn!(%err, "content bundle rejected");
    ctl.post(Outbound::Error { message: err.to_string() });
    err.into()
}
