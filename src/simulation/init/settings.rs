use tracing::debug;

use crate::core::shared::SharedRegion;
use crate::domain::command::{CameraTransform, RenderMode, SettingsUpdate, Size};

use super::backend::{BackendFactory, SimulationBackend};
use super::Controller;

/// Gravity and temperature go straight to the engine and are remembered for
/// the next world; speed only affects how many steps a tick runs.
pub(super) fn apply_settings<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    update: SettingsUpdate,
) {
    if let Some((gx, gy)) = update.gravity {
        ctl.session.gravity = Some((gx, gy));
        if let Some(backend) = ctl.backend.as_mut() {
            backend.set_gravity(gx, gy);
        }
    }
    if let Some(temp) = update.ambient_temperature {
        ctl.session.ambient_temperature = Some(temp);
        if let Some(backend) = ctl.backend.as_mut() {
            backend.set_ambient_temperature(temp);
        }
    }
    if let Some(speed) = update.speed {
        set_speed(ctl, speed);
    }
}

pub(super) fn set_speed<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, speed: f32) {
    if ctl.session.speed != speed {
        debug!(speed, "simulation speed changed");
    }
    ctl.session.speed = speed;
    // A fractional carry from the old speed would skew the first ticks.
    ctl.session.step_accumulator = ctl.session.step_accumulator.fract();
}

pub(super) fn set_running<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, running: bool) {
    ctl.session.running = running;
    if !running {
        ctl.session.step_accumulator = 0.0;
    }
}

pub(super) fn set_viewport<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>, size: Size) {
    ctl.session.viewport = Some(size);
}

pub(super) fn set_transform<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    transform: CameraTransform,
) {
    ctl.session.transform = transform;
}

pub(super) fn set_render_mode<F: BackendFactory, R: SharedRegion>(
    ctl: &mut Controller<F, R>,
    mode: RenderMode,
) {
    ctl.session.render_mode = mode;
}
