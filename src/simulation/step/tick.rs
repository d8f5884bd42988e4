use tracing::trace;

use crate::core::shared::SharedRegion;
use crate::domain::elements::ElementId;
use crate::domain::input_event::{reset_on_decoded, reset_on_overflow, DecodedEvent};

use super::backend::{BackendFactory, SimulationBackend};
use super::stroke::{Brush, StrokePoint};
use super::{undo, Controller, TickReport};

/// One frame on the worker: apply queued strokes, then advance the world.
pub(super) fn tick<F: BackendFactory, R: SharedRegion>(ctl: &mut Controller<F, R>) -> TickReport {
    let mut report = TickReport::default();

    let Controller {
        backend,
        session,
        history,
        input,
        drained,
        outbox,
        config,
        ..
    } = ctl;
    let Some(backend) = backend.as_mut() else {
        return report;
    };

    if let Some(ring) = input.as_ref() {
        drained.clear();
        report.events = ring.drain_into(drained);

        for raw in drained.iter() {
            let event = raw.decode(session.max_element_id);
            match event {
                DecodedEvent::Stroke { x, y, radius, is_erase, element_type } => {
                    let brush = if is_erase {
                        Brush::Erase
                    } else {
                        Brush::Paint(element_type as ElementId)
                    };
                    session
                        .stroke
                        .apply(backend, StrokePoint { x, y, radius, brush }, session.brush_shape);
                    report.strokes += 1;
                }
                DecodedEvent::EndStroke => {
                    session.stroke.finish(backend);
                    if session.stroke.take_dirty() {
                        undo::capture_parts(backend, history, outbox);
                    }
                }
                DecodedEvent::Reset => session.stroke.reset(),
                DecodedEvent::Ignore => {}
            }
            debug_assert!(!reset_on_decoded(&event) || !session.stroke.is_active());
        }
        drained.clear();

        // Drops only happen on a full ring, so a gap flagged here comes after
        // the records drained above.
        report.overflowed = ring.check_and_clear_overflow();
        if reset_on_overflow(report.overflowed) {
            session.stroke.reset();
        }
    }

    if session.running {
        session.step_accumulator += session.speed;
        let due = session.step_accumulator.floor();
        let steps = (due as u32).min(config.max_steps_per_tick);
        // Steps beyond the cap are dropped rather than carried, so a slow
        // host never builds up a backlog.
        session.step_accumulator -= due;
        for _ in 0..steps {
            backend.step();
        }
        report.steps = steps;
    }

    if report.events > 0 || report.steps > 0 {
        trace!(
            events = report.events,
            strokes = report.strokes,
            steps = report.steps,
            particles = backend.particle_count(),
            "tick"
        );
    }
    report
}
