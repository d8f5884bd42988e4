//! Stroke interpolation
//!
//! Pointer events arrive at input rate, not at pixel spacing, so consecutive
//! points of one stroke are joined by stamping the brush along the segment in
//! between. The last point is the only cross-event state and is dropped on
//! stroke end, on a decoder reset and on ring overflow, so a gap in the stream
//! never turns into a spurious connecting line.

use crate::domain::command::BrushShape;
use crate::domain::elements::ElementId;

use super::backend::SimulationBackend;

/// Hard cap on stamps per segment; long jumps get coarser spacing instead
const MAX_SEGMENT_STAMPS: i64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    Paint(ElementId),
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokePoint {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub brush: Brush,
}

#[derive(Debug, Default)]
pub struct StrokeTracker {
    last: Option<(i32, i32)>,
    /// Line mode: where the stroke started and where it currently ends
    line_anchor: Option<(i32, i32)>,
    line_end: Option<StrokePoint>,
    dirty: bool,
}

impl StrokeTracker {
    pub fn is_active(&self) -> bool {
        self.last.is_some() || self.line_anchor.is_some()
    }

    pub fn apply<B: SimulationBackend>(&mut self, backend: &mut B, point: StrokePoint, shape: BrushShape) {
        if shape == BrushShape::Line {
            if self.line_anchor.is_none() {
                self.line_anchor = Some((point.x, point.y));
            }
            self.line_end = Some(point);
            return;
        }

        let to = (point.x, point.y);
        match self.last {
            None => stamp(backend, to, point, shape),
            Some(from) => stamp_segment(backend, from, to, point, shape),
        }
        self.last = Some(to);
        self.dirty = true;
    }

    /// End of stroke: commit a pending line, then forget the stroke
    pub fn finish<B: SimulationBackend>(&mut self, backend: &mut B) {
        if let (Some(anchor), Some(end)) = (self.line_anchor, self.line_end) {
            stamp(backend, anchor, end, BrushShape::Circle);
            stamp_segment(backend, anchor, (end.x, end.y), end, BrushShape::Circle);
            self.dirty = true;
        }
        self.reset();
    }

    /// Drop interpolation state without drawing anything
    pub fn reset(&mut self) {
        self.last = None;
        self.line_anchor = None;
        self.line_end = None;
    }

    /// Whether anything was drawn since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Stamp from `from` (exclusive) to `to` (inclusive)
fn stamp_segment<B: SimulationBackend>(
    backend: &mut B,
    from: (i32, i32),
    to: (i32, i32),
    point: StrokePoint,
    shape: BrushShape,
) {
    let dx = i64::from(to.0) - i64::from(from.0);
    let dy = i64::from(to.1) - i64::from(from.1);
    let dist = dx.abs().max(dy.abs());
    if dist == 0 {
        stamp(backend, to, point, shape);
        return;
    }

    let spacing = i64::from((point.radius / 2).max(1));
    let steps = ((dist + spacing - 1) / spacing).min(MAX_SEGMENT_STAMPS);
    for i in 1..=steps {
        let x = i64::from(from.0) + dx * i / steps;
        let y = i64::from(from.1) + dy * i / steps;
        stamp(backend, (x as i32, y as i32), point, shape);
    }
}

fn stamp<B: SimulationBackend>(backend: &mut B, at: (i32, i32), point: StrokePoint, shape: BrushShape) {
    let (cx, cy) = at;
    let r = point.radius;
    match shape {
        BrushShape::Circle | BrushShape::Line => match point.brush {
            Brush::Paint(element) => backend.add_particles_in_radius(cx, cy, r, element),
            Brush::Erase => backend.remove_particles_in_radius(cx, cy, r),
        },
        BrushShape::Square => {
            let (w, h) = (backend.width() as i64, backend.height() as i64);
            let x0 = (i64::from(cx) - i64::from(r)).max(0);
            let x1 = (i64::from(cx) + i64::from(r)).min(w - 1);
            let y0 = (i64::from(cy) - i64::from(r)).max(0);
            let y1 = (i64::from(cy) + i64::from(r)).min(h - 1);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    match point.brush {
                        Brush::Paint(element) => {
                            backend.add_particle(x as u32, y as u32, element);
                        }
                        Brush::Erase => {
                            backend.remove_particle(x as u32, y as u32);
                        }
                    }
                }
            }
        }
    }
}
