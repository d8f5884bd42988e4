//! Pointer event codec
//!
//! The input ring carries `{x, y, type, val}` records where `type` does double
//! duty: a handful of reserved sentinels, or `INPUT_BRUSH_OFFSET + element_id`
//! for a paint stroke. Records are turned into `DecodedEvent` as soon as they
//! leave the ring so nothing downstream ever looks at the raw discriminant.

/// Empty slot, never acted upon
pub const INPUT_NONE: i32 = 0;
/// Pointer released: drop interpolation state
pub const INPUT_END_STROKE: i32 = 1;
/// Erase stroke
pub const INPUT_ERASE: i32 = 2;
/// `type = INPUT_BRUSH_OFFSET + element_id` paints `element_id`
pub const INPUT_BRUSH_OFFSET: i32 = 16;

/// Largest brush radius the consumer will ever stamp
pub const MAX_BRUSH_RADIUS: i32 = 256;

/// One record as stored in the shared ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawEvent {
    pub x: i32,
    pub y: i32,
    pub kind: i32,
    pub val: i32,
}

impl RawEvent {
    pub const fn new(x: i32, y: i32, kind: i32, val: i32) -> Self {
        Self { x, y, kind, val }
    }

    /// Paint `element` at (x, y) with brush `radius`
    pub fn stroke(x: i32, y: i32, element: u8, radius: i32) -> Self {
        Self::new(x, y, INPUT_BRUSH_OFFSET + element as i32, radius)
    }

    pub fn erase(x: i32, y: i32, radius: i32) -> Self {
        Self::new(x, y, INPUT_ERASE, radius)
    }

    pub fn end_stroke() -> Self {
        Self::new(0, 0, INPUT_END_STROKE, 0)
    }

    #[inline]
    pub fn decode(&self, max_element_id: i32) -> DecodedEvent {
        decode(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.kind),
            f64::from(self.val),
            f64::from(max_element_id),
        )
    }
}

/// Typed stroke intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedEvent {
    EndStroke,
    Reset,
    Ignore,
    Stroke {
        x: i32,
        y: i32,
        radius: i32,
        is_erase: bool,
        element_type: i32,
    },
}

/// Decode one record.
///
/// Inputs are `f64` so the same rules apply to values that came from a JS
/// number and may be NaN or infinite. Records read from an `Int32Array` are
/// always finite and go through [`RawEvent::decode`].
pub fn decode(x: f64, y: f64, kind: f64, val: f64, max_element_id: f64) -> DecodedEvent {
    if !kind.is_finite() {
        return DecodedEvent::Reset;
    }
    if kind == f64::from(INPUT_NONE) {
        return DecodedEvent::Ignore;
    }
    if kind == f64::from(INPUT_END_STROKE) {
        return DecodedEvent::EndStroke;
    }
    if !x.is_finite() || !y.is_finite() || !max_element_id.is_finite() || max_element_id < 0.0 {
        return DecodedEvent::Reset;
    }

    let px = saturate_i32(x.floor());
    let py = saturate_i32(y.floor());
    let radius = if val.is_finite() {
        val.floor().clamp(0.0, f64::from(MAX_BRUSH_RADIUS)) as i32
    } else {
        0
    };

    if kind == f64::from(INPUT_ERASE) {
        return DecodedEvent::Stroke {
            x: px,
            y: py,
            radius,
            is_erase: true,
            element_type: 0,
        };
    }

    // Stale ids show up after a content reload shrinks the element table.
    let element_type = kind - f64::from(INPUT_BRUSH_OFFSET);
    if element_type <= 0.0 || element_type > max_element_id {
        return DecodedEvent::Ignore;
    }

    DecodedEvent::Stroke {
        x: px,
        y: py,
        radius,
        is_erase: false,
        element_type: saturate_i32(element_type.floor()),
    }
}

/// A dropped record means the next stroke point is not adjacent to the last one.
#[inline]
pub fn reset_on_overflow(overflowed: bool) -> bool {
    overflowed
}

#[inline]
pub fn reset_on_decoded(event: &DecodedEvent) -> bool {
    matches!(event, DecodedEvent::EndStroke | DecodedEvent::Reset)
}

#[inline]
fn saturate_i32(v: f64) -> i32 {
    v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAX: f64 = 40.0;

    #[test]
    fn sentinels_decode_to_control_events() {
        assert_eq!(decode(0.0, 0.0, 0.0, 0.0, MAX), DecodedEvent::Ignore);
        assert_eq!(decode(0.0, 0.0, 1.0, 0.0, MAX), DecodedEvent::EndStroke);
    }

    #[test]
    fn end_stroke_ignores_garbage_coordinates() {
        assert_eq!(
            decode(f64::NAN, f64::INFINITY, 1.0, 0.0, MAX),
            DecodedEvent::EndStroke
        );
    }

    #[test]
    fn erase_floors_and_clamps_radius() {
        assert_eq!(
            decode(10.7, -3.2, 2.0, 999.0, MAX),
            DecodedEvent::Stroke { x: 10, y: -4, radius: 256, is_erase: true, element_type: 0 }
        );
        assert_eq!(
            decode(1.0, 1.0, 2.0, -5.0, MAX),
            DecodedEvent::Stroke { x: 1, y: 1, radius: 0, is_erase: true, element_type: 0 }
        );
    }

    #[test]
    fn non_finite_radius_becomes_zero() {
        assert_eq!(
            decode(4.0, 4.0, 2.0, f64::NAN, MAX),
            DecodedEvent::Stroke { x: 4, y: 4, radius: 0, is_erase: true, element_type: 0 }
        );
    }

    #[test]
    fn brush_bounds() {
        let offset = f64::from(INPUT_BRUSH_OFFSET);
        assert_eq!(decode(0.0, 0.0, offset, 3.0, MAX), DecodedEvent::Ignore);
        assert_eq!(decode(0.0, 0.0, offset + MAX + 1.0, 3.0, MAX), DecodedEvent::Ignore);
        assert_eq!(
            decode(0.0, 0.0, offset + MAX, 3.0, MAX),
            DecodedEvent::Stroke { x: 0, y: 0, radius: 3, is_erase: false, element_type: 40 }
        );
    }

    #[test]
    fn values_between_sentinels_and_offset_are_ignored() {
        assert_eq!(decode(0.0, 0.0, 7.0, 1.0, MAX), DecodedEvent::Ignore);
    }

    #[test]
    fn negative_max_element_id_resets() {
        assert_eq!(decode(0.0, 0.0, 20.0, 1.0, -1.0), DecodedEvent::Reset);
        assert_eq!(decode(0.0, 0.0, 20.0, 1.0, f64::NAN), DecodedEvent::Reset);
    }

    #[test]
    fn raw_event_helpers_round_through_decode() {
        assert_eq!(
            RawEvent::stroke(5, 6, 3, 2).decode(10),
            DecodedEvent::Stroke { x: 5, y: 6, radius: 2, is_erase: false, element_type: 3 }
        );
        assert_eq!(RawEvent::end_stroke().decode(10), DecodedEvent::EndStroke);
        assert_eq!(RawEvent::default().decode(10), DecodedEvent::Ignore);
    }

    #[test]
    fn reset_predicates() {
        assert!(reset_on_overflow(true));
        assert!(!reset_on_overflow(false));
        assert!(reset_on_decoded(&DecodedEvent::EndStroke));
        assert!(reset_on_decoded(&DecodedEvent::Reset));
        assert!(!reset_on_decoded(&DecodedEvent::Ignore));
    }

    proptest! {
        #[test]
        fn erase_matches_floor_clamp(x in -1e6f64..1e6, y in -1e6f64..1e6, val in -1e3f64..1e3, max in 0i32..255) {
            let expected = DecodedEvent::Stroke {
                x: x.floor() as i32,
                y: y.floor() as i32,
                radius: val.floor().clamp(0.0, 256.0) as i32,
                is_erase: true,
                element_type: 0,
            };
            prop_assert_eq!(decode(x, y, f64::from(INPUT_ERASE), val, f64::from(max)), expected);
        }

        #[test]
        fn brush_accepts_exactly_the_valid_range(element in -20i32..300, max in 0i32..255) {
            let kind = f64::from(INPUT_BRUSH_OFFSET + element);
            let decoded = decode(1.0, 2.0, kind, 4.0, f64::from(max));
            if INPUT_BRUSH_OFFSET + element == INPUT_NONE {
                prop_assert_eq!(decoded, DecodedEvent::Ignore);
            } else if INPUT_BRUSH_OFFSET + element == INPUT_END_STROKE {
                prop_assert_eq!(decoded, DecodedEvent::EndStroke);
            } else if INPUT_BRUSH_OFFSET + element == INPUT_ERASE {
                let is_erase = matches!(decoded, DecodedEvent::Stroke { is_erase: true, .. });
                prop_assert!(is_erase);
            } else if element > 0 && element <= max {
                prop_assert_eq!(decoded, DecodedEvent::Stroke {
                    x: 1, y: 2, radius: 4, is_erase: false, element_type: element,
                });
            } else {
                prop_assert_eq!(decoded, DecodedEvent::Ignore);
            }
        }

        #[test]
        fn non_finite_coordinates_reset(kind in 2i32..300, bad in prop::sample::select(vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY])) {
            prop_assert_eq!(decode(bad, 0.0, f64::from(kind), 1.0, 255.0), DecodedEvent::Reset);
            prop_assert_eq!(decode(0.0, bad, f64::from(kind), 1.0, 255.0), DecodedEvent::Reset);
            prop_assert_eq!(decode(0.0, 0.0, bad, 1.0, 255.0), DecodedEvent::Reset);
        }
    }
}
