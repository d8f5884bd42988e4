//! Element ids as they cross the worker boundary
//!
//! The element table itself lives in the engine's content registry; the bridge
//! only needs to know the id width and which ids are currently valid.

pub type ElementId = u8;

/// Id 0 is always the empty cell
pub const EL_EMPTY: ElementId = 0;
pub const MAX_ELEMENT_ID: ElementId = ElementId::MAX;

/// Highest paintable id for a table of `element_count` entries (0 when only
/// `EL_EMPTY` exists)
#[inline]
pub fn max_element_id_for_count(element_count: usize) -> i32 {
    element_count.saturating_sub(1).min(MAX_ELEMENT_ID as usize) as i32
}

#[inline]
pub fn is_paintable(id: ElementId, max_element_id: i32) -> bool {
    id != EL_EMPTY && i32::from(id) <= max_element_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_id_tracks_table_size() {
        assert_eq!(max_element_id_for_count(0), 0);
        assert_eq!(max_element_id_for_count(1), 0);
        assert_eq!(max_element_id_for_count(21), 20);
        assert_eq!(max_element_id_for_count(10_000), 255);
    }

    #[test]
    fn empty_is_never_paintable() {
        assert!(!is_paintable(EL_EMPTY, 20));
        assert!(is_paintable(20, 20));
        assert!(!is_paintable(21, 20));
    }
}
