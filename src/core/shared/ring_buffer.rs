//! Lock-free SPSC ring of pointer events
//!
//! Layout of the shared region (32-bit cells):
//!
//! | Cell                  | Description                                 |
//! |-----------------------|---------------------------------------------|
//! | 0                     | `write_index` - published by the producer   |
//! | 1                     | `read_index`  - published by the consumer   |
//! | 2                     | `overflow` (0/1) - raised by the producer   |
//! | 3 .. head_offset      | reserved                                    |
//! | head_offset ..        | `capacity` records of `record_width` cells  |
//!
//! Each record starts with `{x, y, type, val}`; cells past the fourth are
//! left untouched. One slot is always kept free so `write == read` means empty.
//!
//! A full ring drops the new event and raises `overflow`; it never blocks and
//! never overwrites unread records.

use std::sync::atomic::Ordering;

use thiserror::Error;
use tracing::warn;

use crate::domain::input_event::RawEvent;

use super::region::SharedRegion;

pub const WRITE_INDEX_CELL: usize = 0;
pub const READ_INDEX_CELL: usize = 1;
pub const OVERFLOW_CELL: usize = 2;

/// First cell that may hold records
pub const MIN_HEAD_OFFSET: usize = 3;
pub const DEFAULT_HEAD_OFFSET: usize = 4;
/// x, y, type, val
pub const EVENT_RECORD_WIDTH: usize = 4;
pub const DEFAULT_INPUT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLayout {
    pub capacity: usize,
    pub record_width: usize,
    pub head_offset: usize,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_INPUT_CAPACITY,
            record_width: EVENT_RECORD_WIDTH,
            head_offset: DEFAULT_HEAD_OFFSET,
        }
    }
}

impl RingLayout {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Cells a region needs to hold this layout
    pub fn required_cells(&self) -> usize {
        self.capacity
            .saturating_mul(self.record_width)
            .saturating_add(self.head_offset)
    }

    pub fn validate(&self) -> Result<(), RingError> {
        if self.capacity < 2 || self.capacity > i32::MAX as usize {
            return Err(RingError::Capacity(self.capacity));
        }
        if self.record_width < EVENT_RECORD_WIDTH {
            return Err(RingError::RecordWidth(self.record_width));
        }
        if self.head_offset < MIN_HEAD_OFFSET {
            return Err(RingError::HeadOffset(self.head_offset));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("ring capacity must be in [2, i32::MAX], got {0}")]
    Capacity(usize),
    #[error("record width must be at least 4 cells, got {0}")]
    RecordWidth(usize),
    #[error("head offset must be at least 3, got {0}")]
    HeadOffset(usize),
    #[error("shared region has {actual} cells, layout needs {required}")]
    RegionTooSmall { required: usize, actual: usize },
}

/// Owned view over a shared region holding the input ring.
///
/// Producer and consumer each build their own `InputRing` over the same
/// region. Exactly one context may call [`push`](Self::push) and exactly one
/// may call the drain/overflow methods.
pub struct InputRing<R: SharedRegion> {
    region: R,
    layout: RingLayout,
}

impl<R: SharedRegion> InputRing<R> {
    pub fn new(region: R, layout: RingLayout) -> Result<Self, RingError> {
        layout.validate()?;
        let required = layout.required_cells();
        if region.len() < required {
            return Err(RingError::RegionTooSmall {
                required,
                actual: region.len(),
            });
        }
        Ok(Self { region, layout })
    }

    #[inline]
    pub fn layout(&self) -> RingLayout {
        self.layout
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.capacity
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    /// Cursor read back from shared memory, forced into `[0, capacity)`
    #[inline]
    fn cursor(&self, cell: usize, order: Ordering) -> usize {
        let raw = self.region.load(cell, order);
        raw.rem_euclid(self.layout.capacity as i32) as usize
    }

    #[inline]
    fn record_base(&self, index: usize) -> usize {
        self.layout.head_offset + index * self.layout.record_width
    }

    fn read_record(&self, index: usize) -> RawEvent {
        let base = self.record_base(index);
        RawEvent {
            x: self.region.load(base, Ordering::Relaxed),
            y: self.region.load(base + 1, Ordering::Relaxed),
            kind: self.region.load(base + 2, Ordering::Relaxed),
            val: self.region.load(base + 3, Ordering::Relaxed),
        }
    }

    // === Producer side ===

    /// Enqueue one event. Returns `false` and raises the overflow flag when
    /// the ring is full; the event is dropped.
    pub fn push(&self, event: RawEvent) -> bool {
        let write = self.cursor(WRITE_INDEX_CELL, Ordering::Relaxed);
        let read = self.cursor(READ_INDEX_CELL, Ordering::Acquire);
        let next = (write + 1) % self.layout.capacity;
        if next == read {
            self.region.store(OVERFLOW_CELL, 1, Ordering::Release);
            return false;
        }

        let base = self.record_base(write);
        self.region.store(base, event.x, Ordering::Relaxed);
        self.region.store(base + 1, event.y, Ordering::Relaxed);
        self.region.store(base + 2, event.kind, Ordering::Relaxed);
        self.region.store(base + 3, event.val, Ordering::Relaxed);

        // Publish last: the consumer must never see a half-written record.
        self.region.store(WRITE_INDEX_CELL, next as i32, Ordering::Release);
        true
    }

    // === Consumer side ===

    /// Take every published record in FIFO order
    pub fn drain_all(&self) -> Vec<RawEvent> {
        let mut out = Vec::with_capacity(self.pending_count());
        self.drain_into(&mut out);
        out
    }

    /// Append every published record to `out` and return how many were taken.
    /// Reusing `out` across ticks keeps the consumer allocation-free.
    pub fn drain_into(&self, out: &mut Vec<RawEvent>) -> usize {
        let write = self.cursor(WRITE_INDEX_CELL, Ordering::Acquire);
        let mut read = self.cursor(READ_INDEX_CELL, Ordering::Relaxed);
        let start = out.len();

        while read != write {
            out.push(self.read_record(read));
            read = (read + 1) % self.layout.capacity;
        }

        self.region.store(READ_INDEX_CELL, read as i32, Ordering::Release);
        out.len() - start
    }

    /// Records published but not yet drained
    pub fn pending_count(&self) -> usize {
        let write = self.cursor(WRITE_INDEX_CELL, Ordering::Acquire);
        let read = self.cursor(READ_INDEX_CELL, Ordering::Acquire);
        if write >= read {
            write - read
        } else {
            self.layout.capacity - read + write
        }
    }

    pub fn check_overflow(&self) -> bool {
        self.region.load(OVERFLOW_CELL, Ordering::Acquire) != 0
    }

    pub fn clear_overflow(&self) {
        self.region.store(OVERFLOW_CELL, 0, Ordering::Release);
    }

    /// Observe and reset the overflow flag in one step, so a flag raised
    /// between a separate check and clear cannot be lost.
    pub fn check_and_clear_overflow(&self) -> bool {
        let overflowed = self.region.swap(OVERFLOW_CELL, 0, Ordering::AcqRel) != 0;
        if overflowed {
            warn!(capacity = self.layout.capacity, "input ring overflowed, events were dropped");
        }
        overflowed
    }

    /// Zero both cursors and the overflow flag.
    ///
    /// Only valid while the producer is quiescent, e.g. right after creating
    /// the shared buffer.
    pub fn reset(&self) {
        self.region.store(WRITE_INDEX_CELL, 0, Ordering::Release);
        self.region.store(READ_INDEX_CELL, 0, Ordering::Release);
        self.region.store(OVERFLOW_CELL, 0, Ordering::Release);
    }
}
