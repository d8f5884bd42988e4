//! Shared integer regions
//!
//! The input ring never touches memory directly: every cell access goes through
//! [`SharedRegion`], which only offers atomic load/store/swap. Native builds back
//! it with `AtomicI32` cells, the browser build with an `Int32Array` over a
//! `SharedArrayBuffer` driven through `Atomics`.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use js_sys::{Atomics, Int32Array};

/// Fixed-length array of 32-bit cells that two execution contexts may touch
/// concurrently.
///
/// Indices passed to these methods must be `< len()`.
pub trait SharedRegion {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, index: usize, order: Ordering) -> i32;

    fn store(&self, index: usize, value: i32, order: Ordering);

    /// Store `value` and return the previous value in one atomic step
    fn swap(&self, index: usize, value: i32, order: Ordering) -> i32;
}

impl SharedRegion for [AtomicI32] {
    #[inline]
    fn len(&self) -> usize {
        <[AtomicI32]>::len(self)
    }

    #[inline]
    fn load(&self, index: usize, order: Ordering) -> i32 {
        self[index].load(order)
    }

    #[inline]
    fn store(&self, index: usize, value: i32, order: Ordering) {
        self[index].store(value, order);
    }

    #[inline]
    fn swap(&self, index: usize, value: i32, order: Ordering) -> i32 {
        self[index].swap(value, order)
    }
}

impl<T: SharedRegion + ?Sized> SharedRegion for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn load(&self, index: usize, order: Ordering) -> i32 {
        (**self).load(index, order)
    }

    fn store(&self, index: usize, value: i32, order: Ordering) {
        (**self).store(index, value, order)
    }

    fn swap(&self, index: usize, value: i32, order: Ordering) -> i32 {
        (**self).swap(index, value, order)
    }
}

/// Heap-backed region shared between native threads by cloning the handle.
#[derive(Clone)]
pub struct HeapRegion {
    cells: Arc<[AtomicI32]>,
}

impl HeapRegion {
    /// Allocate `len` zeroed cells
    pub fn new(len: usize) -> Self {
        Self {
            cells: (0..len).map(|_| AtomicI32::new(0)).collect(),
        }
    }

    /// Non-atomic snapshot of every cell, for debugging and tests
    pub fn to_vec(&self) -> Vec<i32> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }
}

impl SharedRegion for HeapRegion {
    #[inline]
    fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn load(&self, index: usize, order: Ordering) -> i32 {
        self.cells.load(index, order)
    }

    #[inline]
    fn store(&self, index: usize, value: i32, order: Ordering) {
        self.cells.store(index, value, order)
    }

    #[inline]
    fn swap(&self, index: usize, value: i32, order: Ordering) -> i32 {
        self.cells.swap(index, value, order)
    }
}

/// Region living in a JS `SharedArrayBuffer`.
///
/// `Atomics` operations are sequentially consistent, which satisfies every
/// ordering the ring asks for, so `order` is not forwarded.
#[derive(Clone)]
pub struct JsRegion {
    cells: Int32Array,
}

impl JsRegion {
    pub fn new(cells: Int32Array) -> Self {
        Self { cells }
    }

    pub fn array(&self) -> &Int32Array {
        &self.cells
    }
}

impl SharedRegion for JsRegion {
    fn len(&self) -> usize {
        self.cells.length() as usize
    }

    fn load(&self, index: usize, _order: Ordering) -> i32 {
        Atomics::load(&self.cells, index as u32).unwrap_or(0)
    }

    fn store(&self, index: usize, value: i32, _order: Ordering) {
        let _ = Atomics::store(&self.cells, index as u32, value);
    }

    fn swap(&self, index: usize, value: i32, _order: Ordering) -> i32 {
        Atomics::exchange(&self.cells, index as u32, value).unwrap_or(0)
    }
}
