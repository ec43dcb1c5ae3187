//! Per-slot record for the recycling ring.

use std::sync::{Arc, Weak};

/// Opaque identifier of a visual cell allocated by the rendering backend.
///
/// The engine treats handles as tokens: it receives them from
/// [`CellHost::spawn_cell`](crate::host::CellHost::spawn_cell) and passes
/// them back for every visual operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(u64);

impl CellHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Mutable state of one pooled slot.
///
/// `logical_index` is the slot's identity label. It drifts as wrap-around
/// promotions relabel slots and is distinct from the dataset position the
/// slot currently resolves to.
#[derive(Debug)]
pub struct CellSlot<T> {
    handle: CellHandle,
    logical_index: i64,
    offset_from_center: f32,
    offset_from_center_abs: f32,
    visible: bool,
    /// Last item written to the visual cell. Weak on purpose: a slot never
    /// owns data, it only remembers what it bound to suppress redundant
    /// rebinds. Compared by identity, never by value.
    bound: Option<Weak<T>>,
}

impl<T> CellSlot<T> {
    pub fn new(handle: CellHandle, logical_index: i64) -> Self {
        Self {
            handle,
            logical_index,
            offset_from_center: 0.0,
            offset_from_center_abs: 0.0,
            visible: false,
            bound: None,
        }
    }

    pub fn handle(&self) -> CellHandle {
        self.handle
    }

    pub fn logical_index(&self) -> i64 {
        self.logical_index
    }

    pub(crate) fn set_logical_index(&mut self, index: i64) {
        self.logical_index = index;
    }

    pub fn offset_from_center(&self) -> f32 {
        self.offset_from_center
    }

    pub fn offset_from_center_abs(&self) -> f32 {
        self.offset_from_center_abs
    }

    /// Single write path for the offset so the absolute value can never go
    /// stale.
    pub(crate) fn set_offset_from_center(&mut self, offset: f32) {
        self.offset_from_center = offset;
        self.offset_from_center_abs = offset.abs();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the slot already bound exactly this item (pointer identity).
    pub fn is_bound_to(&self, item: &Arc<T>) -> bool {
        self.bound
            .as_ref()
            .is_some_and(|bound| std::ptr::eq(bound.as_ptr(), Arc::as_ptr(item)))
    }

    pub(crate) fn bind(&mut self, item: &Arc<T>) {
        self.bound = Some(Arc::downgrade(item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_setter_keeps_abs_in_sync() {
        let mut slot: CellSlot<String> = CellSlot::new(CellHandle::new(0), 0);
        slot.set_offset_from_center(-2.5);
        assert_eq!(slot.offset_from_center(), -2.5);
        assert_eq!(slot.offset_from_center_abs(), 2.5);
    }

    #[test]
    fn binding_is_identity_based() {
        let mut slot: CellSlot<String> = CellSlot::new(CellHandle::new(0), 0);
        let a = Arc::new("a".to_string());
        let a_clone_value = Arc::new("a".to_string());

        assert!(!slot.is_bound_to(&a));
        slot.bind(&a);
        assert!(slot.is_bound_to(&a));
        // Equal value, different allocation: must not count as bound.
        assert!(!slot.is_bound_to(&a_clone_value));
    }
}
