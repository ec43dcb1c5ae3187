//! Fixed-capacity recycling ring of cell slots.
//!
//! The ring always carries exactly one buffer slot beyond the visible window
//! on each side (pool size = visible + 2). When a slot drifts past the
//! window edge it is not reallocated: it moves to the opposite end of the
//! ring and is relabeled to represent the item entering on that side. That
//! relabeling is the O(1) recycling trick the whole engine rests on.

use std::collections::VecDeque;

use tracing::error;

use crate::cell::{CellHandle, CellSlot};

/// Which end of the ring a slot was promoted to, if any. Callers iterating
/// the ring use this to keep their position coherent after the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    None,
    /// Positive overflow: the slot left the window on the right and now
    /// represents the item entering on the left.
    Head,
    /// Negative overflow: the slot left on the left and now represents the
    /// item entering on the right.
    Tail,
}

/// Ordered ring of [`CellSlot`]s with wrap-around promotion.
///
/// Invariants once seeded and refreshed: the slot at ring position `depth`
/// is the center slot, and consecutive slots carry consecutive logical
/// indices (one transient discontinuity is permitted mid-promotion within a
/// single frame).
#[derive(Debug)]
pub struct CellPool<T> {
    slots: VecDeque<CellSlot<T>>,
    depth: usize,
}

impl<T> Default for CellPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CellPool<T> {
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            depth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Populate the ring with freshly spawned cells.
    ///
    /// Ring position `i` is seeded with logical index `i - depth`, which
    /// puts logical index 0 at the center slot so that, modulo the dataset
    /// size, the center addresses the first item.
    ///
    /// Refuses to seed over live slots unless `force` is set; double
    /// allocation indicates a rebuild-sequencing mistake and is reported
    /// rather than compounded.
    pub fn seed(&mut self, handles: Vec<CellHandle>, depth: usize, force: bool) -> bool {
        if !self.slots.is_empty() {
            if !force {
                error!("cannot seed the pool while there are existing slots");
                return false;
            }
            self.slots.clear();
        }

        self.depth = depth;
        for (i, handle) in handles.into_iter().enumerate() {
            let logical_index = i as i64 - depth as i64;
            let mut slot = CellSlot::new(handle, logical_index);
            slot.set_offset_from_center(logical_index as f32);
            self.slots.push_back(slot);
        }
        true
    }

    /// Tear down the ring, handing back the visual handles for despawning.
    pub fn drain_handles(&mut self) -> Vec<CellHandle> {
        self.slots.drain(..).map(|slot| slot.handle()).collect()
    }

    /// The slot at ring offset `depth` from the head.
    ///
    /// # Panics
    ///
    /// Panics when the ring is shorter than `depth + 1` slots. That state is
    /// unreachable through the rebuild contract; hitting it means a
    /// sequencing bug, not a runtime condition to recover from.
    pub fn center_slot(&self) -> &CellSlot<T> {
        self.slots.get(self.depth).unwrap_or_else(|| {
            panic!(
                "center slot unreachable: ring has {} slots, need at least {}",
                self.slots.len(),
                self.depth + 1
            )
        })
    }

    pub fn slot(&self, pos: usize) -> &CellSlot<T> {
        &self.slots[pos]
    }

    pub(crate) fn slot_mut(&mut self, pos: usize) -> &mut CellSlot<T> {
        &mut self.slots[pos]
    }

    pub fn slot_by_handle(&self, handle: CellHandle) -> Option<&CellSlot<T>> {
        self.slots.iter().find(|slot| slot.handle() == handle)
    }

    /// Recompute one slot's offset against the effective center (continuous
    /// center minus any in-flight drag displacement).
    pub(crate) fn update_offset(&mut self, pos: usize, effective_center: f32) {
        let logical = self.slots[pos].logical_index();
        self.slots[pos].set_offset_from_center(logical as f32 - effective_center);
    }

    /// Promote the slot at `pos` if it drifted out of the window.
    ///
    /// A slot whose rounded absolute offset is within `depth` stays put; the
    /// tie at exactly `depth` never promotes. Otherwise the slot moves to
    /// the opposite end of the ring and takes the logical index adjacent to
    /// its new neighbour, which is exactly the label of the item that just
    /// entered the window on that side.
    pub(crate) fn resolve_overflow(&mut self, pos: usize) -> Promotion {
        let slot = &self.slots[pos];
        if slot.offset_from_center_abs().round() <= self.depth as f32 {
            return Promotion::None;
        }

        if slot.offset_from_center() > 0.0 {
            // Rightmost overflow wraps to the head.
            let mut slot = self.slots.remove(pos).expect("slot position in range");
            let next_index = self
                .slots
                .front()
                .expect("ring cannot be empty during promotion")
                .logical_index();
            slot.set_logical_index(next_index - 1);
            self.slots.push_front(slot);
            Promotion::Head
        } else {
            // Leftmost overflow wraps to the tail.
            let mut slot = self.slots.remove(pos).expect("slot position in range");
            let previous_index = self
                .slots
                .back()
                .expect("ring cannot be empty during promotion")
                .logical_index();
            slot.set_logical_index(previous_index + 1);
            self.slots.push_back(slot);
            Promotion::Tail
        }
    }

    /// Handles ascending by distance from the center, ties broken by stable
    /// ring order. The first handle is the frontmost (center) cell; each
    /// following handle is drawn further back.
    pub fn render_order(&self) -> Vec<CellHandle> {
        let mut by_distance: Vec<&CellSlot<T>> = self.slots.iter().collect();
        by_distance.sort_by(|a, b| {
            a.offset_from_center_abs()
                .total_cmp(&b.offset_from_center_abs())
        });
        by_distance.into_iter().map(|slot| slot.handle()).collect()
    }

    /// Logical indices in ring order. Outside of a mid-frame promotion these
    /// form a contiguous run of consecutive integers.
    pub fn logical_indices(&self) -> Vec<i64> {
        self.slots.iter().map(|slot| slot.logical_index()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_pool(pool_size: usize, depth: usize) -> CellPool<String> {
        let mut pool = CellPool::new();
        let handles = (0..pool_size as u64).map(CellHandle::new).collect();
        assert!(pool.seed(handles, depth, false));
        pool
    }

    fn assert_contiguous(pool: &CellPool<String>) {
        let indices = pool.logical_indices();
        for pair in indices.windows(2) {
            assert_eq!(pair[1] - pair[0], 1, "ring not contiguous: {indices:?}");
        }
    }

    #[test]
    fn seeding_centers_logical_zero() {
        let pool = seeded_pool(7, 3);
        assert_eq!(pool.logical_indices(), vec![-3, -2, -1, 0, 1, 2, 3]);
        assert_eq!(pool.center_slot().logical_index(), 0);
    }

    #[test]
    fn seeding_over_live_slots_requires_force() {
        let mut pool = seeded_pool(5, 2);
        let handles: Vec<CellHandle> = (10..15).map(CellHandle::new).collect();
        assert!(!pool.seed(handles.clone(), 2, false));
        assert_eq!(pool.len(), 5);

        assert!(pool.seed(handles, 2, true));
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.center_slot().handle(), CellHandle::new(12));
    }

    #[test]
    fn offsets_at_threshold_do_not_promote() {
        let mut pool = seeded_pool(5, 2);
        for pos in 0..pool.len() {
            pool.update_offset(pos, 0.0);
            // All seeded offsets are within [-depth, depth]: never promoted.
            assert_eq!(pool.resolve_overflow(pos), Promotion::None);
        }
        assert_contiguous(&pool);
    }

    #[test]
    fn negative_overflow_promotes_to_tail() {
        let mut pool = seeded_pool(5, 2);
        // Center moved right by 0.6: head slot's offset is -2.6, round 3 > 2.
        for pos in 0..pool.len() {
            pool.update_offset(pos, 0.6);
        }
        assert_eq!(pool.resolve_overflow(0), Promotion::Tail);
        assert_eq!(pool.logical_indices(), vec![-1, 0, 1, 2, 3]);
        assert_contiguous(&pool);
    }

    #[test]
    fn positive_overflow_promotes_to_head() {
        let mut pool = seeded_pool(5, 2);
        for pos in 0..pool.len() {
            pool.update_offset(pos, -0.6);
        }
        let tail = pool.len() - 1;
        assert_eq!(pool.resolve_overflow(tail), Promotion::Head);
        assert_eq!(pool.logical_indices(), vec![-3, -2, -1, 0, 1]);
        assert_contiguous(&pool);
    }

    #[test]
    fn render_order_is_center_first_and_stable() {
        let mut pool = seeded_pool(5, 2);
        for pos in 0..pool.len() {
            pool.update_offset(pos, 0.0);
        }
        let order = pool.render_order();
        // Center slot first, then equidistant pairs in ring order.
        assert_eq!(order[0], pool.center_slot().handle());
        assert_eq!(
            order,
            vec![
                CellHandle::new(2),
                CellHandle::new(1),
                CellHandle::new(3),
                CellHandle::new(0),
                CellHandle::new(4),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "center slot unreachable")]
    fn center_slot_on_empty_ring_panics() {
        let pool: CellPool<String> = CellPool::new();
        let _ = pool.center_slot();
    }
}
