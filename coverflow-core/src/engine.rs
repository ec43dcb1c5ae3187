//! Per-frame orchestration: pool, indexer, controller, host, layout.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::cell::CellHandle;
use crate::config::CarouselConfig;
use crate::controller::{CenterPhase, CenteringController};
use crate::drag::DragSource;
use crate::events::CarouselEvent;
use crate::host::CellHost;
use crate::indexer::wrap;
use crate::layout::CellLayout;
use crate::pool::{CellPool, Promotion};

/// Windowed circular carousel engine.
///
/// Owns the dataset and the recycling ring; collaborates with a rendering
/// backend ([`CellHost`]), a layout strategy ([`CellLayout`]), and a drag
/// producer ([`DragSource`]). Everything runs on one logical thread, driven
/// by [`refresh_at`](Self::refresh_at) once per frame.
///
/// Within a frame the order is load-bearing: drag-delta application, then
/// overflow resolution, then data rebinding, then layout delegation, then
/// render-order assignment. Reordering those corrupts the invariant that
/// adjacent ring slots differ by exactly one logical index.
#[derive(Debug)]
pub struct CarouselEngine<T, H: CellHost<T>> {
    config: CarouselConfig,
    data: Vec<Arc<T>>,
    pool: CellPool<T>,
    controller: CenteringController,
    layout: Box<dyn CellLayout>,
    drag: Rc<dyn DragSource>,
    host: H,
    events: Vec<CarouselEvent<T>>,
    was_dragging: bool,
}

impl<T, H: CellHost<T>> CarouselEngine<T, H> {
    /// Build an engine and run the initial rebuild. A host that cannot
    /// spawn cells yet (no template configured) leaves the engine with an
    /// empty pool; the per-frame self-heal retries once the host is ready.
    pub fn new(
        config: CarouselConfig,
        host: H,
        layout: Box<dyn CellLayout>,
        drag: Rc<dyn DragSource>,
    ) -> Self {
        let mut engine = Self {
            controller: CenteringController::new(config.center_smooth_time()),
            config,
            data: Vec::new(),
            pool: CellPool::new(),
            layout,
            drag,
            host,
            events: Vec::new(),
            was_dragging: false,
        };
        engine.rebuild(true);
        engine
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Change the number of visible cells. Takes effect on the next frame:
    /// the live-cell count no longer matches and the self-heal rebuilds.
    pub fn set_visible_elements(&mut self, value: usize) {
        self.config.set_visible_elements(value);
    }

    pub fn set_center_smooth_time(&mut self, value: f32) {
        self.config.set_center_smooth_time(value);
        self.controller
            .set_smooth_time(self.config.center_smooth_time());
    }

    pub fn data(&self) -> &[Arc<T>] {
        &self.data
    }

    pub fn pool(&self) -> &CellPool<T> {
        &self.pool
    }

    pub fn controller(&self) -> &CenteringController {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Drain the notifications accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<CarouselEvent<T>> {
        std::mem::take(&mut self.events)
    }

    // --- Per-frame driving ------------------------------------------------

    /// Advance one frame at the given timestamp.
    pub fn refresh_at(&mut self, now: Instant) {
        self.drive_drag_transitions();

        if self.host.live_cells() != self.config.pool_size()
            || self.pool.len() != self.config.pool_size()
        {
            self.rebuild(false);
        } else {
            self.refresh_slots();
        }

        if self.controller.advance(now, self.data.len()) {
            self.emit_center_changed();
        }
    }

    /// Detect drag begin/end edges from the read-only drag source.
    fn drive_drag_transitions(&mut self) {
        let dragging = self.drag.is_dragging();
        if dragging == self.was_dragging {
            return;
        }
        self.was_dragging = dragging;

        if self.pool.is_empty() {
            return;
        }

        if dragging {
            // Resync from the ring, not the stored float: promotions may
            // have drifted the labels while idle.
            self.controller
                .begin_drag(self.pool.center_slot().logical_index());
        } else {
            let center = self.pool.center_slot();
            self.controller
                .end_drag(center.logical_index(), center.offset_from_center());
        }
    }

    /// One refresh pass over the ring: offsets, overflow, visibility,
    /// binding, layout, then render order.
    fn refresh_slots(&mut self) {
        if self.pool.is_empty() {
            return;
        }

        let drag_delta = if self.drag.is_dragging() {
            self.drag.total_delta()
        } else {
            0.0
        };
        // offset = logical - current + delta, folded into a single subtrahend.
        let effective_center = self.controller.current() - drag_delta;

        let len = self.pool.len();
        let mut pos = 0;
        while pos < len {
            self.pool.update_offset(pos, effective_center);
            match self.pool.resolve_overflow(pos) {
                Promotion::None => {
                    self.present_slot(pos);
                    pos += 1;
                }
                Promotion::Head => {
                    // The promoted slot now leads the ring; the slot shifted
                    // into `pos` was already processed.
                    self.present_slot(0);
                    pos += 1;
                }
                Promotion::Tail => {
                    // The promoted slot is presented when the pass reaches
                    // the tail, with a fresh offset; `pos` now holds the
                    // next unprocessed slot.
                }
            }
        }

        let order = self.pool.render_order();
        self.host.set_render_order(&order);
    }

    /// Push one slot's visibility, data binding, and layout to the host.
    fn present_slot(&mut self, pos: usize) {
        let visible_margin = self.config.depth() as f32 - 0.5;

        let slot = self.pool.slot(pos);
        let handle = slot.handle();
        let logical = slot.logical_index();
        let offset = slot.offset_from_center();
        let offset_abs = slot.offset_from_center_abs();

        // The half-cell margin keeps a cell rendered slightly past the
        // window edge, avoiding pop-in at the boundary.
        let visible = offset_abs < visible_margin;
        self.pool.slot_mut(pos).set_visible(visible);
        self.host.set_visible(handle, visible);

        if !self.data.is_empty() {
            let data_index = wrap(logical, self.data.len());
            let item = &self.data[data_index];
            if !self.pool.slot(pos).is_bound_to(item) {
                self.host.bind(handle, item);
                self.pool.slot_mut(pos).bind(item);
            }
        }

        let transform = self.layout.layout(offset, offset_abs);
        self.host.apply_transform(handle, transform);
    }

    /// Tear down and respawn the ring.
    ///
    /// No-op when the pool already matches the configured size and `force`
    /// is not set. A host that cannot spawn (missing template or visual
    /// anchor) aborts the rebuild with an error log; the engine keeps its
    /// last-good state and retries on a later frame via the self-heal.
    pub fn rebuild(&mut self, force: bool) {
        let pool_size = self.config.pool_size();
        if !force && self.host.live_cells() == pool_size && self.pool.len() == pool_size {
            return;
        }

        // Clear the host wholesale, not just the tracked handles: residual
        // cells would keep `live_cells` above the pool size and retrigger
        // the self-heal every frame.
        self.pool.drain_handles();
        self.host.despawn_all();

        let mut handles = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            match self.host.spawn_cell() {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    error!(%err, "cannot build cells");
                    for handle in handles {
                        self.host.despawn_cell(handle);
                    }
                    return;
                }
            }
        }

        if !self.pool.seed(handles, self.config.depth(), force) || self.pool.is_empty() {
            return;
        }

        let center = self.pool.center_slot().logical_index();
        self.controller.snap_to(center as f32);
        self.refresh_slots();
        self.emit_center_changed();
    }

    // --- Dataset mutation -------------------------------------------------

    /// Append one item.
    pub fn add(&mut self, item: Arc<T>) {
        self.data.push(item);
    }

    /// Append many items.
    pub fn add_range(&mut self, items: impl IntoIterator<Item = Arc<T>>) {
        self.data.extend(items);
    }

    /// Insert an item before the given position. Out-of-range positions are
    /// logged and skipped; appending goes through [`add`](Self::add).
    pub fn insert(&mut self, index: usize, item: Arc<T>) {
        if index >= self.data.len() {
            error!(index, len = self.data.len(), "insert index out of range");
            return;
        }
        self.data.insert(index, item);
    }

    /// Insert many items before the given position.
    pub fn insert_range(&mut self, index: usize, items: impl IntoIterator<Item = Arc<T>>) {
        if index >= self.data.len() {
            error!(index, len = self.data.len(), "insert index out of range");
            return;
        }
        for (n, item) in items.into_iter().enumerate() {
            self.data.insert(index + n, item);
        }
    }

    /// Remove an item by identity. Returns whether it was present.
    pub fn remove(&mut self, item: &Arc<T>) -> bool {
        match self.data.iter().position(|d| Arc::ptr_eq(d, item)) {
            Some(pos) => {
                self.data.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Clear the dataset. Forces a rebuild: with no items left, the center
    /// reference is meaningless.
    pub fn remove_all(&mut self) {
        self.data.clear();
        self.rebuild(true);
    }

    // --- Centering --------------------------------------------------------

    /// Center on the item at `index`. Out-of-range indices wrap. Rejected
    /// while a drag or a centering animation is in flight.
    pub fn center_on_index(&mut self, index: i64, animated: bool) {
        if self.controller.phase() != CenterPhase::Idle {
            warn!(index, "cannot center while a drag or animation is ongoing");
            return;
        }

        if self.data.is_empty() {
            warn!("no items in list");
            return;
        }

        if animated {
            // The settle pass canonicalizes and notifies when it lands.
            self.controller.set_target(index as f32);
        } else {
            self.controller.snap_to(index as f32);
            self.refresh_slots();
            self.emit_center_changed();
        }
    }

    /// Center on a specific item, resolved by identity. Logged no-op when
    /// the item is not in the dataset.
    pub fn center_on_item(&mut self, item: &Arc<T>, animated: bool) {
        match self.data.iter().position(|d| Arc::ptr_eq(d, item)) {
            Some(index) => self.center_on_index(index as i64, animated),
            None => warn!("item not present in list"),
        }
    }

    /// Center on the item after the current target.
    pub fn center_next(&mut self, animated: bool) {
        if self.data.is_empty() {
            warn!("no items in list");
            return;
        }
        let index = wrap(self.controller.target().round() as i64, self.data.len());
        self.center_on_index(index as i64 + 1, animated);
    }

    /// Center on the item before the current target.
    pub fn center_previous(&mut self, animated: bool) {
        if self.data.is_empty() {
            warn!("no items in list");
            return;
        }
        let index = wrap(self.controller.target().round() as i64, self.data.len());
        self.center_on_index(index as i64 - 1, animated);
    }

    // --- Notifications ----------------------------------------------------

    /// Report a click on a visual cell. Emits
    /// [`CarouselEvent::CenterClicked`] when the carousel is at rest and the
    /// clicked cell is the settled center.
    pub fn notify_cell_clicked(&mut self, handle: CellHandle) {
        if self.controller.phase() != CenterPhase::Idle
            || self.data.is_empty()
            || self.pool.is_empty()
        {
            return;
        }

        let len = self.data.len();
        let center_index = wrap(self.controller.current().round() as i64, len);
        let target_index = wrap(self.controller.target().round() as i64, len);
        if center_index != target_index {
            return;
        }

        let Some(slot) = self.pool.slot_by_handle(handle) else {
            debug!(handle = handle.raw(), "click on unknown cell handle");
            return;
        };

        if wrap(slot.logical_index(), len) == target_index {
            self.events
                .push(CarouselEvent::CenterClicked(self.data[target_index].clone()));
        }
    }

    /// Queue a center-changed notification for the item under the center
    /// slot. Skipped (with a trace) when there is nothing to report.
    fn emit_center_changed(&mut self) {
        if self.data.is_empty() || self.pool.is_empty() {
            debug!("center changed with no data bound; nothing to notify");
            return;
        }
        let data_index = wrap(self.pool.center_slot().logical_index(), self.data.len());
        self.events
            .push(CarouselEvent::CenterChanged(self.data[data_index].clone()));
    }
}
