//! Rendering backend contract.

use std::fmt;
use std::sync::Arc;

use crate::cell::CellHandle;
use crate::error::Result;
use crate::layout::CellTransform;

/// Platform adapter that owns the on-screen representation of pool slots.
///
/// The engine drives it, never the other way around: cells are spawned and
/// despawned during rebuilds, and every refresh pushes visibility, data
/// bindings, transforms, and draw order through this trait. `live_cells` is
/// read defensively each frame; a drifted count triggers a self-healing
/// rebuild.
pub trait CellHost<T>: fmt::Debug {
    /// Allocate one visual cell from the configured template.
    ///
    /// Fails with [`CarouselError::MissingCellTemplate`] when no template is
    /// configured, or [`CarouselError::MissingVisualAnchor`] when the
    /// template cannot be positioned.
    ///
    /// [`CarouselError::MissingCellTemplate`]: crate::error::CarouselError::MissingCellTemplate
    /// [`CarouselError::MissingVisualAnchor`]: crate::error::CarouselError::MissingVisualAnchor
    fn spawn_cell(&mut self) -> Result<CellHandle>;

    /// Release the visual resources behind a handle. The handle is dead
    /// afterwards.
    fn despawn_cell(&mut self, handle: CellHandle);

    /// Release every visual cell backing this carousel, including residual
    /// cells the engine never spawned. Called at the start of a rebuild so a
    /// drifted `live_cells` count converges instead of retriggering the
    /// self-heal forever.
    fn despawn_all(&mut self);

    /// Number of live visual cells currently backing this carousel.
    fn live_cells(&self) -> usize;

    fn set_visible(&mut self, handle: CellHandle, visible: bool);

    /// Write an item into the visual cell. Only called when the bound item
    /// actually changed (identity comparison in the engine).
    fn bind(&mut self, handle: CellHandle, item: &Arc<T>);

    fn apply_transform(&mut self, handle: CellHandle, transform: CellTransform);

    /// Draw order, front to back: the first handle is the topmost (center)
    /// cell, the last is drawn furthest back. Hosts map this to sibling
    /// order, z-order, or batched draw order as appropriate.
    fn set_render_order(&mut self, front_to_back: &[CellHandle]);
}
