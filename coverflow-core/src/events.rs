//! Notifications raised by the engine, drained by the embedder.

use std::sync::Arc;

/// Carousel notification. Events accumulate in the engine's queue during
/// refreshes and synchronous operations; the embedder drains them with
/// [`CarouselEngine::take_events`](crate::engine::CarouselEngine::take_events)
/// once per frame.
#[derive(Debug, Clone)]
pub enum CarouselEvent<T> {
    /// The settled center item changed. Fired at most once per settle, and
    /// once per synchronous centering call or rebuild.
    CenterChanged(Arc<T>),
    /// The settled center cell was clicked while the carousel was at rest.
    CenterClicked(Arc<T>),
}
