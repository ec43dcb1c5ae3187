//! Windowed circular carousel engine.
//!
//! A fixed-size pool of cell slots presents a logically unbounded,
//! circularly indexed sequence: pool size = visible window + one buffer cell
//! per side, slots are recycled in O(1) by relabeling instead of
//! reallocating, and a critically damped controller turns drag input into a
//! smooth, interruptible centering animation.
//!
//! The crate is rendering-agnostic. Embedders provide three collaborators:
//! a [`CellHost`] that owns the on-screen cells, a [`CellLayout`] strategy
//! (a [`CoverFlowLayout`] reference implementation ships here), and a
//! read-only [`DragSource`]. Everything runs single-threaded on the
//! embedder's frame tick via [`CarouselEngine::refresh_at`].

pub mod cell;
pub mod config;
pub mod controller;
pub mod drag;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod indexer;
pub mod layout;
pub mod pool;

pub use cell::{CellHandle, CellSlot};
pub use config::CarouselConfig;
pub use controller::{CenterPhase, CenteringController};
pub use drag::{AccumulatedDrag, DragSource, EmaSmoother};
pub use engine::CarouselEngine;
pub use error::{CarouselError, Result};
pub use events::CarouselEvent;
pub use host::CellHost;
pub use layout::{CellLayout, CellTransform, CoverFlowLayout};
pub use pool::{CellPool, Promotion};
