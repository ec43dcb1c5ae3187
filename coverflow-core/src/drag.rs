//! Drag input contract and reference producers.
//!
//! The engine never parses pointer or touch events. It reads a narrow,
//! read-only [`DragSource`] each frame: an accumulated, normalized horizontal
//! displacement plus a dragging flag. Anything can sit behind that contract,
//! including the synthetic drivers used by the test suite.

use std::cell::Cell;
use std::fmt;

/// Read-only view of a drag gesture in progress. Implementations own all
/// event parsing; the engine only ever reads.
pub trait DragSource: fmt::Debug {
    /// Accumulated normalized horizontal displacement since the drag began.
    /// One unit corresponds to one cell width of travel.
    fn total_delta(&self) -> f32;

    /// Whether a drag gesture is currently active.
    fn is_dragging(&self) -> bool;
}

/// Reference [`DragSource`]: integrates already-normalized pointer deltas
/// with a sensitivity factor. The embedder feeds it deltas in its own input
/// loop; the engine observes the accumulated total.
///
/// Interior mutability keeps the producer usable through the shared handle
/// the engine holds; the whole system is single-threaded by design.
#[derive(Debug)]
pub struct AccumulatedDrag {
    sensitivity: f32,
    dragging: Cell<bool>,
    total: Cell<f32>,
}

impl Default for AccumulatedDrag {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl AccumulatedDrag {
    /// `sensitivity` scales incoming deltas; higher values scroll faster.
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity: sensitivity.max(0.1),
            dragging: Cell::new(false),
            total: Cell::new(0.0),
        }
    }

    pub fn begin(&self) {
        if self.dragging.get() {
            return;
        }
        self.dragging.set(true);
        self.total.set(0.0);
    }

    /// Feed one normalized horizontal pointer delta (cursor travel divided by
    /// the drag surface width). Ignored outside an active drag.
    pub fn push(&self, normalized_delta: f32) {
        if !self.dragging.get() {
            return;
        }
        self.total.set(self.total.get() + normalized_delta * self.sensitivity);
    }

    pub fn end(&self) {
        self.dragging.set(false);
        self.total.set(0.0);
    }
}

impl DragSource for AccumulatedDrag {
    fn total_delta(&self) -> f32 {
        self.total.get()
    }

    fn is_dragging(&self) -> bool {
        self.dragging.get()
    }
}

/// Exponential-moving-average smoother for raw pointer deltas.
///
/// Sits in front of an [`AccumulatedDrag`] when the input device delivers
/// jittery deltas. While a drag is active the smoothed value decays toward
/// zero over time so a held-still pointer stops scrolling.
///
/// <https://en.wikipedia.org/wiki/Moving_average#Exponential_moving_average>
#[derive(Debug, Clone)]
pub struct EmaSmoother {
    smoothing_factor: f32,
    time_decay: f32,
    dragging: bool,
    smoothed: f32,
}

impl Default for EmaSmoother {
    fn default() -> Self {
        Self::new(0.2, 4.2)
    }
}

impl EmaSmoother {
    /// `smoothing_factor` in `0..=1` weighs new samples; `time_decay` (per
    /// second) pulls the smoothed delta back to zero between samples.
    pub fn new(smoothing_factor: f32, time_decay: f32) -> Self {
        Self {
            smoothing_factor: smoothing_factor.clamp(0.0, 1.0),
            time_decay: time_decay.max(0.1),
            dragging: false,
            smoothed: 0.0,
        }
    }

    pub fn begin(&mut self) {
        self.dragging = true;
        self.smoothed = 0.0;
    }

    pub fn push(&mut self, delta: f32) {
        if !self.dragging {
            return;
        }
        self.smoothed += (delta - self.smoothed) * self.smoothing_factor;
    }

    /// Advance the time decay; call once per frame with the frame delta in
    /// seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.dragging {
            return;
        }
        let decay = (self.time_decay * dt).clamp(0.0, 1.0);
        self.smoothed += (0.0 - self.smoothed) * decay;
    }

    pub fn end(&mut self) {
        self.dragging = false;
        self.smoothed = 0.0;
    }

    pub fn smoothed_delta(&self) -> f32 {
        self.smoothed
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
