//! Static configuration for a carousel instance.

use serde::{Deserialize, Serialize};

/// Smallest accepted smoothing time. Values at or below zero would make the
/// damped interpolation degenerate.
pub const MIN_CENTER_SMOOTH_TIME: f32 = 1e-4;

/// Tuning surface for a carousel. The pool size and window depth are derived,
/// never configured directly.
///
/// `visible_elements` is coerced on every write: values below 3 clamp to 3,
/// even values round down to the nearest odd number (4 becomes 3, 6 becomes
/// 5) so the window stays symmetrical around a single center cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCarouselConfig")]
pub struct CarouselConfig {
    visible_elements: usize,
    center_smooth_time: f32,
}

/// Unvalidated mirror used for deserialization; all values pass through the
/// coercing constructor before use.
#[derive(Debug, Deserialize)]
struct RawCarouselConfig {
    visible_elements: usize,
    center_smooth_time: f32,
}

impl From<RawCarouselConfig> for CarouselConfig {
    fn from(raw: RawCarouselConfig) -> Self {
        Self::new(raw.visible_elements, raw.center_smooth_time)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::new(3, 0.2)
    }
}

impl CarouselConfig {
    pub fn new(visible_elements: usize, center_smooth_time: f32) -> Self {
        Self {
            visible_elements: coerce_visible_elements(visible_elements),
            center_smooth_time: center_smooth_time.max(MIN_CENTER_SMOOTH_TIME),
        }
    }

    /// Number of fully visible cells; always odd and at least 3.
    pub fn visible_elements(&self) -> usize {
        self.visible_elements
    }

    pub fn set_visible_elements(&mut self, value: usize) {
        self.visible_elements = coerce_visible_elements(value);
    }

    /// Duration of the centering animation in seconds.
    pub fn center_smooth_time(&self) -> f32 {
        self.center_smooth_time
    }

    pub fn set_center_smooth_time(&mut self, value: f32) {
        self.center_smooth_time = value.max(MIN_CENTER_SMOOTH_TIME);
    }

    /// Total number of pooled cells: the visible window plus one buffer cell
    /// per side. The buffer is what makes O(1) recycling possible.
    pub fn pool_size(&self) -> usize {
        self.visible_elements + 2
    }

    /// Half-window radius in cells, buffer included.
    pub fn depth(&self) -> usize {
        (self.pool_size() - 1) / 2
    }
}

fn coerce_visible_elements(value: usize) -> usize {
    if value < 3 {
        return 3;
    }

    if value % 2 == 0 {
        // Round down even numbers to the nearest odd number.
        return value - 1;
    }

    value
}
