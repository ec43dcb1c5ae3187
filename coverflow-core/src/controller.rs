//! Continuous-to-discrete centering state machine.
//!
//! Holds the continuous center position as three floats (current, target,
//! velocity) plus a phase flag. Drag input moves the target directly with no
//! damping; releasing hands the controller a settling job: a critically
//! damped approach to the nearest integer index, reported exactly once when
//! it lands.

use std::time::Instant;

use crate::indexer::wrap;

/// Both the remaining distance and the velocity must fall under this bound
/// (in index units) before a settle completes.
const SETTLE_EPSILON: f32 = 0.05;

/// Frame deltas are clamped to a 30fps floor so a dropped frame cannot move
/// the center by more than a fraction of a cell, which is what keeps the
/// single-promotion-per-frame guarantee intact.
const MAX_FRAME_DT: f32 = 0.033;

/// Phase of the centering state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterPhase {
    /// At rest on an integer index; current == target, no velocity.
    Idle,
    /// A drag is active; the carousel tracks the finger, no interpolation.
    Dragging,
    /// Approaching a fixed integer target via damped interpolation.
    Settling,
}

/// Damped centering controller. Stateless between frames beyond the three
/// floats, which is why overwriting the target is all it takes to cancel an
/// in-flight animation.
#[derive(Debug, Clone)]
pub struct CenteringController {
    current: f32,
    target: f32,
    velocity: f32,
    phase: CenterPhase,
    smooth_time: f32,
    last_tick: Option<Instant>,
}

impl CenteringController {
    pub fn new(smooth_time: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            velocity: 0.0,
            phase: CenterPhase::Idle,
            smooth_time,
            last_tick: None,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn phase(&self) -> CenterPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == CenterPhase::Settling
    }

    pub fn set_smooth_time(&mut self, smooth_time: f32) {
        self.smooth_time = smooth_time;
    }

    /// Begin tracking a drag. `center_logical` comes from the pool's center
    /// slot, not the stored float, to resynchronize with any promotions that
    /// happened while idle.
    pub fn begin_drag(&mut self, center_logical: i64) {
        self.current = center_logical as f32;
        self.phase = CenterPhase::Dragging;
    }

    /// End a drag: snap the target to the center slot's logical index and
    /// back-date `current` by the slot's fractional offset so the visual
    /// position does not jump on release.
    pub fn end_drag(&mut self, center_logical: i64, center_offset: f32) {
        self.target = center_logical as f32;
        self.current = self.target - center_offset;
        self.phase = CenterPhase::Settling;
    }

    /// Animated centering: fix the target and let settling carry it there.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        self.phase = CenterPhase::Settling;
    }

    /// Immediate centering: no interpolation, no settle report; the caller
    /// is responsible for the synchronous notification.
    pub fn snap_to(&mut self, index: f32) {
        self.current = index;
        self.target = index;
        self.velocity = 0.0;
        self.phase = CenterPhase::Idle;
    }

    /// Advance one frame. Returns `true` exactly when a settle completed on
    /// this tick; the caller fires the center-changed notification then.
    ///
    /// On settle the target is canonicalized through the circular index
    /// against the dataset size (kept at the plain rounded value when the
    /// dataset is empty) so the stored floats cannot drift unboundedly.
    pub fn advance(&mut self, now: Instant, dataset_len: usize) -> bool {
        let last = self.last_tick.replace(now).unwrap_or(now);
        let dt = now
            .saturating_duration_since(last)
            .as_secs_f32()
            .min(MAX_FRAME_DT);

        if self.phase != CenterPhase::Settling {
            return false;
        }

        if !approximately(self.current, self.target) {
            let max_speed = self.smooth_time * 4.0;
            self.current = smooth_damp(
                self.current,
                self.target,
                &mut self.velocity,
                self.smooth_time,
                max_speed,
                dt,
            );

            if self.velocity.abs() >= SETTLE_EPSILON
                || (self.target - self.current).abs() >= SETTLE_EPSILON
            {
                return false;
            }
        }

        self.target = if dataset_len > 0 {
            wrap(self.target.round() as i64, dataset_len) as f32
        } else {
            self.target.round()
        };
        self.current = self.target;
        self.velocity = 0.0;
        self.phase = CenterPhase::Idle;
        true
    }
}

fn approximately(a: f32, b: f32) -> bool {
    (a - b).abs() < f32::EPSILON.max(1e-6 * a.abs().max(b.abs()))
}

/// Critically damped spring interpolation toward a target, the classic
/// SmoothDamp formulation (Game Programming Gems 4). Never overshoots;
/// `max_speed` caps how fast the value may travel.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    // Guard against overshooting the real target.
    if (target - current > 0.0) == (output > target) && dt > 0.0 {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}
