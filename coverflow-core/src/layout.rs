//! Cell layout strategies: signed offset-from-center in, visual transform out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transform a layout strategy produces for one cell. The host decides how to
/// apply it (scene-graph transform, shader uniforms, explicit view frames).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellTransform {
    /// Local position, x/y/z. Positive z is further away from the viewer.
    pub position: [f32; 3],
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation around the vertical axis in degrees.
    pub rotation_y: f32,
}

impl CellTransform {
    pub const IDENTITY: Self = Self {
        position: [0.0, 0.0, 0.0],
        scale: 1.0,
        rotation_y: 0.0,
    };
}

/// Layout strategy contract. Pure: the transform is a function of the signed
/// offset alone, so one shared instance can serve many carousels and there is
/// never per-call state to reset.
pub trait CellLayout: fmt::Debug {
    fn layout(&self, offset_from_center: f32, offset_from_center_abs: f32) -> CellTransform;
}

/// Classic cover-flow arrangement: the center cell is flat and frontmost,
/// neighbours shrink, overlap, recede and pan away the further out they sit.
///
/// <https://en.wikipedia.org/wiki/Cover_Flow>
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverFlowLayout {
    /// Horizontal overlap as a fraction of the cell width, applied more
    /// strongly the further out a cell is. Sensible range 0.05..=0.4.
    pub relative_overlap: f32,
    /// Exponent shaping how quickly depth effects ramp up with distance from
    /// the center. Sensible range 1.0..=2.0.
    pub depth_scale_power: f32,
    /// Scale of the immediate neighbours of the center cell. Cells between
    /// the center and its neighbours interpolate toward this. Range
    /// 0.1..=0.9.
    pub neighbour_scale: f32,
    /// Pan (yaw) step in degrees per offset unit. Range 0..=70.
    pub pan_step: f32,
    /// Depth step per shaped offset unit. Range 10..=200.
    pub depth_step: f32,
    /// Width of a cell in host units; the horizontal spacing base.
    pub cell_width: f32,
}

impl Default for CoverFlowLayout {
    fn default() -> Self {
        Self {
            relative_overlap: 0.2,
            depth_scale_power: 1.5,
            neighbour_scale: 0.8,
            pan_step: 20.0,
            depth_step: 80.0,
            cell_width: 200.0,
        }
    }
}

impl CellLayout for CoverFlowLayout {
    fn layout(&self, offset_from_center: f32, offset_from_center_abs: f32) -> CellTransform {
        if offset_from_center_abs < 1e-6 {
            return CellTransform::IDENTITY;
        }

        let left_or_right = if offset_from_center > 0.0 { 1.0 } else { -1.0 };

        // Immediate neighbours of the center need a scale transition; cells
        // further out hold the neighbour scale.
        let scale = if offset_from_center_abs < 1.0 {
            lerp(1.0, self.neighbour_scale, offset_from_center_abs)
        } else {
            self.neighbour_scale
        };

        // Shaped distance: more overlap and more recession the further out.
        let depth_factor = offset_from_center_abs.powf(self.depth_scale_power);

        let width = self.cell_width;
        let pos_x = (
            // the neighbour's inner edge aligns with the center's outer edge
            width
            // which layer (how far out) this cell is in
            + width * (offset_from_center_abs - 1.0)
            // pulled back in by the distance-shaped overlap
            - width * self.relative_overlap * depth_factor
        ) * left_or_right;

        CellTransform {
            position: [pos_x, 0.0, self.depth_step * depth_factor],
            scale,
            rotation_y: -self.pan_step * offset_from_center,
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_cell_is_identity() {
        let layout = CoverFlowLayout::default();
        assert_eq!(layout.layout(0.0, 0.0), CellTransform::IDENTITY);
    }

    #[test]
    fn layout_is_horizontally_symmetric() {
        let layout = CoverFlowLayout::default();
        let right = layout.layout(1.5, 1.5);
        let left = layout.layout(-1.5, 1.5);

        assert_eq!(right.position[0], -left.position[0]);
        assert_eq!(right.position[2], left.position[2]);
        assert_eq!(right.scale, left.scale);
        assert_eq!(right.rotation_y, -left.rotation_y);
    }

    #[test]
    fn neighbour_scale_transition() {
        let layout = CoverFlowLayout::default();
        let half = layout.layout(0.5, 0.5);
        assert!(half.scale < 1.0 && half.scale > layout.neighbour_scale);

        let far = layout.layout(2.0, 2.0);
        assert_eq!(far.scale, layout.neighbour_scale);
    }

    #[test]
    fn depth_increases_with_distance() {
        let layout = CoverFlowLayout::default();
        let near = layout.layout(1.0, 1.0);
        let far = layout.layout(2.0, 2.0);
        assert!(far.position[2] > near.position[2]);
    }
}
