//! Screen-drag to world-gesture helpers.
//!
//! Frontends report pointer motion in pixels; the manipulation API expects
//! world-space axes and offsets. These helpers bridge the two given the
//! camera's world-space basis.

use glam::Vec3;

/// World-space orientation of the viewing camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    /// Direction the camera looks along
    pub forward: Vec3,
    /// Screen +X
    pub right: Vec3,
    /// Screen +Y
    pub up: Vec3,
}

impl ViewBasis {
    /// Completes a basis from a view direction and an approximate up vector.
    #[must_use]
    pub fn from_forward_up(forward: Vec3, up: Vec3) -> Option<Self> {
        let forward = forward.try_normalize()?;
        let right = forward.cross(up).try_normalize()?;
        Some(Self {
            forward,
            right,
            up: right.cross(forward),
        })
    }

    /// World direction of a pixel drag (`dy` grows downwards, as on screen).
    #[inline]
    #[must_use]
    pub fn drag_direction(&self, dx: f32, dy: f32) -> Vec3 {
        self.right * dx - self.up * dy
    }
}

/// Axis and angle that make the camera-facing side of a bone follow the drag.
///
/// `None` when the pointer did not move.
#[must_use]
pub fn drag_rotation(view: &ViewBasis, dx: f32, dy: f32, radians_per_pixel: f32) -> Option<(Vec3, f32)> {
    let drag = view.drag_direction(dx, dy);
    let pixels = dx.hypot(dy);
    let axis = drag.cross(view.forward).try_normalize()?;
    Some((axis, pixels * radians_per_pixel))
}

/// World offset for a pixel drag in the view plane.
#[must_use]
pub fn drag_translation(view: &ViewBasis, dx: f32, dy: f32, units_per_pixel: f32) -> Vec3 {
    view.drag_direction(dx, dy) * units_per_pixel
}
