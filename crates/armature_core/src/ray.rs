use glam::{Mat4, Vec2, Vec3};

/// A half-line in world space. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalizing `direction`.
    ///
    /// Returns `None` when `direction` has no usable length.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Unprojects a cursor position through an inverse view-projection matrix.
    ///
    /// `ndc` is the cursor in normalized device coordinates (`[-1, 1]` on both
    /// axes, +Y up). The ray starts on the near plane and points towards the
    /// far plane, so it works for both `[0, 1]` and `[-1, 1]` depth ranges.
    #[must_use]
    pub fn from_screen(ndc: Vec2, inverse_view_projection: &Mat4) -> Option<Self> {
        let near = inverse_view_projection.project_point3(ndc.extend(0.0));
        let far = inverse_view_projection.project_point3(ndc.extend(1.0));
        Self::new(near, far - near)
    }

    /// Converts a pixel position to normalized device coordinates.
    #[must_use]
    pub fn pixel_to_ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
        Vec2::new(
            2.0 * pixel.x / viewport.x - 1.0,
            1.0 - 2.0 * pixel.y / viewport.y,
        )
    }
}
