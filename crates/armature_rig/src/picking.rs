//! Ray picking against bone cylinders.
//!
//! Each bone is a capped cylinder of radius `R` from its world joint position
//! to its world tip. The ray is tested against the infinite cylinder around
//! the bone axis, and roots are kept only when they lie in front of the ray
//! origin and between the two end caps.

use armature_core::ray::Ray;
use armature_core::settings::ArmatureSettings;
use glam::Vec3;

use crate::bone::{Bone, BoneIndex};
use crate::rig::Rig;

/// The nearest bone hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub bone: BoneIndex,
    /// Ray parameter of the hit; the distance from the origin since the ray
    /// direction is unit length.
    pub distance: f32,
}

/// Bone picker configured with a cylinder radius and a near-origin guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Picker {
    pub radius: f32,
    pub epsilon: f32,
}

impl Default for Picker {
    fn default() -> Self {
        Self::from_settings(&ArmatureSettings::default())
    }
}

impl Picker {
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            epsilon: ArmatureSettings::DEFAULT_PICK_EPSILON,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ArmatureSettings) -> Self {
        Self {
            radius: settings.pick_radius,
            epsilon: settings.pick_epsilon,
        }
    }

    /// Index of the closest bone hit by `ray`, if any.
    #[must_use]
    pub fn pick(&self, rig: &Rig, ray: &Ray) -> Option<BoneIndex> {
        self.pick_hit(rig, ray).map(|hit| hit.bone)
    }

    /// Closest bone hit by `ray`. Equal distances resolve to the lower index.
    #[must_use]
    pub fn pick_hit(&self, rig: &Rig, ray: &Ray) -> Option<PickHit> {
        let mut closest: Option<PickHit> = None;

        for bone in rig.bones() {
            let Some(distance) = self.intersect_bone(bone, ray) else {
                continue;
            };
            if closest.is_none_or(|hit| distance < hit.distance) {
                closest = Some(PickHit {
                    bone: bone.id(),
                    distance,
                });
            }
        }

        closest
    }

    fn intersect_bone(&self, bone: &Bone, ray: &Ray) -> Option<f32> {
        self.intersect_segment(bone.world_position(), bone.world_endpoint(), ray)
    }

    /// Smallest valid ray parameter at which `ray` enters the capped cylinder
    /// around `start..end`.
    #[must_use]
    pub fn intersect_segment(&self, start: Vec3, end: Vec3, ray: &Ray) -> Option<f32> {
        let span = end - start;
        let length = span.length();
        if length <= f32::EPSILON {
            return None;
        }
        let axis = span / length;

        let origin_from_start = ray.origin - start;
        let dir_cross_axis = ray.direction.cross(axis);
        let offset_cross_axis = origin_from_start.cross(axis);

        let a = dir_cross_axis.length_squared();
        let b = 2.0 * dir_cross_axis.dot(offset_cross_axis);
        let c = offset_cross_axis.length_squared() - self.radius * self.radius;

        if a <= f32::EPSILON {
            return self.intersect_caps(start, axis, length, c, ray);
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = (-b - root) / (2.0 * a);
        let far = (-b + root) / (2.0 * a);

        [near, far].into_iter().find(|&t| {
            if t <= self.epsilon {
                return false;
            }
            let along = (ray.at(t) - start).dot(axis);
            (0.0..=length).contains(&along)
        })
    }

    /// Ray parallel to the axis: it can only enter through an end cap.
    fn intersect_caps(&self, start: Vec3, axis: Vec3, length: f32, c: f32, ray: &Ray) -> Option<f32> {
        // `c` is the squared distance to the axis minus R²; outside the tube the
        // ray never touches the cylinder.
        if c > 0.0 {
            return None;
        }

        let speed = ray.direction.dot(axis);
        let along_origin = (ray.origin - start).dot(axis);
        let to_start = -along_origin / speed;
        let to_end = (length - along_origin) / speed;

        let (enter, exit) = if to_start < to_end {
            (to_start, to_end)
        } else {
            (to_end, to_start)
        };

        [enter, exit].into_iter().find(|&t| t > self.epsilon)
    }
}

impl Rig {
    /// Picks with a default-configured [`Picker`] of the given radius.
    #[must_use]
    pub fn pick(&self, ray: &Ray, radius: f32) -> Option<BoneIndex> {
        Picker::new(radius).pick(self, ray)
    }
}
