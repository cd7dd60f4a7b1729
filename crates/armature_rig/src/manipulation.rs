//! Bone Manipulation
//!
//! Converts world-space gestures into edits of a single bone's local state.
//!
//! A gesture vector is carried into the bone's frame with the conjugate of the
//! bone's world rotation. World transforms in a rig are rigid, so this is the
//! exact direction-only inverse and never needs a general matrix inverse.
//!
//! Every call either:
//! - rejects a bad index with an error before touching anything,
//! - returns `Ok(false)` for a degenerate gesture (no mutation), or
//! - mutates the bone and re-propagates its subtree, returning `Ok(true)`.
//!
//! Ancestors and siblings of the edited bone are never written.

use armature_core::errors::{ArmatureError, Result};
use glam::{Quat, Vec3};

use crate::bone::BoneIndex;
use crate::rig::Rig;

impl Rig {
    /// Rotates `index` by `angle` radians about a world-space axis.
    pub fn rotate(&mut self, index: BoneIndex, axis_world: Vec3, angle: f32) -> Result<bool> {
        self.check_index(index)?;

        if axis_world.length() < self.degenerate_epsilon {
            log::debug!("rotate: ignoring degenerate axis {axis_world} for bone {index}");
            return Ok(false);
        }

        let axis_local = self.to_bone_frame(index, axis_world).normalize();
        self.apply_local_delta(index, Quat::from_axis_angle(axis_local, angle));
        Ok(true)
    }

    /// Moves the origin of `index` by a world-space offset.
    ///
    /// The offset is expressed in the bone's frame and then composed through
    /// the local rotation, so the bone's world origin moves by exactly
    /// `delta_world` and its orientation is unchanged.
    pub fn translate(&mut self, index: BoneIndex, delta_world: Vec3) -> Result<bool> {
        self.check_index(index)?;

        if delta_world.length() < self.degenerate_epsilon {
            log::debug!("translate: ignoring degenerate drag {delta_world} for bone {index}");
            return Ok(false);
        }

        let delta_local = self.to_bone_frame(index, delta_world);
        let bone = &mut self.bones[index];
        bone.local_translation += bone.local_rotation * delta_local;
        self.propagate_subtree(index);
        Ok(true)
    }

    /// Spins `index` about its own length axis.
    ///
    /// `negate_axis` flips the axis, reversing the roll direction.
    pub fn roll(&mut self, index: BoneIndex, angle: f32, negate_axis: bool) -> Result<bool> {
        self.check_index(index)?;

        let offset = self.bones[index].local_endpoint_offset;
        if offset.length() < self.degenerate_epsilon {
            log::debug!("roll: bone {index} has no length, ignoring");
            return Ok(false);
        }

        let axis = if negate_axis { -offset.normalize() } else { offset.normalize() };
        self.apply_local_delta(index, Quat::from_axis_angle(axis, angle));
        Ok(true)
    }

    /// Rotates `index` so that its tip points at `target_world`.
    ///
    /// Degenerate when the target sits on the joint, or when it already lies
    /// on the bone's line (either direction), since no unique axis exists.
    pub fn aim(&mut self, index: BoneIndex, target_world: Vec3) -> Result<bool> {
        self.check_index(index)?;

        let bone = &self.bones[index];
        let origin = bone.world_position();
        let to_tip = bone.world_endpoint() - origin;
        let to_target = target_world - origin;

        let axis = to_tip.cross(to_target);
        if to_tip.length() < self.degenerate_epsilon
            || to_target.length() < self.degenerate_epsilon
            || axis.length() < self.degenerate_epsilon
        {
            log::debug!("aim: no unique rotation for bone {index} towards {target_world}");
            return Ok(false);
        }

        let angle = axis.length().atan2(to_tip.dot(to_target));
        self.rotate(index, axis, angle)
    }

    /// Replaces every local rotation and re-propagates the whole rig.
    pub fn set_local_rotations(&mut self, rotations: &[Quat]) -> Result<()> {
        if rotations.len() != self.bones.len() {
            return Err(ArmatureError::KeyframeLength {
                expected: self.bones.len(),
                actual: rotations.len(),
            });
        }

        for (bone, &rotation) in self.bones.iter_mut().zip(rotations) {
            bone.local_rotation = rotation;
        }
        self.propagate_all();
        Ok(())
    }

    /// `local_rotation ← local_rotation · delta`, then propagate.
    fn apply_local_delta(&mut self, index: BoneIndex, delta: Quat) {
        let bone = &mut self.bones[index];
        bone.local_rotation = (bone.local_rotation * delta).normalize();
        self.propagate_subtree(index);
    }

    /// Direction-only world → bone-frame conversion.
    fn to_bone_frame(&self, index: BoneIndex, direction_world: Vec3) -> Vec3 {
        self.bones[index].world_rotation.conjugate() * direction_world
    }
}
