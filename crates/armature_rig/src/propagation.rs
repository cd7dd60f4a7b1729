//! Transform Propagation
//!
//! Forward kinematics over the bone forest:
//!
//! ```text
//! world(b) = world(parent(b)) · T(local_translation(b)) · R(local_rotation(b))
//! world(root) = T(local_translation(root)) · R(local_rotation(root))
//! ```
//!
//! Propagation is rooted at the mutated bone and walks only its subtree, with
//! an explicit stack instead of recursion so deep chains cannot overflow.
//! Full-rig walks happen at construction, keyframe restore and playback.

use armature_core::errors::Result;
use glam::{Affine3A, Quat};

use crate::bone::BoneIndex;
use crate::rig::Rig;

impl Rig {
    /// Recomputes the world transform of `index` and of every descendant.
    pub fn propagate(&mut self, index: BoneIndex) -> Result<()> {
        self.check_index(index)?;
        self.propagate_subtree(index);
        Ok(())
    }

    /// Recomputes every world transform, root by root.
    pub fn propagate_all(&mut self) {
        for root in 0..self.roots.len() {
            let index = self.roots[root];
            self.propagate_subtree(index);
        }
    }

    /// World transform and rotation of the frame `index` is expressed in.
    fn parent_frame(&self, index: BoneIndex) -> (Affine3A, Quat) {
        match self.bones[index].parent {
            Some(parent) => {
                let parent = &self.bones[parent];
                (parent.world, parent.world_rotation)
            }
            None => (Affine3A::IDENTITY, Quat::IDENTITY),
        }
    }

    /// `index` must be in range.
    pub(crate) fn propagate_subtree(&mut self, index: BoneIndex) {
        let (parent_world, parent_rotation) = self.parent_frame(index);

        // Work stack: (bone, parent world matrix, parent world rotation)
        let mut stack: Vec<(BoneIndex, Affine3A, Quat)> = Vec::with_capacity(32);
        stack.push((index, parent_world, parent_rotation));

        while let Some((index, parent_world, parent_rotation)) = stack.pop() {
            let bone = &mut self.bones[index];
            bone.world = parent_world * bone.local_matrix();
            bone.world_rotation = (parent_rotation * bone.local_rotation).normalize();

            let world = bone.world;
            let rotation = bone.world_rotation;
            // Reverse so children are visited in index order.
            for &child in bone.children.iter().rev() {
                stack.push((child, world, rotation));
            }
        }
    }
}
