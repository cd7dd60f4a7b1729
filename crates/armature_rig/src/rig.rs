use armature_core::errors::{ArmatureError, Result, TopologyError};
use armature_core::settings::ArmatureSettings;
use glam::{Affine3A, Quat, Vec3};

use crate::bone::{Bone, BoneIndex, BoneRecord};

/// An index-addressed forest of bones.
///
/// # Design
///
/// - Parent and child links are plain indices into `bones`, never references.
/// - Forest-ness (in-range links, single parent, no cycles) is validated once
///   in [`Rig::from_records`]; every later walk relies on it.
/// - World transforms are cached per bone and rewritten only by propagation,
///   which every mutating method runs before returning.
#[derive(Debug, Clone)]
pub struct Rig {
    pub(crate) bones: Vec<Bone>,
    pub(crate) roots: Vec<BoneIndex>,
    pub(crate) degenerate_epsilon: f32,
}

impl Rig {
    /// Builds a rig from loader records and propagates the bind pose.
    pub fn from_records(records: &[BoneRecord]) -> Result<Self> {
        validate_topology(records)?;

        let bones: Vec<Bone> = records
            .iter()
            .enumerate()
            .map(|(id, record)| {
                let parent_bind = record.parent.map(|p| records[p].bind_position);
                Bone::from_record(id, record, parent_bind)
            })
            .collect();

        let roots = bones
            .iter()
            .filter(|bone| bone.is_root())
            .map(Bone::id)
            .collect::<Vec<_>>();

        let mut rig = Self {
            bones,
            roots,
            degenerate_epsilon: ArmatureSettings::DEFAULT_DEGENERATE_EPSILON,
        };
        rig.propagate_all();

        log::info!(
            "Rig built: {} bones, {} root(s)",
            rig.bones.len(),
            rig.roots.len()
        );
        Ok(rig)
    }

    /// Sets the length below which manipulation axes and drag vectors are ignored.
    pub fn set_degenerate_epsilon(&mut self, epsilon: f32) {
        self.degenerate_epsilon = epsilon;
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[BoneIndex] {
        &self.roots
    }

    pub fn bone(&self, index: BoneIndex) -> Result<&Bone> {
        self.bones.get(index).ok_or(ArmatureError::InvalidBoneIndex {
            index,
            count: self.bones.len(),
        })
    }

    pub(crate) fn check_index(&self, index: BoneIndex) -> Result<()> {
        self.bone(index).map(|_| ())
    }

    pub fn parent(&self, index: BoneIndex) -> Result<Option<BoneIndex>> {
        self.bone(index).map(Bone::parent)
    }

    pub fn children(&self, index: BoneIndex) -> Result<&[BoneIndex]> {
        self.bone(index).map(Bone::children)
    }

    pub fn world(&self, index: BoneIndex) -> Result<Affine3A> {
        self.bone(index).map(|bone| bone.world)
    }

    pub fn world_position(&self, index: BoneIndex) -> Result<Vec3> {
        self.bone(index).map(Bone::world_position)
    }

    pub fn world_rotation(&self, index: BoneIndex) -> Result<Quat> {
        self.bone(index).map(Bone::world_rotation)
    }

    pub fn world_endpoint(&self, index: BoneIndex) -> Result<Vec3> {
        self.bone(index).map(Bone::world_endpoint)
    }

    pub fn local_rotation(&self, index: BoneIndex) -> Result<Quat> {
        self.bone(index).map(Bone::local_rotation)
    }

    pub fn local_translation(&self, index: BoneIndex) -> Result<Vec3> {
        self.bone(index).map(Bone::local_translation)
    }

    pub fn bone_length(&self, index: BoneIndex) -> Result<f32> {
        self.bone(index).map(Bone::length)
    }

    /// Current local rotation of every bone, in index order.
    #[must_use]
    pub fn local_rotations(&self) -> Vec<Quat> {
        self.bones.iter().map(Bone::local_rotation).collect()
    }

    /// Returns every bone to its loaded pose.
    pub fn reset_to_bind_pose(&mut self) {
        for bone in &mut self.bones {
            bone.local_rotation = Quat::IDENTITY;
            bone.local_translation = bone.bind_translation;
        }
        self.propagate_all();
    }

    // ========================================================================
    // Shader Upload
    // ========================================================================

    /// World joint positions, 3 floats per bone.
    #[must_use]
    pub fn bone_translations(&self) -> Vec<f32> {
        let positions: Vec<Vec3> = self.bones.iter().map(Bone::world_position).collect();
        bytemuck::cast_slice(&positions).to_vec()
    }

    /// World rotations, 4 floats (xyzw) per bone.
    #[must_use]
    pub fn bone_rotations(&self) -> Vec<f32> {
        let rotations: Vec<Quat> = self.bones.iter().map(Bone::world_rotation).collect();
        bytemuck::cast_slice(&rotations).to_vec()
    }

    /// World rotation composed with the bind rotation, 4 floats (xyzw) per bone.
    ///
    /// This is what a joint-space skinning shader needs: vertices stored in
    /// each joint's bind frame are carried to world space by this rotation
    /// followed by the bone's world translation.
    #[must_use]
    pub fn skinning_rotations(&self) -> Vec<f32> {
        let rotations: Vec<Quat> = self
            .bones
            .iter()
            .map(|bone| (bone.world_rotation * bone.bind_rotation).normalize())
            .collect();
        bytemuck::cast_slice(&rotations).to_vec()
    }

    /// World tip positions, 3 floats per bone.
    #[must_use]
    pub fn bone_endpoints(&self) -> Vec<f32> {
        let endpoints: Vec<Vec3> = self.bones.iter().map(Bone::world_endpoint).collect();
        bytemuck::cast_slice(&endpoints).to_vec()
    }
}

/// Checks that the records describe a forest with consistent parent/child links.
fn validate_topology(records: &[BoneRecord]) -> std::result::Result<(), TopologyError> {
    let count = records.len();
    if count == 0 {
        return Err(TopologyError::Empty);
    }

    for (bone, record) in records.iter().enumerate() {
        if let Some(parent) = record.parent {
            if parent >= count {
                return Err(TopologyError::ParentOutOfRange { bone, parent, count });
            }
            if parent == bone {
                return Err(TopologyError::SelfParent { bone });
            }
            if !records[parent].children.contains(&bone) {
                return Err(TopologyError::MissingChild { parent, child: bone });
            }
        }

        for (position, &child) in record.children.iter().enumerate() {
            if child >= count {
                return Err(TopologyError::ChildOutOfRange { bone, child, count });
            }
            if record.children[..position].contains(&child) {
                return Err(TopologyError::DuplicateChild { parent: bone, child });
            }
            let actual = records[child].parent;
            if actual != Some(bone) {
                return Err(TopologyError::ChildListMismatch {
                    parent: bone,
                    child,
                    actual,
                });
            }
        }
    }

    // Links are consistent, so every bone has at most one parent. Any bone not
    // reachable from a root therefore sits on a parent cycle.
    let mut visited = vec![false; count];
    let mut stack: Vec<BoneIndex> = (0..count).filter(|&i| records[i].parent.is_none()).collect();
    while let Some(index) = stack.pop() {
        visited[index] = true;
        stack.extend(records[index].children.iter().copied());
    }

    match visited.iter().position(|&seen| !seen) {
        Some(bone) => Err(TopologyError::Cycle { bone }),
        None => Ok(()),
    }
}
