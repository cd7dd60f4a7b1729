use glam::{Affine3A, Quat, Vec3};
use smallvec::SmallVec;

/// Dense bone index. Stable for the lifetime of a [`Rig`](crate::Rig) and shared
/// by picking results, keyframes and the flattened shader arrays.
pub type BoneIndex = usize;

/// Child index list. Most bones have a handful of children at most.
pub type ChildList = SmallVec<[BoneIndex; 4]>;

/// Bind-pose description of a single bone, as produced by a scene loader.
///
/// All positions are world-space at bind time.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneRecord {
    /// Parent index (`None` for root bones)
    pub parent: Option<BoneIndex>,
    /// Indices of the bones that name this one as their parent
    pub children: Vec<BoneIndex>,
    /// Joint position
    pub bind_position: Vec3,
    /// Tip position
    pub bind_endpoint: Vec3,
    /// Joint orientation, used only to express skinning rotations
    pub bind_rotation: Quat,
}

impl BoneRecord {
    #[must_use]
    pub fn new(parent: Option<BoneIndex>, bind_position: Vec3, bind_endpoint: Vec3) -> Self {
        Self {
            parent,
            children: Vec::new(),
            bind_position,
            bind_endpoint,
            bind_rotation: Quat::IDENTITY,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = BoneIndex>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_bind_rotation(mut self, rotation: Quat) -> Self {
        self.bind_rotation = rotation;
        self
    }
}

/// Rebuilds every record's child list from the parent indices.
///
/// For loaders that only store parent links. Out-of-range parents are left
/// for [`Rig::from_records`](crate::Rig::from_records) to reject.
pub fn link_children(records: &mut [BoneRecord]) {
    for record in records.iter_mut() {
        record.children.clear();
    }
    for index in 0..records.len() {
        if let Some(parent) = records[index].parent
            && let Some(parent_record) = records.get_mut(parent)
        {
            parent_record.children.push(index);
        }
    }
}

/// A node of the rig.
///
/// Topology and bind data are fixed at construction. The local state
/// (`local_rotation`, `local_translation`) is only mutated through [`Rig`](crate::Rig)
/// methods, which re-propagate the affected subtree in the same call, so the
/// cached world transform is never stale when read.
#[derive(Debug, Clone)]
pub struct Bone {
    pub(crate) id: BoneIndex,
    pub(crate) parent: Option<BoneIndex>,
    pub(crate) children: ChildList,

    // === Bind Data ===
    pub(crate) bind_position: Vec3,
    pub(crate) bind_rotation: Quat,
    pub(crate) bind_translation: Vec3,
    pub(crate) local_endpoint_offset: Vec3,

    // === Local State ===
    pub(crate) local_rotation: Quat,
    pub(crate) local_translation: Vec3,

    // === Derived (written by propagation only) ===
    pub(crate) world: Affine3A,
    pub(crate) world_rotation: Quat,
}

impl Bone {
    pub(crate) fn from_record(id: BoneIndex, record: &BoneRecord, parent_bind: Option<Vec3>) -> Self {
        let bind_translation = match parent_bind {
            Some(parent_position) => record.bind_position - parent_position,
            None => record.bind_position,
        };

        Self {
            id,
            parent: record.parent,
            children: record.children.iter().copied().collect(),
            bind_position: record.bind_position,
            bind_rotation: record.bind_rotation,
            bind_translation,
            local_endpoint_offset: record.bind_endpoint - record.bind_position,
            local_rotation: Quat::IDENTITY,
            local_translation: bind_translation,
            world: Affine3A::IDENTITY,
            world_rotation: Quat::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> BoneIndex {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<BoneIndex> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[BoneIndex] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    #[must_use]
    pub fn bind_position(&self) -> Vec3 {
        self.bind_position
    }

    #[inline]
    #[must_use]
    pub fn bind_rotation(&self) -> Quat {
        self.bind_rotation
    }

    /// Tip position in the bone's own frame.
    #[inline]
    #[must_use]
    pub fn local_endpoint_offset(&self) -> Vec3 {
        self.local_endpoint_offset
    }

    /// Rotation relative to the parent frame. Identity at bind pose.
    #[inline]
    #[must_use]
    pub fn local_rotation(&self) -> Quat {
        self.local_rotation
    }

    /// Offset from the parent's origin, in the parent frame.
    #[inline]
    #[must_use]
    pub fn local_translation(&self) -> Vec3 {
        self.local_translation
    }

    /// `T(local_translation) · R(local_rotation)`.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.local_rotation, self.local_translation)
    }

    #[inline]
    #[must_use]
    pub fn world(&self) -> &Affine3A {
        &self.world
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world.translation.into()
    }

    #[inline]
    #[must_use]
    pub fn world_rotation(&self) -> Quat {
        self.world_rotation
    }

    /// The tip, transformed as a point by the world transform.
    #[inline]
    #[must_use]
    pub fn world_endpoint(&self) -> Vec3 {
        self.world.transform_point3(self.local_endpoint_offset)
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.local_endpoint_offset.length()
    }
}
