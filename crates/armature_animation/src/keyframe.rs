use armature_core::errors::{ArmatureError, Result};
use armature_rig::Rig;
use glam::Quat;

/// A full-rig pose: one local rotation per bone, in bone index order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    rotations: Vec<Quat>,
}

impl Keyframe {
    /// Snapshots the current local rotations of `rig`.
    #[must_use]
    pub fn capture(rig: &Rig) -> Self {
        Self {
            rotations: rig.local_rotations(),
        }
    }

    /// Wraps an externally built pose, checking it against the bone count.
    pub fn from_rotations(rotations: Vec<Quat>, bone_count: usize) -> Result<Self> {
        if rotations.len() != bone_count {
            return Err(ArmatureError::KeyframeLength {
                expected: bone_count,
                actual: rotations.len(),
            });
        }
        Ok(Self { rotations })
    }

    #[inline]
    #[must_use]
    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

/// Recorded poses in recording order, which is also playback order.
#[derive(Debug, Clone, Default)]
pub struct KeyframeList {
    keyframes: Vec<Keyframe>,
}

impl KeyframeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the rig's current pose and returns its index.
    pub fn record(&mut self, rig: &Rig) -> usize {
        self.push(Keyframe::capture(rig))
    }

    pub fn push(&mut self, keyframe: Keyframe) -> usize {
        self.keyframes.push(keyframe);
        let index = self.keyframes.len() - 1;
        log::debug!("Recorded keyframe {index}");
        index
    }

    pub fn get(&self, index: usize) -> Result<&Keyframe> {
        self.keyframes
            .get(index)
            .ok_or(ArmatureError::InvalidKeyframeIndex {
                index,
                count: self.keyframes.len(),
            })
    }

    /// Sets every bone of `rig` to the stored pose and re-propagates.
    pub fn restore(&self, index: usize, rig: &mut Rig) -> Result<()> {
        let keyframe = self.get(index)?;
        rig.set_local_rotations(keyframe.rotations())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keyframes.iter()
    }
}

impl<'a> IntoIterator for &'a KeyframeList {
    type Item = &'a Keyframe;
    type IntoIter = std::slice::Iter<'a, Keyframe>;

    fn into_iter(self) -> Self::IntoIter {
        self.keyframes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_rig::{BoneRecord, link_children};
    use glam::Vec3;

    fn rig() -> Rig {
        let mut records = vec![
            BoneRecord::new(None, Vec3::ZERO, Vec3::Y),
            BoneRecord::new(Some(0), Vec3::Y, Vec3::Y * 2.0),
        ];
        link_children(&mut records);
        Rig::from_records(&records).unwrap()
    }

    #[test]
    fn record_appends_in_order() {
        let mut rig = rig();
        let mut list = KeyframeList::new();
        assert_eq!(list.record(&rig), 0);
        rig.rotate(1, Vec3::X, 0.5).unwrap();
        assert_eq!(list.record(&rig), 1);
        assert_eq!(list.record(&rig), 2);

        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0).unwrap().rotations()[1], Quat::IDENTITY);
        assert_eq!(list.get(1).unwrap(), list.get(2).unwrap());
    }

    #[test]
    fn restore_out_of_range_leaves_rig_untouched() {
        let mut rig = rig();
        rig.rotate(1, Vec3::Z, 0.3).unwrap();
        let before = rig.local_rotations();

        let list = KeyframeList::new();
        let err = list.restore(0, &mut rig).unwrap_err();
        assert_eq!(err, ArmatureError::InvalidKeyframeIndex { index: 0, count: 0 });
        assert_eq!(rig.local_rotations(), before);
    }

    #[test]
    fn from_rotations_checks_bone_count() {
        let err = Keyframe::from_rotations(vec![Quat::IDENTITY], 3).unwrap_err();
        assert_eq!(err, ArmatureError::KeyframeLength { expected: 3, actual: 1 });
    }
}
