//! Bone hierarchy and forward kinematics.
//!
//! A [`Rig`] is built once from loader [`BoneRecord`]s and then edited in
//! place: gestures are applied through the manipulation methods on [`Rig`],
//! world transforms are kept current by [`propagation`], and a [`Picker`]
//! resolves screen rays to bone indices.

pub mod bone;
pub mod manipulation;
pub mod picking;
pub mod propagation;
pub mod rig;

pub use bone::{Bone, BoneIndex, BoneRecord, link_children};
pub use picking::{PickHit, Picker};
pub use rig::Rig;
