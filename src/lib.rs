//! Armature: interactive skeletal posing and keyframe playback.
//!
//! The crate is split the way it is consumed:
//!
//! - `armature_core`: errors, settings and rays
//! - `armature_rig`: the bone hierarchy, forward kinematics, manipulation and picking
//! - `armature_animation`: keyframes and timed playback
//!
//! [`PoseEditor`] ties them together for a frontend; [`gesture`] converts
//! pointer drags into the world-space inputs manipulation expects.

pub mod editor;
pub mod gesture;

pub use armature_animation::{Keyframe, KeyframeList, Mode, Playback, slerp_shortest_arc};
pub use armature_core::{
    ArmatureError, ArmatureSettings, PlaybackSettings, PlaybackStart, Ray, Result, TopologyError,
};
pub use armature_rig::{Bone, BoneIndex, BoneRecord, PickHit, Picker, Rig, link_children};
pub use editor::{PoseEditor, Status};
pub use gesture::{ViewBasis, drag_rotation, drag_translation};
