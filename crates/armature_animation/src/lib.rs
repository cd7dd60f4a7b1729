//! Pose keyframes and timed playback.
//!
//! - [`KeyframeList`]: full-rig pose snapshots in recording order
//! - [`Playback`]: the edit/playing state machine that blends between them
//! - [`values`]: shortest-arc quaternion interpolation

pub mod keyframe;
pub mod playback;
pub mod values;

pub use keyframe::{Keyframe, KeyframeList};
pub use playback::{Mode, Playback};
pub use values::{Interpolatable, interpolate_pose, slerp_shortest_arc};
