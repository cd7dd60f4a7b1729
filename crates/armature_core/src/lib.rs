//! Core types shared by every Armature crate.
//!
//! - [`errors`]: the [`ArmatureError`] taxonomy and `Result` alias
//! - [`settings`]: picking, manipulation and playback tunables
//! - [`ray`]: world-space rays and cursor unprojection

pub mod errors;
pub mod ray;
pub mod settings;

pub use errors::{ArmatureError, Result, TopologyError};
pub use ray::Ray;
pub use settings::{ArmatureSettings, PlaybackSettings, PlaybackStart};
