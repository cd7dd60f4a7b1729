//! Error Types
//!
//! This module defines the error types used throughout the rig.
//!
//! # Overview
//!
//! The main error type [`ArmatureError`] covers every failure the core can
//! report:
//! - Out-of-range bone or keyframe indices
//! - Playback requested with nothing recorded
//! - Loader data that does not describe a forest
//! - Editing requests issued while playback owns the rig
//!
//! Degenerate gestures (zero-length axes or drag vectors) are *not* errors:
//! the manipulation calls return `Ok(false)` and leave the rig untouched.
//!
//! # Usage
//!
//! ```rust,ignore
//! use armature_core::errors::{ArmatureError, Result};
//!
//! fn restore_first(editor: &mut PoseEditor) -> Result<()> {
//!     editor.restore(0)
//! }
//! ```

use thiserror::Error;

/// The main error type for the rig core.
///
/// Every variant is raised before any state is mutated, so a failed call
/// never leaves the rig half-updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArmatureError {
    // ========================================================================
    // Index Errors
    // ========================================================================
    /// A bone index outside `0..count`.
    #[error("Bone index out of range: {index} (bone count: {count})")]
    InvalidBoneIndex {
        /// The rejected index
        index: usize,
        /// Number of bones in the rig
        count: usize,
    },

    /// A keyframe index outside `0..count`.
    #[error("Keyframe index out of range: {index} (keyframe count: {count})")]
    InvalidKeyframeIndex {
        /// The rejected index
        index: usize,
        /// Number of recorded keyframes
        count: usize,
    },

    /// A pose whose length does not match the bone count.
    #[error("Pose length mismatch: expected {expected} rotations, got {actual}")]
    KeyframeLength {
        /// Bone count of the rig
        expected: usize,
        /// Length of the supplied pose
        actual: usize,
    },

    // ========================================================================
    // Playback Errors
    // ========================================================================
    /// Playback was requested before any keyframe was recorded.
    #[error("Cannot start playback: no keyframes recorded")]
    EmptyKeyframeList,

    /// An editing operation was requested while playback drives the rig.
    #[error("Rig is in playback mode; stop playback before editing")]
    PlaybackActive,

    // ========================================================================
    // Construction Errors
    // ========================================================================
    /// The loader supplied bone records that do not form a forest.
    #[error("Malformed bone topology: {0}")]
    MalformedTopology(#[from] TopologyError),
}

/// Why a set of bone records was rejected at rig construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("rig has no bones")]
    Empty,

    #[error("bone {bone} has parent {parent}, but only {count} bones exist")]
    ParentOutOfRange { bone: usize, parent: usize, count: usize },

    #[error("bone {bone} lists child {child}, but only {count} bones exist")]
    ChildOutOfRange { bone: usize, child: usize, count: usize },

    #[error("bone {bone} is its own parent")]
    SelfParent { bone: usize },

    #[error("bone {parent} lists child {child}, whose parent is {actual:?}")]
    ChildListMismatch {
        parent: usize,
        child: usize,
        actual: Option<usize>,
    },

    #[error("bone {child} names parent {parent}, which does not list it as a child")]
    MissingChild { parent: usize, child: usize },

    #[error("bone {parent} lists child {child} more than once")]
    DuplicateChild { parent: usize, child: usize },

    #[error("bone {bone} is part of a parent cycle")]
    Cycle { bone: usize },
}

/// Alias for `Result<T, ArmatureError>`.
pub type Result<T> = std::result::Result<T, ArmatureError>;
