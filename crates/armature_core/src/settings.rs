//! Rig Settings & Playback Configuration
//!
//! Tunables shared by picking, manipulation and keyframe playback.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use armature_core::settings::{ArmatureSettings, PlaybackSettings, PlaybackStart};
//!
//! // Defaults: 0.1 pick radius, one second per keyframe segment
//! let settings = ArmatureSettings::default();
//!
//! // Half-speed playback that blends in from whatever pose the rig is in
//! let settings = ArmatureSettings::default().with_playback(PlaybackSettings {
//!     segment_duration_ms: 2000.0,
//!     start: PlaybackStart::CurrentPose,
//! });
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PlaybackStart
// ---------------------------------------------------------------------------

/// Where the first playback segment begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaybackStart {
    /// Snap the rig to keyframe 0 and animate towards keyframe 1.
    ///
    /// With a single recorded keyframe this behaves like [`CurrentPose`](Self::CurrentPose).
    #[default]
    FirstKeyframe,

    /// Blend from the rig's current pose towards keyframe 0.
    CurrentPose,
}

// ---------------------------------------------------------------------------
// PlaybackSettings
// ---------------------------------------------------------------------------

/// Keyframe playback timing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackSettings {
    /// Duration of every segment between two consecutive poses, in milliseconds.
    ///
    /// Non-positive values make each segment complete on the next tick.
    pub segment_duration_ms: f64,
    /// Starting pose of the first segment.
    pub start: PlaybackStart,
}

impl PlaybackSettings {
    pub const DEFAULT_SEGMENT_DURATION_MS: f64 = 1000.0;
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            segment_duration_ms: Self::DEFAULT_SEGMENT_DURATION_MS,
            start: PlaybackStart::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ArmatureSettings
// ---------------------------------------------------------------------------

/// Top-level configuration for a rig editing session.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArmatureSettings {
    /// Radius of the cylinder each bone occupies for picking.
    pub pick_radius: f32,
    /// Smallest ray parameter accepted as "in front of" the ray origin.
    pub pick_epsilon: f32,
    /// Axes and drag vectors shorter than this are ignored.
    pub degenerate_epsilon: f32,
    /// Keyframe playback timing.
    pub playback: PlaybackSettings,
}

impl ArmatureSettings {
    pub const DEFAULT_PICK_RADIUS: f32 = 0.1;
    pub const DEFAULT_PICK_EPSILON: f32 = 1e-5;
    pub const DEFAULT_DEGENERATE_EPSILON: f32 = 1e-6;

    #[inline]
    #[must_use]
    pub fn with_pick_radius(mut self, radius: f32) -> Self {
        self.pick_radius = radius;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_segment_duration_ms(mut self, duration_ms: f64) -> Self {
        self.playback.segment_duration_ms = duration_ms;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_playback(mut self, playback: PlaybackSettings) -> Self {
        self.playback = playback;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_degenerate_epsilon(mut self, epsilon: f32) -> Self {
        self.degenerate_epsilon = epsilon;
        self
    }
}

impl Default for ArmatureSettings {
    fn default() -> Self {
        Self {
            pick_radius: Self::DEFAULT_PICK_RADIUS,
            pick_epsilon: Self::DEFAULT_PICK_EPSILON,
            degenerate_epsilon: Self::DEFAULT_DEGENERATE_EPSILON,
            playback: PlaybackSettings::default(),
        }
    }
}
