//! Pose Editor
//!
//! [`PoseEditor`] is the single entry point a rendering/UI frontend talks to.
//! It owns the [`Rig`], the recorded [`KeyframeList`] and the [`Playback`]
//! state machine, and is driven synchronously from the frontend's frame loop:
//!
//! ```rust,ignore
//! use armature::{ArmatureSettings, PoseEditor};
//!
//! let mut editor = PoseEditor::new(&records, ArmatureSettings::default())?;
//!
//! // Pointer input (edit mode)
//! if let Some(bone) = editor.pick_and_select(&ray) {
//!     editor.rotate_bone(bone, axis, angle)?;
//! }
//! editor.record()?;
//!
//! // Every frame
//! editor.tick(now_ms)?;
//! upload(editor.bone_translations(), editor.bone_rotations());
//! ```
//!
//! # Modes
//!
//! In [`Mode::Edit`] every operation is available. In [`Mode::Playing`] the
//! playback owns the pose: manipulation, recording and restoring are refused
//! with [`ArmatureError::PlaybackActive`]; queries, picking and selection stay
//! available.

use armature_animation::{KeyframeList, Mode, Playback};
use armature_core::errors::{ArmatureError, Result};
use armature_core::ray::Ray;
use armature_core::settings::ArmatureSettings;
use armature_rig::{BoneIndex, BoneRecord, PickHit, Picker, Rig};
use glam::Vec3;

/// Snapshot of the editor state for a status bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Edit { keyframes: usize },
    Playing { elapsed_ms: f64, total_ms: f64 },
}

pub struct PoseEditor {
    rig: Rig,
    keyframes: KeyframeList,
    playback: Playback,
    picker: Picker,
    settings: ArmatureSettings,
    selected: Option<BoneIndex>,
}

impl PoseEditor {
    /// Builds the rig from loader records.
    pub fn new(records: &[BoneRecord], settings: ArmatureSettings) -> Result<Self> {
        Ok(Self::from_rig(Rig::from_records(records)?, settings))
    }

    #[must_use]
    pub fn from_rig(mut rig: Rig, settings: ArmatureSettings) -> Self {
        rig.set_degenerate_epsilon(settings.degenerate_epsilon);
        Self {
            rig,
            keyframes: KeyframeList::new(),
            playback: Playback::new(settings.playback),
            picker: Picker::from_settings(&settings),
            settings,
            selected: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &KeyframeList {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ArmatureSettings {
        &self.settings
    }

    /// Applies new settings. Playback timing changes apply to the running
    /// segment from the next tick.
    pub fn set_settings(&mut self, settings: ArmatureSettings) {
        self.rig.set_degenerate_epsilon(settings.degenerate_epsilon);
        self.playback.set_settings(settings.playback);
        self.picker = Picker::from_settings(&settings);
        self.settings = settings;
    }

    #[inline]
    #[must_use]
    pub fn current_mode(&self) -> Mode {
        self.playback.mode()
    }

    #[inline]
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    #[must_use]
    pub fn status(&self, now_ms: f64) -> Status {
        match (self.playback.elapsed_ms(now_ms), self.playback.total_duration_ms()) {
            (Some(elapsed_ms), Some(total_ms)) => Status::Playing {
                elapsed_ms: elapsed_ms.min(total_ms),
                total_ms,
            },
            _ => Status::Edit {
                keyframes: self.keyframes.len(),
            },
        }
    }

    // ========================================================================
    // Rendering Queries
    // ========================================================================

    pub fn world_position(&self, index: BoneIndex) -> Result<Vec3> {
        self.rig.world_position(index)
    }

    pub fn world_endpoint(&self, index: BoneIndex) -> Result<Vec3> {
        self.rig.world_endpoint(index)
    }

    #[must_use]
    pub fn bone_translations(&self) -> Vec<f32> {
        self.rig.bone_translations()
    }

    #[must_use]
    pub fn bone_rotations(&self) -> Vec<f32> {
        self.rig.bone_rotations()
    }

    #[must_use]
    pub fn skinning_rotations(&self) -> Vec<f32> {
        self.rig.skinning_rotations()
    }

    #[must_use]
    pub fn bone_endpoints(&self) -> Vec<f32> {
        self.rig.bone_endpoints()
    }

    // ========================================================================
    // Manipulation
    // ========================================================================

    pub fn rotate_bone(&mut self, index: BoneIndex, axis_world: Vec3, angle: f32) -> Result<bool> {
        self.ensure_editing()?;
        self.rig.rotate(index, axis_world, angle)
    }

    pub fn translate_bone(&mut self, index: BoneIndex, delta_world: Vec3) -> Result<bool> {
        self.ensure_editing()?;
        self.rig.translate(index, delta_world)
    }

    pub fn roll_bone(&mut self, index: BoneIndex, angle: f32, negate_axis: bool) -> Result<bool> {
        self.ensure_editing()?;
        self.rig.roll(index, angle, negate_axis)
    }

    pub fn aim_bone(&mut self, index: BoneIndex, target_world: Vec3) -> Result<bool> {
        self.ensure_editing()?;
        self.rig.aim(index, target_world)
    }

    // ========================================================================
    // Picking & Selection
    // ========================================================================

    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<BoneIndex> {
        self.picker.pick(&self.rig, ray)
    }

    #[must_use]
    pub fn pick_hit(&self, ray: &Ray) -> Option<PickHit> {
        self.picker.pick_hit(&self.rig, ray)
    }

    /// Picks and makes the result the selection. A miss clears the selection.
    pub fn pick_and_select(&mut self, ray: &Ray) -> Option<BoneIndex> {
        self.selected = self.pick(ray);
        self.selected
    }

    pub fn select(&mut self, bone: Option<BoneIndex>) -> Result<()> {
        if let Some(index) = bone {
            self.rig.bone(index)?;
        }
        self.selected = bone;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<BoneIndex> {
        self.selected
    }

    // ========================================================================
    // Keyframes & Playback
    // ========================================================================

    /// Records the current pose; returns its keyframe index.
    pub fn record(&mut self) -> Result<usize> {
        self.ensure_editing()?;
        Ok(self.keyframes.record(&self.rig))
    }

    pub fn restore(&mut self, index: usize) -> Result<()> {
        self.ensure_editing()?;
        self.keyframes.restore(index, &mut self.rig)
    }

    pub fn start_playback(&mut self, now_ms: f64) -> Result<()> {
        self.playback.start(&mut self.rig, &self.keyframes, now_ms)
    }

    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    /// Starts playback from edit mode, stops it from playing mode.
    pub fn toggle_playback(&mut self, now_ms: f64) -> Result<Mode> {
        match self.playback.mode() {
            Mode::Edit => self.start_playback(now_ms)?,
            Mode::Playing => self.stop_playback(),
        }
        Ok(self.playback.mode())
    }

    /// Per-frame update. Returns the mode after the tick.
    pub fn tick(&mut self, now_ms: f64) -> Result<Mode> {
        self.playback.tick(&mut self.rig, &self.keyframes, now_ms)
    }

    /// Scene reset: stops playback, drops every keyframe and the selection,
    /// and returns the rig to its bind pose.
    pub fn reset(&mut self) {
        self.playback.stop();
        self.keyframes.clear();
        self.selected = None;
        self.rig.reset_to_bind_pose();
        log::info!("Editor reset to bind pose");
    }

    fn ensure_editing(&self) -> Result<()> {
        if self.playback.is_playing() {
            log::warn!("Edit request refused during playback");
            return Err(ArmatureError::PlaybackActive);
        }
        Ok(())
    }
}
