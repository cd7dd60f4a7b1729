//! Keyframe playback state machine.
//!
//! ```text
//!            start (keyframes non-empty)
//!   Edit ─────────────────────────────────▶ Playing
//!    ▲                                        │ tick: blend segment, advance
//!    └──────── last segment done / stop ──────┘
//! ```
//!
//! Every segment lasts `segment_duration_ms` and blends each bone's local
//! rotation from the pose at segment start towards the target keyframe with
//! shortest-arc slerp. Time is supplied by the caller on every tick; nothing
//! here reads a clock.

use armature_core::errors::{ArmatureError, Result};
use armature_core::settings::{PlaybackSettings, PlaybackStart};
use armature_rig::Rig;
use glam::Quat;

use crate::keyframe::KeyframeList;
use crate::values::interpolate_pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The rig accepts manipulation and recording.
    #[default]
    Edit,
    /// Playback drives the rig.
    Playing,
}

/// Bookkeeping for the segment being played.
#[derive(Debug, Clone)]
struct Segment {
    target: usize,
    start_rotations: Vec<Quat>,
    start_time_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Playback {
    settings: PlaybackSettings,
    segment: Option<Segment>,

    // Whole-run bookkeeping for status queries.
    started_at_ms: f64,
    first_target: usize,
    keyframe_count: usize,

    // Scratch pose reused across ticks.
    blended: Vec<Quat>,
}

impl Playback {
    #[must_use]
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// A new segment duration applies to the running segment from the next
    /// tick; the segment's start time is kept.
    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings;
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.segment.is_some() {
            Mode::Playing
        } else {
            Mode::Edit
        }
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.segment.is_some()
    }

    /// Index of the keyframe the current segment moves towards.
    #[must_use]
    pub fn segment_target(&self) -> Option<usize> {
        self.segment.as_ref().map(|segment| segment.target)
    }

    /// Milliseconds since playback started, `None` in edit mode.
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        self.is_playing().then(|| (now_ms - self.started_at_ms).max(0.0))
    }

    /// Length of the whole run, `None` in edit mode.
    #[must_use]
    pub fn total_duration_ms(&self) -> Option<f64> {
        self.is_playing().then(|| {
            let segments = self.keyframe_count - self.first_target;
            segments as f64 * self.settings.segment_duration_ms.max(0.0)
        })
    }

    /// Enters [`Mode::Playing`].
    ///
    /// Refused with [`ArmatureError::EmptyKeyframeList`] when nothing has been
    /// recorded, and with [`ArmatureError::KeyframeLength`] when a keyframe
    /// does not hold one rotation per bone of `rig`. A refused start leaves the
    /// mode and the rig unchanged. Restarting while already playing begins a
    /// fresh run.
    pub fn start(&mut self, rig: &mut Rig, keyframes: &KeyframeList, now_ms: f64) -> Result<()> {
        if keyframes.is_empty() {
            log::warn!("Playback refused: no keyframes recorded");
            return Err(ArmatureError::EmptyKeyframeList);
        }
        if let Some(keyframe) = keyframes.iter().find(|keyframe| keyframe.len() != rig.len()) {
            log::warn!("Playback refused: keyframe does not match the rig's bone count");
            return Err(ArmatureError::KeyframeLength {
                expected: rig.len(),
                actual: keyframe.len(),
            });
        }

        let snap_to_first =
            self.settings.start == PlaybackStart::FirstKeyframe && keyframes.len() >= 2;

        let target = if snap_to_first {
            keyframes.restore(0, rig)?;
            1
        } else {
            0
        };

        self.segment = Some(Segment {
            target,
            start_rotations: rig.local_rotations(),
            start_time_ms: now_ms,
        });
        self.started_at_ms = now_ms;
        self.first_target = target;
        self.keyframe_count = keyframes.len();

        log::info!(
            "Playback started: {} keyframe(s), first segment targets {target}",
            keyframes.len()
        );
        Ok(())
    }

    /// Leaves playback immediately; the rig keeps its current pose.
    pub fn stop(&mut self) {
        if self.segment.take().is_some() {
            log::info!("Playback stopped");
        }
    }

    /// Advances playback to `now_ms` and poses the rig. Returns the mode after
    /// the tick; a no-op in edit mode.
    ///
    /// An error (the keyframe list shrank or changed shape since `start`)
    /// ends playback, leaving the rig at its last applied pose.
    pub fn tick(&mut self, rig: &mut Rig, keyframes: &KeyframeList, now_ms: f64) -> Result<Mode> {
        let result = self.advance(rig, keyframes, now_ms);
        if result.is_err() {
            log::warn!("Playback aborted");
            self.segment = None;
        }
        result
    }

    fn advance(&mut self, rig: &mut Rig, keyframes: &KeyframeList, now_ms: f64) -> Result<Mode> {
        let Some(segment) = self.segment.as_mut() else {
            return Ok(Mode::Edit);
        };

        let duration = self.settings.segment_duration_ms;
        let delta = if duration > 0.0 {
            ((now_ms - segment.start_time_ms) / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let target = keyframes.get(segment.target)?;
        if target.len() != segment.start_rotations.len() {
            return Err(ArmatureError::KeyframeLength {
                expected: segment.start_rotations.len(),
                actual: target.len(),
            });
        }
        interpolate_pose(
            &segment.start_rotations,
            target.rotations(),
            delta as f32,
            &mut self.blended,
        );
        rig.set_local_rotations(&self.blended)?;

        if delta < 1.0 {
            return Ok(Mode::Playing);
        }

        segment.target += 1;
        if segment.target < keyframes.len() {
            log::debug!("Playback segment complete, next target {}", segment.target);
            segment.start_rotations.clear();
            segment.start_rotations.extend_from_slice(&self.blended);
            segment.start_time_ms = now_ms;
            Ok(Mode::Playing)
        } else {
            log::info!("Playback finished after keyframe {}", segment.target - 1);
            self.segment = None;
            Ok(Mode::Edit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;
    use armature_rig::{BoneRecord, link_children};
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn rig() -> Rig {
        let mut records = vec![
            BoneRecord::new(None, Vec3::ZERO, Vec3::Y),
            BoneRecord::new(Some(0), Vec3::Y, Vec3::Y * 2.0),
        ];
        link_children(&mut records);
        Rig::from_records(&records).unwrap()
    }

    #[test]
    fn start_without_keyframes_is_refused() {
        let mut rig = rig();
        let mut playback = Playback::default();
        let err = playback.start(&mut rig, &KeyframeList::new(), 0.0).unwrap_err();
        assert_eq!(err, ArmatureError::EmptyKeyframeList);
        assert_eq!(playback.mode(), Mode::Edit);
    }

    #[test]
    fn tick_in_edit_mode_is_a_no_op() {
        let mut rig = rig();
        rig.rotate(1, Vec3::X, 0.4).unwrap();
        let before = rig.local_rotations();

        let mut playback = Playback::default();
        assert_eq!(playback.tick(&mut rig, &KeyframeList::new(), 500.0).unwrap(), Mode::Edit);
        assert_eq!(rig.local_rotations(), before);
    }

    #[test]
    fn current_pose_start_blends_towards_first_keyframe() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        keyframes.record(&rig);
        rig.rotate(1, Vec3::X, FRAC_PI_2).unwrap();
        let posed = rig.local_rotation(1).unwrap();

        let mut playback = Playback::new(PlaybackSettings {
            segment_duration_ms: 1000.0,
            start: PlaybackStart::CurrentPose,
        });
        playback.start(&mut rig, &keyframes, 0.0).unwrap();
        assert_eq!(playback.segment_target(), Some(0));

        playback.tick(&mut rig, &keyframes, 500.0).unwrap();
        let expected = crate::values::slerp_shortest_arc(posed, Quat::IDENTITY, 0.5);
        assert_eq!(rig.local_rotation(1).unwrap(), expected);

        assert_eq!(playback.tick(&mut rig, &keyframes, 1000.0).unwrap(), Mode::Edit);
        assert_eq!(rig.local_rotation(1).unwrap(), Quat::IDENTITY);
    }

    #[test]
    fn zero_duration_completes_each_segment_per_tick() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        keyframes.record(&rig);
        rig.rotate(1, Vec3::Z, 0.5).unwrap();
        keyframes.record(&rig);
        rig.rotate(1, Vec3::Z, 0.5).unwrap();
        keyframes.record(&rig);

        let mut playback = Playback::new(PlaybackSettings {
            segment_duration_ms: 0.0,
            start: PlaybackStart::FirstKeyframe,
        });
        playback.start(&mut rig, &keyframes, 0.0).unwrap();
        assert_eq!(playback.tick(&mut rig, &keyframes, 0.0).unwrap(), Mode::Playing);
        assert_eq!(playback.segment_target(), Some(2));
        assert_eq!(playback.tick(&mut rig, &keyframes, 0.0).unwrap(), Mode::Edit);
        assert_eq!(rig.local_rotations(), keyframes.get(2).unwrap().rotations());
    }

    #[test]
    fn stop_keeps_current_pose() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        keyframes.record(&rig);
        rig.rotate(1, Vec3::X, 1.0).unwrap();
        keyframes.record(&rig);

        let mut playback = Playback::default();
        playback.start(&mut rig, &keyframes, 0.0).unwrap();
        playback.tick(&mut rig, &keyframes, 250.0).unwrap();
        let mid = rig.local_rotations();

        playback.stop();
        assert_eq!(playback.mode(), Mode::Edit);
        assert_eq!(rig.local_rotations(), mid);
        assert!(playback.elapsed_ms(300.0).is_none());
    }

    #[test]
    fn mismatched_keyframe_is_refused_at_start() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        keyframes.record(&rig);
        keyframes.push(Keyframe::from_rotations(vec![Quat::IDENTITY; 3], 3).unwrap());
        rig.rotate(1, Vec3::X, 0.7).unwrap();
        let before = rig.local_rotations();

        let mut playback = Playback::default();
        let err = playback.start(&mut rig, &keyframes, 0.0).unwrap_err();
        assert_eq!(err, ArmatureError::KeyframeLength { expected: 2, actual: 3 });
        assert_eq!(playback.mode(), Mode::Edit);
        assert_eq!(rig.local_rotations(), before);

        assert_eq!(playback.tick(&mut rig, &keyframes, 500.0).unwrap(), Mode::Edit);
        assert_eq!(rig.local_rotations(), before);
    }

    #[test]
    fn tick_error_ends_playback() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        keyframes.record(&rig);
        keyframes.record(&rig);

        let mut playback = Playback::default();
        playback.start(&mut rig, &keyframes, 0.0).unwrap();
        keyframes.clear();

        let err = playback.tick(&mut rig, &keyframes, 500.0).unwrap_err();
        assert_eq!(err, ArmatureError::InvalidKeyframeIndex { index: 1, count: 0 });
        assert_eq!(playback.mode(), Mode::Edit);
    }

    #[test]
    fn duration_change_applies_to_running_segment() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        keyframes.record(&rig);
        rig.rotate(1, Vec3::X, 1.0).unwrap();
        keyframes.record(&rig);

        let mut playback = Playback::default();
        playback.start(&mut rig, &keyframes, 0.0).unwrap();
        assert_eq!(playback.tick(&mut rig, &keyframes, 400.0).unwrap(), Mode::Playing);

        playback.set_settings(PlaybackSettings {
            segment_duration_ms: 200.0,
            start: PlaybackStart::FirstKeyframe,
        });
        assert_eq!(playback.tick(&mut rig, &keyframes, 410.0).unwrap(), Mode::Edit);
    }

    #[test]
    fn status_reports_run_length() {
        let mut rig = rig();
        let mut keyframes = KeyframeList::new();
        for _ in 0..4 {
            keyframes.record(&rig);
        }

        let mut playback = Playback::default();
        playback.start(&mut rig, &keyframes, 100.0).unwrap();
        assert_eq!(playback.total_duration_ms(), Some(3000.0));
        assert_eq!(playback.elapsed_ms(600.0), Some(500.0));
    }
}
