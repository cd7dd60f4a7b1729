//! Bone manipulation tests
//!
//! Tests for:
//! - rotate / translate / roll / aim effects on the edited bone
//! - Isolation of ancestors and siblings
//! - Degenerate gestures leaving the rig untouched

use armature::{BoneRecord, Rig, link_children};
use glam::{Affine3A, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

/// Root with three children side by side along `+Y`.
fn fan_rig() -> Rig {
    let mut records = vec![
        BoneRecord::new(None, Vec3::ZERO, Vec3::Y),
        BoneRecord::new(Some(0), Vec3::new(-1.0, 1.0, 0.0), Vec3::new(-1.0, 2.0, 0.0)),
        BoneRecord::new(Some(0), Vec3::Y, Vec3::Y * 2.0),
        BoneRecord::new(Some(0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 0.0)),
    ];
    link_children(&mut records);
    Rig::from_records(&records).unwrap()
}

fn worlds(rig: &Rig) -> Vec<Affine3A> {
    rig.bones().iter().map(|b| *b.world()).collect()
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn manipulation_never_touches_parent_or_siblings() {
    let mut rig = fan_rig();
    rig.rotate(0, Vec3::Z, 0.3).unwrap();

    let gestures: [fn(&mut Rig) -> bool; 4] = [
        |rig| rig.rotate(2, Vec3::new(0.3, 0.2, 1.0), 0.8).unwrap(),
        |rig| rig.translate(2, Vec3::new(0.5, -0.25, 2.0)).unwrap(),
        |rig| rig.roll(2, 1.1, true).unwrap(),
        |rig| rig.aim(2, Vec3::new(3.0, 0.0, 1.0)).unwrap(),
    ];

    for gesture in gestures {
        let before = worlds(&rig);
        assert!(gesture(&mut rig));
        let after = worlds(&rig);

        for untouched in [0, 1, 3] {
            assert_eq!(before[untouched], after[untouched], "bone {untouched} moved");
        }
        assert_ne!(before[2], after[2]);
    }
}

// ============================================================================
// Gestures
// ============================================================================

#[test]
fn rotate_uses_world_axis_under_rotated_parent() {
    let mut rig = fan_rig();
    // Parent turned a quarter about Z: the child's local X is world Y.
    rig.rotate(0, Vec3::Z, FRAC_PI_2).unwrap();
    let before = rig.world_endpoint(2).unwrap() - rig.world_position(2).unwrap();

    rig.rotate(2, Vec3::Z, FRAC_PI_2).unwrap();
    let after = rig.world_endpoint(2).unwrap() - rig.world_position(2).unwrap();

    let expected = Quat::from_rotation_z(FRAC_PI_2) * before;
    assert!(vec3_approx(after, expected));
}

#[test]
fn translate_moves_origin_by_world_offset() {
    let mut rig = fan_rig();
    rig.rotate(0, Vec3::X, FRAC_PI_4).unwrap();
    rig.rotate(3, Vec3::Y, 1.2).unwrap();

    let origin = rig.world_position(3).unwrap();
    let rotation = rig.world_rotation(3).unwrap();
    let delta = Vec3::new(0.25, 0.5, -1.0);

    assert!(rig.translate(3, delta).unwrap());
    assert!(vec3_approx(rig.world_position(3).unwrap(), origin + delta));
    assert!(rig.world_rotation(3).unwrap().abs_diff_eq(rotation, EPSILON));
}

#[test]
fn roll_keeps_tip_in_place() {
    let mut rig = fan_rig();
    let tip = rig.world_endpoint(1).unwrap();

    assert!(rig.roll(1, 1.3, false).unwrap());
    assert!(vec3_approx(rig.world_endpoint(1).unwrap(), tip));
    assert_ne!(rig.local_rotation(1).unwrap(), Quat::IDENTITY);
}

#[test]
fn roll_direction_follows_negate_flag() {
    let mut forward = fan_rig();
    let mut backward = fan_rig();
    forward.roll(2, 0.6, false).unwrap();
    backward.roll(2, 0.6, true).unwrap();

    let combined = forward.local_rotation(2).unwrap() * backward.local_rotation(2).unwrap();
    assert!(combined.abs_diff_eq(Quat::IDENTITY, EPSILON));
}

#[test]
fn aim_points_tip_at_target() {
    let mut rig = fan_rig();
    let target = Vec3::new(4.0, 1.0, 0.0);

    assert!(rig.aim(2, target).unwrap());
    let origin = rig.world_position(2).unwrap();
    let direction = (rig.world_endpoint(2).unwrap() - origin).normalize();
    assert!(vec3_approx(direction, (target - origin).normalize()));
}

// ============================================================================
// Degenerate Input
// ============================================================================

#[test]
fn zero_axis_rotation_is_ignored() {
    let mut rig = fan_rig();
    let before = worlds(&rig);

    assert!(!rig.rotate(2, Vec3::ZERO, 1.0).unwrap());
    assert_eq!(rig.local_rotation(2).unwrap(), Quat::IDENTITY);
    assert_eq!(worlds(&rig), before);
}

#[test]
fn zero_drag_and_colinear_aim_are_ignored() {
    let mut rig = fan_rig();
    let before = worlds(&rig);

    assert!(!rig.translate(1, Vec3::ZERO).unwrap());
    assert!(!rig.aim(2, Vec3::Y * 5.0).unwrap());
    assert_eq!(worlds(&rig), before);
}

#[test]
fn zero_length_bone_cannot_roll() {
    let records = vec![BoneRecord::new(None, Vec3::ONE, Vec3::ONE)];
    let mut rig = Rig::from_records(&records).unwrap();
    assert!(!rig.roll(0, 1.0, false).unwrap());
}

#[test]
fn bad_index_is_an_error() {
    let mut rig = fan_rig();
    assert!(rig.rotate(4, Vec3::X, 1.0).is_err());
    assert!(rig.translate(4, Vec3::X).is_err());
    assert!(rig.roll(4, 1.0, false).is_err());
    assert!(rig.aim(4, Vec3::X).is_err());
}
