//! Path Walking Tests
//!
//! Tests for:
//! - Cycle count and end frame for integral and fractional paths
//! - Position keys advancing by whole cycles only
//! - Facing, activation and scale handling
//! - Degenerate clips

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use choreo::animation::{
    AnimationClip, Axis, Channel, CharacterModel, CurveKey, Keyframe, PathPlan,
};
use choreo::errors::ChoreoError;

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn hip_x() -> CurveKey {
    CurveKey::new("mixamorig:Hips", Channel::Location(Axis::X))
}

fn walk_clip(length: i32, cycle_offset: Vec3) -> AnimationClip {
    AnimationClip::from_absolute_curves(
        "walk",
        "walk.glb",
        [(
            hip_x(),
            vec![Keyframe::new(0, 0.0), Keyframe::new(length, 1.0)],
        )],
        cycle_offset,
    )
    .unwrap()
}

fn walker(scale: f32, cycle_offset: Vec3) -> CharacterModel {
    let mut character = CharacterModel::new("bob", scale);
    character.add_clip("walk", walk_clip(30, cycle_offset));
    character
}

const START: Vec3 = Vec3::new(-6.0, -2.0, 0.0);

#[test]
fn integral_path_ends_on_target() {
    let mut character = walker(1.0, Vec3::X);

    let end_frame = character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), 0)
        .unwrap();

    assert_eq!(end_frame, 360);

    let positions = character.positions();
    assert!(approx_vec3(positions.get(0).unwrap(), START));
    assert!(approx_vec3(positions.get(360).unwrap(), Vec3::new(6.0, -2.0, 0.0)));

    // Hold on each cycle's last frame, then jump one cycle forward
    for i in 0..11 {
        let hold = 30 * (i + 1) - 1;
        let before = START + Vec3::X * i as f32;
        let after = START + Vec3::X * (i + 1) as f32;
        assert!(approx_vec3(positions.get(hold).unwrap(), before), "hold at {hold}");
        assert!(approx_vec3(positions.get(hold + 1).unwrap(), after), "advance at {}", hold + 1);
    }

    // Start, 12 hold/advance pairs (the last hold re-pinned at end - 1)
    assert_eq!(positions.len(), 25);
    assert!(approx_vec3(positions.get(359).unwrap(), Vec3::new(6.0, -2.0, 0.0)));
}

#[test]
fn plan_counts_full_cycle_advances() {
    let clip = walk_clip(30, Vec3::X);
    let plan = PathPlan::compute("walk", &clip, 1.0, START, Vec3::new(6.0, -2.0, 0.0), 0).unwrap();

    assert!(approx(plan.cycles, 12.0));
    assert_eq!(plan.full_cycles(), 12);
    assert_eq!(plan.end_frame, 360);
    assert!(approx_vec3(plan.step, Vec3::X));
    assert!(approx_vec3(plan.final_position, Vec3::new(6.0, -2.0, 0.0)));

    // start + 12 * (hold, advance) + end + end - 1
    assert_eq!(plan.positions.len(), 27);
    let advances = plan
        .positions
        .windows(2)
        .filter(|w| w[1].frame == w[0].frame + 1 && approx_vec3(w[1].value - w[0].value, Vec3::X))
        .count();
    assert_eq!(advances, 12);
}

#[test]
fn fractional_cycle_is_not_traveled() {
    let mut character = walker(1.0, Vec3::X);

    let end_frame = character
        .walk_path("walk", START, Vec3::new(6.5, -2.0, 0.0), 0)
        .unwrap();

    assert_eq!(end_frame, 375);

    let positions = character.positions();
    let last = positions.last().unwrap();
    assert_eq!(last.frame, 375);
    assert!(approx_vec3(last.value, Vec3::new(6.0, -2.0, 0.0)));
    assert!(approx_vec3(positions.get(374).unwrap(), Vec3::new(6.0, -2.0, 0.0)));
}

#[test]
fn end_frame_is_offset_by_start_frame() {
    let mut character = walker(1.0, Vec3::X);

    let end_frame = character
        .walk_path("walk", START, Vec3::new(6.5, -2.0, 0.0), 100)
        .unwrap();

    assert_eq!(end_frame, 475);
    assert!(approx_vec3(character.positions().get(100).unwrap(), START));
}

#[test]
fn walker_faces_along_path() {
    let mut character = walker(1.0, Vec3::X);
    character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), 0)
        .unwrap();

    let rotation = character.rotations().get(0).unwrap();
    assert!(approx(rotation.z, FRAC_PI_2));

    let mut character = walker(1.0, Vec3::X);
    character
        .walk_path("walk", Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), 0)
        .unwrap();
    let rotation = character.rotations().get(0).unwrap();
    assert!(approx(rotation.z, FRAC_PI_2 * 2.0));
}

#[test]
fn facing_keeps_existing_tilt() {
    let mut character = walker(1.0, Vec3::X);
    character.set_rotation(Vec3::new(10.0, 0.0, 45.0), 0);

    character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), 0)
        .unwrap();

    let rotation = character.rotations().get(0).unwrap();
    assert!(approx(rotation.x, 10.0_f32.to_radians()));
    assert!(approx(rotation.z, FRAC_PI_2));
}

#[test]
fn walking_activates_and_loops_clip() {
    let mut character = walker(1.0, Vec3::X);
    character
        .walk_path("walk", START, Vec3::new(6.5, -2.0, 0.0), 0)
        .unwrap();

    assert_eq!(character.active_clip_at(0), Some("walk"));

    let curve = character.clip_track("walk").unwrap().curve(&hip_x()).unwrap();
    assert_eq!(curve.first().unwrap().frame, 0);
    assert_eq!(curve.last().unwrap().frame, 375);
    assert_eq!(curve.get(375), Some(0.0));
}

#[test]
fn scale_stretches_cycle_offset() {
    let mut character = walker(2.0, Vec3::X);

    let end_frame = character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), 0)
        .unwrap();

    assert_eq!(end_frame, 180);
    assert!(approx_vec3(character.positions().get(30).unwrap(), START + Vec3::X * 2.0));
}

#[test]
fn standing_still_plans_no_cycles() {
    let clip = walk_clip(30, Vec3::X);
    let plan = PathPlan::compute("walk", &clip, 1.0, START, START, 12).unwrap();

    assert!(approx(plan.cycles, 0.0));
    assert_eq!(plan.end_frame, 12);
    assert_eq!(plan.direction, Vec3::ZERO);
    assert!(approx(plan.yaw, FRAC_PI_2));
    assert!(plan.positions.iter().all(|k| k.value == START));
}

#[test]
fn clip_without_displacement_cannot_walk() {
    let mut character = walker(1.0, Vec3::ZERO);

    let err = character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), 0)
        .unwrap_err();

    assert!(matches!(err, ChoreoError::DegenerateClipError { ref clip } if clip == "walk"));
    assert!(character.positions().is_empty());
}

#[test]
fn zero_scale_is_degenerate() {
    let mut character = walker(0.0, Vec3::X);
    assert!(matches!(
        character.walk_path("walk", START, Vec3::ZERO, 0),
        Err(ChoreoError::DegenerateClipError { .. })
    ));
}

// ============================================================================
// Frame range
// ============================================================================

#[test]
fn walk_past_last_frame_is_rejected() {
    let mut character = walker(1.0, Vec3::X);

    let err = character
        .walk_path("walk", Vec3::ZERO, Vec3::new(1e9, 0.0, 0.0), 1)
        .unwrap_err();

    assert!(matches!(
        err,
        ChoreoError::FrameRangeError { ref clip, start_frame: 1 } if clip == "walk"
    ));
    assert!(character.positions().is_empty());
    assert!(character.activations().is_empty());
}

#[test]
fn walk_starting_near_last_frame_is_rejected() {
    let mut character = walker(1.0, Vec3::X);

    let err = character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), i32::MAX - 100)
        .unwrap_err();

    assert!(matches!(err, ChoreoError::FrameRangeError { .. }));
    assert!(character.clip_track("walk").unwrap().curves().is_empty());
    assert!(character.rotations().is_empty());
}

#[test]
fn walk_may_end_on_last_frame() {
    let mut character = walker(1.0, Vec3::X);

    let end_frame = character
        .walk_path("walk", START, Vec3::new(6.0, -2.0, 0.0), i32::MAX - 360)
        .unwrap();

    assert_eq!(end_frame, i32::MAX);
    assert_eq!(character.positions().get(i32::MAX), Some(Vec3::new(6.0, -2.0, 0.0)));
    let curve = character.clip_track("walk").unwrap().curve(&hip_x()).unwrap();
    assert_eq!(curve.last().unwrap().frame, i32::MAX);
}
