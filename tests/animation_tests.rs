//! Animation Tests
//!
//! Tests for:
//! - KeyframeSchedule ordering, replacement and sampling
//! - AnimationClip frame-relative normalization
//! - CharacterModel clip looping, activation and root transform keys

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use choreo::animation::{
    AnimationClip, Axis, Channel, CharacterModel, CurveKey, Keyframe, KeyframeSchedule,
};
use choreo::errors::ChoreoError;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn hip_x() -> CurveKey {
    CurveKey::new("mixamorig:Hips", Channel::Location(Axis::X))
}

/// A clip with keys at relative frames 0, length/2 and length, authored
/// starting on frame 5.
fn run_clip(length: i32) -> AnimationClip {
    AnimationClip::from_absolute_curves(
        "run",
        "run.glb",
        [(
            hip_x(),
            vec![
                Keyframe::new(5, 0.0),
                Keyframe::new(5 + length / 2, 0.5),
                Keyframe::new(5 + length, 1.0),
            ],
        )],
        Vec3::new(1.0, 0.0, 0.0),
    )
    .unwrap()
}

// ============================================================================
// KeyframeSchedule
// ============================================================================

#[test]
fn schedule_samples_linearly_between_keys() {
    let schedule: KeyframeSchedule<f32> =
        [Keyframe::new(0, 0.0), Keyframe::new(10, 10.0)].into_iter().collect();

    assert!(approx(schedule.sample(5.0).unwrap(), 5.0));
    assert!(approx(schedule.sample(-3.0).unwrap(), 0.0));
    assert!(approx(schedule.sample(42.0).unwrap(), 10.0));
}

#[test]
fn schedule_steps_booleans() {
    let mut schedule = KeyframeSchedule::new();
    schedule.insert(0, true);
    schedule.insert(10, false);

    assert_eq!(schedule.sample(9.9), Some(true));
    assert_eq!(schedule.sample(10.0), Some(false));
}

#[test]
fn schedule_sorts_out_of_order_inserts() {
    let mut schedule = KeyframeSchedule::new();
    schedule.insert(20, Vec3::X);
    schedule.insert(0, Vec3::ZERO);
    schedule.insert(10, Vec3::Y);

    assert_eq!(schedule.frames().collect::<Vec<_>>(), vec![0, 10, 20]);
    assert!(approx_vec3(schedule.sample(15.0).unwrap(), Vec3::new(0.5, 0.5, 0.0)));
}

#[test]
fn empty_schedule_samples_nothing() {
    let schedule: KeyframeSchedule<f32> = KeyframeSchedule::new();
    assert_eq!(schedule.sample(0.0), None);
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_curves_start_at_offset_zero() {
    let spine = CurveKey::new("mixamorig:Spine", Channel::Rotation(Axis::Z));
    let clip = AnimationClip::from_absolute_curves(
        "walk",
        "walk.glb",
        [
            (hip_x(), vec![Keyframe::new(12, 0.0), Keyframe::new(42, 1.0)]),
            (spine.clone(), vec![Keyframe::new(20, 0.3), Keyframe::new(40, 0.1)]),
        ],
        Vec3::ZERO,
    )
    .unwrap();

    assert_eq!(clip.first_frame(), 12);
    assert_eq!(clip.length(), 30);
    assert_eq!(clip.curve(&hip_x()).unwrap()[0].frame, 0);
    assert_eq!(clip.curve(&spine).unwrap()[0].frame, 8);

    let earliest = clip.curves().values().map(|keys| keys[0].frame).min();
    assert_eq!(earliest, Some(0));
}

#[test]
fn clip_drops_vertical_cycle_offset() {
    let clip = AnimationClip::from_absolute_curves(
        "walk",
        "walk.glb",
        [(hip_x(), vec![Keyframe::new(0, 0.0), Keyframe::new(10, 1.0)])],
        Vec3::new(-2.0, 0.5, 3.0),
    )
    .unwrap();

    assert_eq!(clip.cycle_offset(), Vec3::new(-2.0, 0.5, 0.0));
}

#[test]
fn clip_without_keys_is_rejected() {
    let clip = AnimationClip::from_absolute_curves("empty", "empty.glb", [(hip_x(), vec![])], Vec3::ZERO);
    assert!(clip.is_none());
}

// ============================================================================
// CharacterModel: looping
// ============================================================================

#[test]
fn loop_truncates_last_repeat_and_resets() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("run", run_clip(10));

    character.loop_clip("run", 0, 25).unwrap();

    let curve = character.clip_track("run").unwrap().curve(&hip_x()).unwrap();
    assert_eq!(curve.frames().collect::<Vec<_>>(), vec![0, 5, 10, 15, 20, 25]);

    // Repeats start at 0, 10 and 20
    assert_eq!(curve.get(0), Some(0.0));
    assert_eq!(curve.get(10), Some(0.0));
    assert_eq!(curve.get(20), Some(0.0));
    assert_eq!(curve.get(15), Some(0.5));

    // Frame 25 would be the third repeat's midpoint; the reset pose wins
    assert_eq!(curve.get(25), Some(0.0));
    assert_eq!(curve.last().unwrap().frame, 25);
}

#[test]
fn loop_with_exact_multiple_ends_on_reset() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("run", run_clip(10));

    character.loop_clip("run", 100, 120).unwrap();

    let curve = character.clip_track("run").unwrap().curve(&hip_x()).unwrap();
    assert_eq!(curve.frames().collect::<Vec<_>>(), vec![100, 105, 110, 115, 120]);
    assert_eq!(curve.get(120), Some(0.0));
}

#[test]
fn zero_length_clip_plays_once() {
    let pose = AnimationClip::from_absolute_curves(
        "pose",
        "pose.glb",
        [(hip_x(), vec![Keyframe::new(3, 0.25)])],
        Vec3::ZERO,
    )
    .unwrap();
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("pose", pose);

    character.loop_clip("pose", 0, 50).unwrap();

    let curve = character.clip_track("pose").unwrap().curve(&hip_x()).unwrap();
    assert_eq!(curve.frames().collect::<Vec<_>>(), vec![0, 50]);
}

#[test]
fn play_clip_drops_keys_after_end() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("run", run_clip(10));

    character.play_clip("run", 0, 7).unwrap();

    let curve = character.clip_track("run").unwrap().curve(&hip_x()).unwrap();
    assert_eq!(curve.frames().collect::<Vec<_>>(), vec![0, 5]);
}

#[test]
fn unknown_clip_is_reported() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("run", run_clip(10));

    let err = character.loop_clip("fly", 0, 10).unwrap_err();
    match err {
        ChoreoError::UnknownClipError { character, clip } => {
            assert_eq!(character, "bob");
            assert_eq!(clip, "fly");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        character.set_active_clip("fly", 0),
        Err(ChoreoError::UnknownClipError { .. })
    ));
}

#[test]
fn loop_reaching_last_frame_stops_cleanly() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("run", run_clip(10));

    character.loop_clip("run", i32::MAX - 25, i32::MAX).unwrap();

    let curve = character.clip_track("run").unwrap().curve(&hip_x()).unwrap();
    let expected: Vec<i32> = [25, 20, 15, 10, 5, 0].iter().map(|d| i32::MAX - d).collect();
    assert_eq!(curve.frames().collect::<Vec<_>>(), expected);
    assert_eq!(curve.get(i32::MAX), Some(0.0));
}

#[test]
fn rest_pose_past_last_frame_is_rejected() {
    let spine = CurveKey::new("mixamorig:Spine", Channel::Rotation(Axis::Z));
    let clip = AnimationClip::from_absolute_curves(
        "wave",
        "wave.glb",
        [
            (hip_x(), vec![Keyframe::new(0, 0.0), Keyframe::new(10, 1.0)]),
            (spine, vec![Keyframe::new(5, 0.3), Keyframe::new(10, 0.1)]),
        ],
        Vec3::ZERO,
    )
    .unwrap();
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("wave", clip);

    // The spine's first key sits 5 frames into the clip
    let err = character.show_clip_start("wave", i32::MAX - 2).unwrap_err();
    assert!(matches!(err, ChoreoError::FrameRangeError { ref clip, .. } if clip == "wave"));

    let err = character.loop_clip("wave", i32::MAX - 20, i32::MAX - 2).unwrap_err();
    assert!(matches!(err, ChoreoError::FrameRangeError { .. }));
    assert!(character.clip_track("wave").unwrap().curves().is_empty());
}

#[test]
fn clip_spanning_more_than_frame_range_is_rejected() {
    let clip = AnimationClip::from_absolute_curves(
        "long",
        "long.glb",
        [(hip_x(), vec![Keyframe::new(i32::MIN, 0.0), Keyframe::new(i32::MAX, 1.0)])],
        Vec3::ZERO,
    );
    assert!(clip.is_none());
}

// ============================================================================
// CharacterModel: activation & visibility
// ============================================================================

#[test]
fn set_active_clip_toggles_every_clip() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("walk", run_clip(10));
    character.add_clip("run", run_clip(10));

    character.set_active_clip("walk", 0).unwrap();
    character.set_active_clip("run", 10).unwrap();

    let walk = character.clip_track("walk").unwrap().visibility();
    let run = character.clip_track("run").unwrap().visibility();
    assert_eq!(walk.get(0), Some(true));
    assert_eq!(walk.get(10), Some(false));
    assert_eq!(run.get(0), Some(false));
    assert_eq!(run.get(10), Some(true));

    assert_eq!(character.active_clip_at(-1), None);
    assert_eq!(character.active_clip_at(5), Some("walk"));
    assert_eq!(character.active_clip_at(10), Some("run"));
    assert_eq!(character.activations().len(), 2);
}

#[test]
fn activation_on_same_frame_replaces() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("walk", run_clip(10));
    character.add_clip("run", run_clip(10));

    character.set_active_clip("walk", 4).unwrap();
    character.set_active_clip("run", 4).unwrap();

    assert_eq!(character.activations().len(), 1);
    assert_eq!(character.active_clip_at(4), Some("run"));
    assert_eq!(character.clip_track("walk").unwrap().visibility().get(4), Some(false));
}

#[test]
fn visibility_holds_until_next_key() {
    let mut character = CharacterModel::new("bob", 1.0);
    assert!(character.is_visible_at(0));

    character.set_visible(false, 10);
    character.set_visible(true, 20);

    assert!(character.is_visible_at(9));
    assert!(!character.is_visible_at(10));
    assert!(!character.is_visible_at(19));
    assert!(character.is_visible_at(20));
}

// ============================================================================
// CharacterModel: root transform
// ============================================================================

#[test]
fn rotation_is_stored_in_radians() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.set_rotation(Vec3::new(90.0, 0.0, 180.0), 0);

    let stored = character.rotations().get(0).unwrap();
    assert!(approx_vec3(stored, Vec3::new(FRAC_PI_2, 0.0, PI)));
}

#[test]
fn transform_defaults_before_first_key() {
    let mut character = CharacterModel::new("bob", 1.0);
    assert_eq!(character.position_at(0.0), Vec3::ZERO);
    assert_eq!(character.rotation_at(0.0), Vec3::ZERO);

    character.set_position(Vec3::new(2.0, 0.0, 0.0), 10);
    character.set_position(Vec3::new(4.0, 0.0, 0.0), 20);

    assert!(approx_vec3(character.position_at(15.0), Vec3::new(3.0, 0.0, 0.0)));
    assert_eq!(character.rotation_at(5.0), Vec3::ZERO);
}

#[test]
fn redefining_clip_resets_its_track() {
    let mut character = CharacterModel::new("bob", 1.0);
    character.add_clip("run", run_clip(10));
    character.loop_clip("run", 0, 20).unwrap();

    character.add_clip("run", run_clip(20));

    let track = character.clip_track("run").unwrap();
    assert!(track.curves().is_empty());
    assert_eq!(character.clip("run").unwrap().length(), 20);
}
