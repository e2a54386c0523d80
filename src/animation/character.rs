//! Character model.
//!
//! A character owns named clips and the keyframe schedules that will be
//! handed to the renderer: which clip is active when, whole-character
//! visibility, and the root transform track. Every operation appends keys
//! forward in time; schedules stay sorted regardless.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::animation::channel::CurveKey;
use crate::animation::clip::AnimationClip;
use crate::animation::path::PathPlan;
use crate::animation::schedule::KeyframeSchedule;
use crate::errors::{ChoreoError, Result};

/// Keys baked for one clip of one character.
///
/// Curves hold absolute frames (clip offsets plus the playback start);
/// `visibility` records when the clip's rig is shown or hidden.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipTrack {
    curves: BTreeMap<CurveKey, KeyframeSchedule<f32>>,
    visibility: KeyframeSchedule<bool>,
}

impl ClipTrack {
    #[must_use]
    pub fn curves(&self) -> &BTreeMap<CurveKey, KeyframeSchedule<f32>> {
        &self.curves
    }

    #[must_use]
    pub fn curve(&self, key: &CurveKey) -> Option<&KeyframeSchedule<f32>> {
        self.curves.get(key)
    }

    #[must_use]
    pub fn visibility(&self) -> &KeyframeSchedule<bool> {
        &self.visibility
    }

    /// Plays one cycle of `clip` from `start`, dropping keys after `end`.
    fn play(&mut self, clip: &AnimationClip, start: i32, end: i32) {
        for (key, keys) in clip.curves() {
            let schedule = self.curves.entry(key.clone()).or_default();
            for k in keys {
                // Overflowing frames lie past any `end`
                match k.frame.checked_add(start) {
                    Some(frame) if frame <= end => {
                        schedule.insert(frame, k.value);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Keys the clip's first pose on `frame`.
    ///
    /// Callers check `start_pose_fits` first.
    fn show_start(&mut self, clip: &AnimationClip, frame: i32) {
        for (key, keys) in clip.curves() {
            if let Some(first) = keys.first() {
                self.curves
                    .entry(key.clone())
                    .or_default()
                    .insert(first.frame + frame, first.value);
            }
        }
    }
}

/// One entry of the active-clip schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipActivation {
    pub clip: String,
    pub frame: i32,
}

/// A skeletal character driven by the scene timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterModel {
    name: String,
    scale: f32,

    clips: BTreeMap<String, AnimationClip>,
    tracks: BTreeMap<String, ClipTrack>,

    activations: Vec<ClipActivation>,
    positions: KeyframeSchedule<Vec3>,
    // XYZ Euler, radians
    rotations: KeyframeSchedule<Vec3>,
    visibility: KeyframeSchedule<bool>,
}

impl CharacterModel {
    #[must_use]
    pub fn new(name: impl Into<String>, scale: f32) -> Self {
        Self {
            name: name.into(),
            scale,
            clips: BTreeMap::new(),
            tracks: BTreeMap::new(),
            activations: Vec::new(),
            positions: KeyframeSchedule::new(),
            rotations: KeyframeSchedule::new(),
            visibility: KeyframeSchedule::new(),
        }
    }

    // ========================================================================
    // Clip management
    // ========================================================================

    /// Registers `clip` under `name`, replacing any clip of the same name.
    pub fn add_clip(&mut self, name: impl Into<String>, clip: AnimationClip) {
        let name = name.into();
        log::debug!(
            "Character '{}': clip '{}' ({} frames) from {}",
            self.name,
            name,
            clip.length(),
            clip.source().display()
        );
        self.tracks.insert(name.clone(), ClipTrack::default());
        self.clips.insert(name, clip);
    }

    /// Makes `name` the visible clip from `frame` on and hides all others.
    pub fn set_active_clip(&mut self, name: &str, frame: i32) -> Result<()> {
        self.require_clip(name)?;

        match self.activations.iter_mut().find(|a| a.frame == frame) {
            Some(existing) => existing.clip = name.to_string(),
            None => {
                let at = self.activations.partition_point(|a| a.frame <= frame);
                self.activations.insert(
                    at,
                    ClipActivation {
                        clip: name.to_string(),
                        frame,
                    },
                );
            }
        }

        for (clip_name, track) in &mut self.tracks {
            track.visibility.insert(frame, clip_name == name);
        }
        Ok(())
    }

    /// Repeats clip `name` from `start_frame`, truncating the last cycle at
    /// `end_frame`, then keys the clip's rest pose on `end_frame`.
    pub fn loop_clip(&mut self, name: &str, start_frame: i32, end_frame: i32) -> Result<()> {
        let clip = lookup_clip(&self.clips, &self.name, name)?;
        if !start_pose_fits(clip, end_frame) {
            return Err(frame_range_error(name, start_frame));
        }
        let track = self.tracks.entry(name.to_string()).or_default();
        let length = clip.length();

        let mut frame = start_frame;
        while frame < end_frame {
            track.play(clip, frame, end_frame);
            if length <= 0 {
                break;
            }
            // An overflowing repeat would start past `end_frame` anyway
            match frame.checked_add(length) {
                Some(next) => frame = next,
                None => break,
            }
        }
        track.show_start(clip, end_frame);
        Ok(())
    }

    /// Plays a single cycle of clip `name` from `start_frame`, dropping keys
    /// after `end_frame`.
    pub fn play_clip(&mut self, name: &str, start_frame: i32, end_frame: i32) -> Result<()> {
        let clip = lookup_clip(&self.clips, &self.name, name)?;
        self.tracks
            .entry(name.to_string())
            .or_default()
            .play(clip, start_frame, end_frame);
        Ok(())
    }

    /// Keys the first pose of clip `name` on `frame`.
    pub fn show_clip_start(&mut self, name: &str, frame: i32) -> Result<()> {
        let clip = lookup_clip(&self.clips, &self.name, name)?;
        if !start_pose_fits(clip, frame) {
            return Err(frame_range_error(name, frame));
        }
        self.tracks
            .entry(name.to_string())
            .or_default()
            .show_start(clip, frame);
        Ok(())
    }

    /// Walks clip `name` in a straight line from `start` to `end`.
    ///
    /// Loops the clip in place, faces the character along the path, and
    /// moves the root only at cycle boundaries. Returns the frame at which
    /// the walk ends.
    pub fn walk_path(&mut self, name: &str, start: Vec3, end: Vec3, start_frame: i32) -> Result<i32> {
        let clip = self.require_clip(name)?;
        let plan = PathPlan::compute(name, clip, self.scale, start, end, start_frame)?;

        self.loop_clip(name, start_frame, plan.end_frame)?;

        let facing = self.rotation_at(start_frame as f32).with_z(plan.yaw);
        self.rotations.insert(start_frame, facing);

        self.set_active_clip(name, start_frame)?;

        for key in &plan.positions {
            self.positions.insert(key.frame, key.value);
        }

        log::debug!(
            "Character '{}' walks '{}' from {start} to {} (frames {start_frame}..{})",
            self.name,
            name,
            plan.final_position,
            plan.end_frame
        );
        Ok(plan.end_frame)
    }

    // ========================================================================
    // Root transform & visibility
    // ========================================================================

    /// Shows or hides the whole character from `frame` until the next
    /// visibility key.
    pub fn set_visible(&mut self, visible: bool, frame: i32) {
        self.visibility.insert(frame, visible);
    }

    pub fn set_position(&mut self, position: Vec3, frame: i32) {
        self.positions.insert(frame, position);
    }

    /// Keys the root rotation; input is XYZ Euler in degrees.
    pub fn set_rotation(&mut self, euler_degrees: Vec3, frame: i32) {
        let radians = Vec3::new(
            euler_degrees.x.to_radians(),
            euler_degrees.y.to_radians(),
            euler_degrees.z.to_radians(),
        );
        self.rotations.insert(frame, radians);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn clips(&self) -> &BTreeMap<String, AnimationClip> {
        &self.clips
    }

    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    #[must_use]
    pub fn clip_track(&self, name: &str) -> Option<&ClipTrack> {
        self.tracks.get(name)
    }

    #[must_use]
    pub fn activations(&self) -> &[ClipActivation] {
        &self.activations
    }

    #[must_use]
    pub fn positions(&self) -> &KeyframeSchedule<Vec3> {
        &self.positions
    }

    /// Rotation keys, XYZ Euler in radians.
    #[must_use]
    pub fn rotations(&self) -> &KeyframeSchedule<Vec3> {
        &self.rotations
    }

    #[must_use]
    pub fn visibility(&self) -> &KeyframeSchedule<bool> {
        &self.visibility
    }

    /// Root position at `frame` (origin before the first key).
    #[must_use]
    pub fn position_at(&self, frame: f32) -> Vec3 {
        self.positions.sample(frame).unwrap_or(Vec3::ZERO)
    }

    /// Root rotation at `frame` in radians (zero before the first key).
    #[must_use]
    pub fn rotation_at(&self, frame: f32) -> Vec3 {
        if self.rotations.first().is_none_or(|k| frame < k.frame as f32) {
            return Vec3::ZERO;
        }
        self.rotations.sample(frame).unwrap_or(Vec3::ZERO)
    }

    /// Whole-character visibility at `frame` (visible before the first key).
    #[must_use]
    pub fn is_visible_at(&self, frame: i32) -> bool {
        let idx = self.visibility.keys().partition_point(|k| k.frame <= frame);
        if idx == 0 {
            true
        } else {
            self.visibility.keys()[idx - 1].value
        }
    }

    /// The clip active at `frame`, if any activation precedes it.
    #[must_use]
    pub fn active_clip_at(&self, frame: i32) -> Option<&str> {
        let idx = self.activations.partition_point(|a| a.frame <= frame);
        idx.checked_sub(1).map(|i| self.activations[i].clip.as_str())
    }

    fn require_clip(&self, name: &str) -> Result<&AnimationClip> {
        lookup_clip(&self.clips, &self.name, name)
    }
}

// Borrows only the clip map so callers can mutate tracks alongside.
fn lookup_clip<'a>(
    clips: &'a BTreeMap<String, AnimationClip>,
    character: &str,
    name: &str,
) -> Result<&'a AnimationClip> {
    clips.get(name).ok_or_else(|| ChoreoError::UnknownClipError {
        character: character.to_string(),
        clip: name.to_string(),
    })
}

/// Whether every curve's first key still lands on a valid frame when the
/// clip starts on `frame`.
fn start_pose_fits(clip: &AnimationClip, frame: i32) -> bool {
    clip.curves()
        .values()
        .filter_map(|keys| keys.first())
        .all(|first| first.frame.checked_add(frame).is_some())
}

fn frame_range_error(clip: &str, start_frame: i32) -> ChoreoError {
    ChoreoError::FrameRangeError {
        clip: clip.to_string(),
        start_frame,
    }
}
