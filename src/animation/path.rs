//! Path walking.
//!
//! Plans how a locomotion clip is repeated to carry a character in a straight
//! line between two points. The character is only moved at cycle boundaries,
//! by exactly the distance one cycle covers, so the feet never slide and no
//! drift accumulates over long paths.

use glam::Vec3;

use crate::animation::clip::AnimationClip;
use crate::animation::schedule::Keyframe;
use crate::errors::{ChoreoError, Result};

/// Yaw added to the path heading so the rig's forward axis faces along it.
pub const FORWARD_YAW_OFFSET_DEG: f32 = 90.0;

const MAX_PREALLOCATED_KEYS: usize = 4096;

/// The keyframe plan for walking one straight path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPlan {
    pub start_frame: i32,
    /// Frame at which the clip loop stops and the character rests.
    pub end_frame: i32,
    /// Clip cycles needed to cover the path (not necessarily whole).
    pub cycles: f32,
    /// Unit heading from start to end, zero for an empty path.
    pub direction: Vec3,
    /// Displacement applied at each full-cycle boundary.
    pub step: Vec3,
    /// Facing rotation about the vertical axis, in radians.
    pub yaw: f32,
    /// Position reached after the last full cycle.
    pub final_position: Vec3,
    /// Position keys, in the order they are applied.
    pub positions: Vec<Keyframe<Vec3>>,
}

impl PathPlan {
    /// Plans walking `clip_name` from `start` to `end` beginning at `start_frame`.
    ///
    /// `scale` is the character's uniform scale; it stretches the clip's
    /// authored cycle offset. Fails with [`ChoreoError::DegenerateClipError`]
    /// when one cycle covers no distance, and with
    /// [`ChoreoError::FrameRangeError`] when the walk would end past the last
    /// representable frame.
    pub fn compute(
        clip_name: &str,
        clip: &AnimationClip,
        scale: f32,
        start: Vec3,
        end: Vec3,
        start_frame: i32,
    ) -> Result<Self> {
        let cycle_offset_length = clip.cycle_offset().length() * scale;
        if cycle_offset_length.is_nan() || cycle_offset_length <= 0.0 || clip.length() <= 0 {
            return Err(ChoreoError::DegenerateClipError {
                clip: clip_name.to_string(),
            });
        }

        let out_of_range = || ChoreoError::FrameRangeError {
            clip: clip_name.to_string(),
            start_frame,
        };

        let length = clip.length();
        let cycles = (end - start).length() / cycle_offset_length;
        let span = (cycles * length as f32).floor();
        if span.is_nan() || span >= i32::MAX as f32 {
            return Err(out_of_range());
        }
        let end_frame = start_frame
            .checked_add(span as i32)
            .ok_or_else(out_of_range)?;
        let before_end = end_frame.checked_sub(1).ok_or_else(out_of_range)?;

        let direction = (end - start).normalize_or_zero();
        let yaw = direction.y.atan2(direction.x) + FORWARD_YAW_OFFSET_DEG.to_radians();
        let step = direction * cycle_offset_length;

        let full_cycles = cycles.floor() as i32;
        let capacity = (full_cycles as usize * 2 + 3).min(MAX_PREALLOCATED_KEYS);
        let mut positions = Vec::with_capacity(capacity);
        positions.push(Keyframe::new(start_frame, start));

        let mut position = start;
        for i in 0..full_cycles {
            // Hold on the cycle's last frame, then jump by one cycle
            let advance = length
                .checked_mul(i + 1)
                .and_then(|f| f.checked_add(start_frame))
                .ok_or_else(out_of_range)?;
            positions.push(Keyframe::new(advance - 1, position));
            position += step;
            positions.push(Keyframe::new(advance, position));
        }

        // A fractional last cycle is never fully traveled
        positions.push(Keyframe::new(end_frame, position));
        positions.push(Keyframe::new(before_end, position));

        log::debug!(
            "Path plan for '{clip_name}': {cycles:.3} cycles, frames {start_frame}..{end_frame}"
        );

        Ok(Self {
            start_frame,
            end_frame,
            cycles,
            direction,
            step,
            yaw,
            final_position: position,
            positions,
        })
    }

    /// Number of whole cycles walked.
    #[inline]
    #[must_use]
    pub fn full_cycles(&self) -> u32 {
        self.cycles.floor() as u32
    }
}
