use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::animation::channel::CurveKey;
use crate::animation::schedule::Keyframe;

/// One authored skeletal animation cycle, ready to be replayed at any frame.
///
/// Curve keys are stored frame-relative: every curve of a clip is shifted so
/// the clip's first authored frame becomes offset 0. A clip is immutable once
/// built; characters bake copies of its keys into their own tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    name: String,
    source: PathBuf,
    first_frame: i32,
    length: i32,
    cycle_offset: Vec3,
    curves: BTreeMap<CurveKey, Vec<Keyframe<f32>>>,
}

impl AnimationClip {
    /// Builds a clip from curves keyed on absolute frames.
    ///
    /// Returns `None` when no curve carries a keyframe or the keys span more
    /// frames than fit in an `i32`. The vertical component of `cycle_offset`
    /// is dropped.
    pub fn from_absolute_curves(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        curves: impl IntoIterator<Item = (CurveKey, Vec<Keyframe<f32>>)>,
        cycle_offset: Vec3,
    ) -> Option<Self> {
        let mut curves: BTreeMap<CurveKey, Vec<Keyframe<f32>>> = curves
            .into_iter()
            .filter(|(_, keys)| !keys.is_empty())
            .collect();

        let (first_frame, last_frame) = frame_span(curves.values())?;
        let length = last_frame.checked_sub(first_frame)?;

        for keys in curves.values_mut() {
            keys.sort_by_key(|k| k.frame);
            for key in keys.iter_mut() {
                key.frame -= first_frame;
            }
        }

        Some(Self {
            name: name.into(),
            source: source.into(),
            first_frame,
            length,
            cycle_offset: cycle_offset.with_z(0.0),
            curves,
        })
    }

    /// Name the clip was built with; the clip store uses the source file
    /// stem. Characters register clips under their own names, see
    /// [`CharacterModel::add_clip`](crate::animation::CharacterModel::add_clip).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the clip was loaded from.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// First authored frame in the source file.
    #[inline]
    #[must_use]
    pub fn first_frame(&self) -> i32 {
        self.first_frame
    }

    /// Frames in one playback cycle (last authored frame minus first).
    #[inline]
    #[must_use]
    pub fn length(&self) -> i32 {
        self.length
    }

    /// World-space planar displacement covered by one cycle.
    #[inline]
    #[must_use]
    pub fn cycle_offset(&self) -> Vec3 {
        self.cycle_offset
    }

    #[inline]
    #[must_use]
    pub fn curves(&self) -> &BTreeMap<CurveKey, Vec<Keyframe<f32>>> {
        &self.curves
    }

    #[must_use]
    pub fn curve(&self, key: &CurveKey) -> Option<&[Keyframe<f32>]> {
        self.curves.get(key).map(Vec::as_slice)
    }
}

/// Min and max keyframe frame across a set of curves.
pub(crate) fn frame_span<'a>(
    curves: impl IntoIterator<Item = &'a Vec<Keyframe<f32>>>,
) -> Option<(i32, i32)> {
    curves
        .into_iter()
        .flatten()
        .map(|k| k.frame)
        .fold(None, |span, frame| match span {
            None => Some((frame, frame)),
            Some((lo, hi)) => Some((lo.min(frame), hi.max(frame))),
        })
}
