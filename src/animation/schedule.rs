use serde::{Deserialize, Serialize};

use crate::animation::values::Interpolatable;

/// A single `(frame, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: i32,
    pub value: T,
}

impl<T> Keyframe<T> {
    #[inline]
    pub fn new(frame: i32, value: T) -> Self {
        Self { frame, value }
    }
}

/// An ordered keyframe list for one channel.
///
/// Keys stay sorted by frame no matter the insertion order. Inserting on a
/// frame that already holds a key overwrites that key's value, the way the
/// host application treats a second keyframe on the same frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSchedule<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Default for KeyframeSchedule<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T: Copy> KeyframeSchedule<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, returning the value it replaced on the same frame.
    pub fn insert(&mut self, frame: i32, value: T) -> Option<T> {
        // Fast path: the engine almost always appends forward in time
        if self.keys.last().is_none_or(|k| k.frame < frame) {
            self.keys.push(Keyframe::new(frame, value));
            return None;
        }

        match self.keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => Some(std::mem::replace(&mut self.keys[i].value, value)),
            Err(i) => {
                self.keys.insert(i, Keyframe::new(frame, value));
                None
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Keyframe<T>> {
        self.keys.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Keyframe<T>> {
        self.keys.last()
    }

    /// The value keyed exactly on `frame`, if any.
    #[must_use]
    pub fn get(&self, frame: i32) -> Option<T> {
        self.keys
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|i| self.keys[i].value)
    }

    /// Frames of all keys, in order.
    pub fn frames(&self) -> impl Iterator<Item = i32> + '_ {
        self.keys.iter().map(|k| k.frame)
    }
}

impl<T: Interpolatable> KeyframeSchedule<T> {
    /// Samples the schedule at `frame`.
    ///
    /// Clamps to the first/last key outside the keyed range and returns
    /// `None` only for an empty schedule.
    #[must_use]
    pub fn sample(&self, frame: f32) -> Option<T> {
        let first = self.keys.first()?;
        let len = self.keys.len();

        // partition_point finds the first key strictly after `frame`
        let next_idx = self.keys.partition_point(|k| k.frame as f32 <= frame);
        if next_idx == 0 {
            return Some(first.value);
        }
        if next_idx >= len {
            return Some(self.keys[len - 1].value);
        }

        let k0 = &self.keys[next_idx - 1];
        let k1 = &self.keys[next_idx];
        let dt = (k1.frame - k0.frame) as f32;
        let t = ((frame - k0.frame as f32) / dt).clamp(0.0, 1.0);
        Some(T::interpolate_linear(k0.value, k1.value, t))
    }
}

impl<T> FromIterator<Keyframe<T>> for KeyframeSchedule<T>
where
    T: Copy,
{
    fn from_iter<I: IntoIterator<Item = Keyframe<T>>>(iter: I) -> Self {
        let mut schedule = Self::new();
        for key in iter {
            schedule.insert(key.frame, key.value);
        }
        schedule
    }
}
