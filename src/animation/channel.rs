//! Animated channels.
//!
//! A clip's curves are keyed by the bone they drive and a closed set of
//! channels, instead of free-form property paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One spatial component of a vector channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (x = 0, y = 1, z = 2).
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// The property a curve animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Translation component, in parent space.
    Location(Axis),
    /// XYZ Euler rotation component, in radians.
    Rotation(Axis),
    /// Scale component.
    Scale(Axis),
    /// Render-hidden flag (1.0 hidden, 0.0 shown).
    Visibility,
}

impl Channel {
    /// Host-side property name used in the render manifest.
    #[must_use]
    pub fn data_path(self) -> &'static str {
        match self {
            Channel::Location(_) => "location",
            Channel::Rotation(_) => "rotation_euler",
            Channel::Scale(_) => "scale",
            Channel::Visibility => "hide_render",
        }
    }

    /// Array index of the channel within its property.
    #[must_use]
    pub fn array_index(self) -> usize {
        match self {
            Channel::Location(axis) | Channel::Rotation(axis) | Channel::Scale(axis) => axis.index(),
            Channel::Visibility => 0,
        }
    }
}

/// Identifies one curve of a clip: which bone, which channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurveKey {
    pub bone: String,
    pub channel: Channel,
}

impl CurveKey {
    pub fn new(bone: impl Into<String>, channel: Channel) -> Self {
        Self {
            bone: bone.into(),
            channel,
        }
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}[{}]",
            self.bone,
            self.channel.data_path(),
            self.channel.array_index()
        )
    }
}
