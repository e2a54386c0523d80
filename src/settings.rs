//! Engine Settings
//!
//! Configuration consumed by the clip importer and the scene interpreter.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use choreo::settings::ChoreoSettings;
//!
//! // Defaults: 24 fps, "hip" reference bone, paths relative to the cwd
//! let settings = ChoreoSettings::default();
//!
//! // Clips authored at 30 fps, scene files resolved next to the script
//! let settings = ChoreoSettings {
//!     frame_rate: 30.0,
//!     base_dir: "scenes/beach".into(),
//!     ..Default::default()
//! };
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RenderEngine
// ---------------------------------------------------------------------------

/// Render quality selected by the `USE_CYCLES` setup key.
///
/// The engine never renders itself; the choice is forwarded to the rendering
/// collaborator through the render manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderEngine {
    /// Rasterized preview quality.
    #[default]
    Eevee,
    /// Path-traced final quality.
    Cycles,
}

impl RenderEngine {
    /// Maps the `USE_CYCLES` flag to an engine.
    #[inline]
    #[must_use]
    pub fn from_use_cycles(use_cycles: bool) -> Self {
        if use_cycles { Self::Cycles } else { Self::Eevee }
    }
}

// ---------------------------------------------------------------------------
// ChoreoSettings
// ---------------------------------------------------------------------------

/// Global configuration for clip import and scene interpretation.
///
/// # Fields
///
/// | Field              | Description                                  | Default        |
/// |--------------------|----------------------------------------------|----------------|
/// | `frame_rate`       | Frames per second used to convert clip times | `24.0`         |
/// | `hip_bone_pattern` | Case-insensitive locomotion bone pattern     | `"hip"`        |
/// | `base_dir`         | Directory relative scene paths resolve from  | cwd            |
#[derive(Debug, Clone)]
pub struct ChoreoSettings {
    /// Frames per second of the scene timeline.
    ///
    /// Clip files store keyframe times in seconds; each time `t` lands on
    /// frame `round(t * frame_rate)`.
    pub frame_rate: f32,

    /// Substring (compared lowercase) identifying the hip bone of a rig.
    pub hip_bone_pattern: String,

    /// Base directory for relative paths in scene files.
    pub base_dir: PathBuf,
}

impl Default for ChoreoSettings {
    fn default() -> Self {
        Self {
            frame_rate: 24.0,
            hip_bone_pattern: "hip".to_string(),
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl ChoreoSettings {
    /// Resolves a path written in a scene file against [`Self::base_dir`].
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Converts a clip-file time in seconds to the nearest frame.
    #[inline]
    #[must_use]
    pub fn seconds_to_frame(&self, seconds: f32) -> i32 {
        (seconds * self.frame_rate).round() as i32
    }
}
