//! Error Types
//!
//! This module defines the error types used throughout the choreography engine.
//!
//! # Overview
//!
//! The main error type [`ChoreoError`] covers all failure modes including:
//! - Malformed clip files (no armature, no keyframes, no hip bone)
//! - Invalid use of clips by characters (unknown clip, degenerate cycle)
//! - Scene script grammar violations
//! - I/O, glTF and manifest serialization errors
//!
//! Every error is fatal for an interpreter run: nothing in the engine catches
//! and retries.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ChoreoError>`.
//!
//! ```rust,ignore
//! use choreo::errors::{ChoreoError, Result};
//!
//! fn load_scene() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the choreography engine.
#[derive(Error, Debug)]
pub enum ChoreoError {
    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// The clip file lacks an armature, an action, or keyframes.
    #[error("Invalid clip structure in {}: {reason}", path.display())]
    ClipStructureError {
        /// Source clip file
        path: PathBuf,
        /// What was missing
        reason: String,
    },

    /// No bone name of the clip's armature contains the hip pattern.
    #[error("Rig in {} has no hip bone", path.display())]
    NoHipBoneError {
        /// Source clip file
        path: PathBuf,
    },

    /// A clip without net per-cycle displacement was used for path walking.
    #[error("Clip '{clip}' has no per-cycle displacement and cannot walk a path")]
    DegenerateClipError {
        /// Clip name as registered on the character
        clip: String,
    },

    /// Playing a clip would key frames outside the `i32` frame range.
    #[error("Clip '{clip}' starting at frame {start_frame} runs past the last representable frame")]
    FrameRangeError {
        /// Clip name as registered on the character
        clip: String,
        /// Frame the playback starts on
        start_frame: i32,
    },

    /// A clip name was never attached to the character.
    #[error("Unknown animation '{clip}' on character '{character}'")]
    UnknownClipError {
        /// Character the lookup ran against
        character: String,
        /// The missing clip name
        clip: String,
    },

    // ========================================================================
    // Scene Script Errors
    // ========================================================================
    /// A timeline command references an undeclared character.
    #[error("line {line}: unknown character '{name}'")]
    UnknownCharacterError {
        /// 1-based line number
        line: usize,
        /// The unknown character name
        name: String,
    },

    /// Unknown key in the setup section.
    #[error("line {line}: unknown scene setup command: {text}")]
    UnknownSetupCommandError { line: usize, text: String },

    /// Unknown command in the character section.
    #[error("line {line}: unknown character setup command: {text}")]
    UnknownCharacterCommandError { line: usize, text: String },

    /// Unknown command in the timeline section.
    #[error("line {line}: unknown animation command: {text}")]
    UnknownAnimationCommandError { line: usize, text: String },

    /// An `anim` line appeared before any `CHARACTER` line.
    #[error("line {line}: anim defined before character")]
    AnimBeforeCharacterError { line: usize },

    /// A command had missing or malformed arguments.
    #[error("line {line}: {message}")]
    InvalidArgument { line: usize, message: String },

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error on {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // External Collaborator Errors
    // ========================================================================
    /// An external process finished without producing its output file.
    #[error("{tool} did not produce {}", path.display())]
    MissingOutput { tool: String, path: PathBuf },
}

impl ChoreoError {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Returns the script line the error points at, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownCharacterError { line, .. }
            | Self::UnknownSetupCommandError { line, .. }
            | Self::UnknownCharacterCommandError { line, .. }
            | Self::UnknownAnimationCommandError { line, .. }
            | Self::AnimBeforeCharacterError { line }
            | Self::InvalidArgument { line, .. } => Some(*line),
            _ => None,
        }
    }
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for ChoreoError {
    fn from(err: gltf::Error) -> Self {
        ChoreoError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, ChoreoError>`.
pub type Result<T> = std::result::Result<T, ChoreoError>;
