use std::path::PathBuf;

use glam::Vec3;

/// A parsed command together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub line: usize,
    pub command: T,
}

impl<T> Located<T> {
    pub fn new(line: usize, command: T) -> Self {
        Self { line, command }
    }
}

/// Section 1: global scene setup.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupCommand {
    BackgroundImage(PathBuf),
    GroundImage(PathBuf),
    UseWater(bool),
    UseCycles(bool),
    CharacterScale(f32),
    AnimLength(i32),
}

/// Section 2: characters and the clips attached to them.
#[derive(Debug, Clone, PartialEq)]
pub enum CastCommand {
    /// `CHARACTER name`
    Character { name: String },
    /// `anim clipName filePath`, attached to the last declared character.
    Anim { clip: String, path: PathBuf },
}

/// Section 3: what one character does on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    Visible {
        visible: bool,
        frame: i32,
    },
    Position {
        position: Vec3,
        frame: i32,
    },
    /// XYZ Euler angles in degrees.
    Rotation {
        degrees: Vec3,
        frame: i32,
    },
    /// Switches the active clip.
    Animation {
        clip: String,
        frame: i32,
    },
    LoopAnim {
        clip: String,
        start_frame: i32,
        end_frame: i32,
    },
    Path {
        clip: String,
        start: Vec3,
        end: Vec3,
        start_frame: i32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineCommand {
    pub character: String,
    pub action: TimelineAction,
}

/// A scene file split into its three sections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneScript {
    pub setup: Vec<Located<SetupCommand>>,
    pub cast: Vec<Located<CastCommand>>,
    pub timeline: Vec<Located<TimelineCommand>>,
}
