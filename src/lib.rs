#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod export;
pub mod pipeline;
pub mod scene;
pub mod script;
pub mod settings;

pub use animation::{AnimationClip, CharacterModel, Keyframe, KeyframeSchedule, PathPlan};
pub use assets::{ClipSource, ClipStore};
pub use errors::{ChoreoError, Result};
pub use export::{RenderManifest, write_manifest};
pub use pipeline::{BlenderProcess, ProcessSettings, RenderCollaborator, RiggingCollaborator};
pub use scene::SceneGraph;
pub use script::{SceneDocument, SceneInterpreter, parse_script};
pub use settings::{ChoreoSettings, RenderEngine};
