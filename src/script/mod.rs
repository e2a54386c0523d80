//! Scene scripts.
//!
//! A scene file has three sections, each read strictly in order:
//!
//! ```text
//! BACKGROUND_IMAGE images/beach.png      <- setup
//! CHARACTER_SCALE 2
//! ANIM_LENGTH 120
//! CHARACTER bob                           <- cast
//! anim walk rigged/bob_walk.glb
//! ANIMATION
//! bob path walk -6 -2 0 6 -2 0 0          <- timeline
//! bob visible False 400
//! ```
//!
//! [`parse_script`] turns the text into commands; [`SceneInterpreter`]
//! replays them into a [`SceneDocument`].

pub mod command;
pub mod document;
pub mod interpreter;
pub mod parser;

pub use command::{
    CastCommand, Located, SceneScript, SetupCommand, TimelineAction, TimelineCommand,
};
pub use document::{SceneDocument, SceneSetup};
pub use interpreter::SceneInterpreter;
pub use parser::parse_script;
