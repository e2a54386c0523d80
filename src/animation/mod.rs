//! Keyframe animation.
//!
//! - [`channel`]: the closed set of animated channels and curve keys
//! - [`schedule`]: sorted keyframe lists with sampling
//! - [`clip`]: frame-relative skeletal clips
//! - [`character`]: characters that bake clips into their own schedules
//! - [`path`]: straight-line path walking planned from a clip's cycle offset

mod values;
pub mod channel;
pub mod schedule;
pub mod clip;
pub mod character;
pub mod path;

pub use channel::{Axis, Channel, CurveKey};
pub use schedule::{Keyframe, KeyframeSchedule};
pub use clip::AnimationClip;
pub use character::{CharacterModel, ClipActivation, ClipTrack};
pub use path::{PathPlan, FORWARD_YAW_OFFSET_DEG};
pub use values::Interpolatable;
