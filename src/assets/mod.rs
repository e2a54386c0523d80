//! Clip loading.
//!
//! [`ClipStore`] imports clip files into its scene graph and extracts
//! [`AnimationClip`](crate::animation::AnimationClip)s from them. The
//! [`ClipSource`] trait is what the scene interpreter depends on.

pub mod clip_store;
pub mod loaders;

pub use clip_store::{ClipSource, ClipStore, extract_clip};
pub use loaders::GltfImporter;
