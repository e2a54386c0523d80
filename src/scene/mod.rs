//! Scene graph used while importing clip files.
//!
//! - [`Node`]: hierarchy plus local transform
//! - [`Transform`]: TRS with a cached local matrix
//! - [`SceneGraph`]: node storage, parenting, world matrices and lookups
//! - [`Action`]: absolute-frame curves attached to an armature

pub mod action;
pub mod graph;
pub mod node;
pub mod transform;

pub use action::{Action, FCurve};
pub use graph::SceneGraph;
pub use node::{Armature, Node, NodeKind};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
