use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::{Armature, Node};

/// Node storage with parent/child bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    roots: Vec<NodeHandle>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.roots.push(handle);
        handle
    }

    /// Adds `node` under `parent`.
    pub fn add_to_parent(&mut self, node: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(node);
        self.attach(handle, parent);
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.roots.iter().position(|&x| x == child) {
            self.roots.remove(i);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Product of local matrices from the root down to `handle`.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Affine3A {
        let mut matrix = Affine3A::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            matrix = node.transform.local_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Depth-first search from the roots, visiting children in order.
    pub fn find_depth_first(&self, pred: impl FnMut(&Node) -> bool) -> Option<NodeHandle> {
        self.search(self.roots.iter().rev().copied().collect(), pred)
    }

    /// Depth-first search of the subtree rooted at `root`, `root` included.
    pub fn find_in_subtree(
        &self,
        root: NodeHandle,
        pred: impl FnMut(&Node) -> bool,
    ) -> Option<NodeHandle> {
        self.search(vec![root], pred)
    }

    fn search(
        &self,
        mut stack: Vec<NodeHandle>,
        mut pred: impl FnMut(&Node) -> bool,
    ) -> Option<NodeHandle> {
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if pred(node) {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// The first armature found depth-first.
    #[must_use]
    pub fn find_armature(&self) -> Option<NodeHandle> {
        self.find_depth_first(|n| n.armature().is_some())
    }

    #[must_use]
    pub fn armature(&self, handle: NodeHandle) -> Option<&Armature> {
        self.nodes.get(handle).and_then(Node::armature)
    }

    pub fn armature_mut(&mut self, handle: NodeHandle) -> Option<&mut Armature> {
        self.nodes.get_mut(handle).and_then(Node::armature_mut)
    }
}
