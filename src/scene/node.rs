use crate::scene::NodeHandle;
use crate::scene::action::Action;
use crate::scene::transform::Transform;

/// Armature data: its bones and the animation driving them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Armature {
    pub bones: Vec<NodeHandle>,
    pub action: Option<Action>,
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeKind {
    #[default]
    Empty,
    Armature(Armature),
    Bone,
    Mesh,
}

/// A scene node.
///
/// Nodes form a tree through `parent` and `children`; use
/// [`SceneGraph::attach`](crate::scene::SceneGraph::attach) to keep both
/// sides in sync.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[must_use]
    pub fn armature(&self) -> Option<&Armature> {
        match &self.kind {
            NodeKind::Armature(armature) => Some(armature),
            _ => None,
        }
    }

    pub fn armature_mut(&mut self) -> Option<&mut Armature> {
        match &mut self.kind {
            NodeKind::Armature(armature) => Some(armature),
            _ => None,
        }
    }
}
