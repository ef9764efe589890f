use glam::Mat4;

use crate::error::{AnimationError, Result};

/// Name given to the identity node inserted above several scene roots.
pub const SYNTHETIC_ROOT_NAME: &str = "__skeleton_root__";

/// Tree-shaped node description, as handed over by a model loader.
#[derive(Clone, Debug)]
pub struct NodeData {
    pub name: String,
    /// static local transform, used when the node isn't animated
    pub transform: Mat4,
    pub children: Vec<NodeData>,
}

impl NodeData {
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self { name: name.into(), transform, children: vec![] }
    }

    pub fn with_children(mut self, children: Vec<NodeData>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Clone, Debug)]
pub struct SkeletonNode {
    pub name: String,
    pub transform: Mat4,
    /// indices into `SkeletonHierarchy::nodes`
    pub children: Vec<usize>,
}

/// Flattened node tree. Nodes are stored in pre-order, so the root is always index 0.
#[derive(Clone, Debug)]
pub struct SkeletonHierarchy {
    nodes: Vec<SkeletonNode>,
    global_inverse: Mat4,
}

impl SkeletonHierarchy {
    pub const ROOT: usize = 0;

    pub fn from_tree(root: NodeData) -> Self {
        let mut nodes: Vec<SkeletonNode> = vec![];
        let mut stack: Vec<(NodeData, Option<usize>)> = vec![(root, None)];
        while let Some((data, parent)) = stack.pop() {
            let idx = nodes.len();
            nodes.push(SkeletonNode { name: data.name, transform: data.transform, children: vec![] });
            if let Some(parent) = parent {
                nodes[parent].children.push(idx);
            }
            stack.extend(data.children.into_iter().rev().map(|child| (child, Some(idx))));
        }
        let global_inverse = nodes[Self::ROOT].transform.inverse();
        Self { nodes, global_inverse }
    }

    /// Several roots get an identity parent so the result is still a single tree.
    pub fn from_roots(mut roots: Vec<NodeData>) -> Result<Self> {
        match roots.len() {
            0 => Err(AnimationError::EmptyHierarchy),
            1 => Ok(Self::from_tree(roots.remove(0))),
            _ => Ok(Self::from_tree(
                NodeData::new(SYNTHETIC_ROOT_NAME, Mat4::IDENTITY).with_children(roots),
            )),
        }
    }

    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> Option<&SkeletonNode> {
        self.nodes.get(idx)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    /// Inverse of the root's static transform, undoing whatever the asset baked into its root.
    pub fn global_inverse(&self) -> Mat4 {
        self.global_inverse
    }

    /// Pre-order walk. `visit` receives the parent's global transform and returns the node's,
    /// which is then handed to each child.
    pub fn walk<F>(&self, seed: Mat4, mut visit: F)
    where
        F: FnMut(usize, &SkeletonNode, Mat4) -> Mat4,
    {
        let mut stack: Vec<(usize, Mat4)> = Vec::with_capacity(self.nodes.len());
        stack.push((Self::ROOT, seed));
        while let Some((idx, parent_global)) = stack.pop() {
            let node = &self.nodes[idx];
            let global = visit(idx, node, parent_global);
            stack.extend(node.children.iter().rev().map(|child| (*child, global)));
        }
    }
}
