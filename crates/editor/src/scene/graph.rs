//! Parent/child scene graph keyed by [`NodeId`]

use std::collections::HashMap;

use glam::Mat4;

use super::node::{NodeId, SceneNode};

/// Node storage plus the ordered list of top-level nodes
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Insert `node` as a top-level scene child
    pub fn add_root(&mut self, mut node: SceneNode) -> NodeId {
        let id = node.id;
        node.parent = None;
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Append `node` to `parent`'s children. A missing parent makes the
    /// node top-level.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = node.id;
        match self.nodes.get_mut(&parent) {
            Some(p) => {
                p.children.push(id);
                node.parent = Some(parent);
                self.nodes.insert(id, node);
                id
            }
            None => self.add_root(node),
        }
    }

    /// Remove `id` and its whole subtree. Returns how many nodes were removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get(&id) else {
            return 0;
        };
        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        self.remove_subtree(id)
    }

    fn remove_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.remove(&id) else {
            return 0;
        };
        1 + node
            .children
            .into_iter()
            .map(|c| self.remove_subtree(c))
            .sum::<usize>()
    }

    /// Remove every child subtree of `id`, keeping `id` itself
    pub fn clear_children(&mut self, id: NodeId) -> usize {
        let children = self.children(id).to_vec();
        children.into_iter().map(|c| self.remove(c)).sum()
    }

    /// Put `node` in the slot `old` occupies under the same parent, then
    /// drop `old` and its subtree. Returns `None` when `old` is missing.
    pub fn replace(&mut self, old: NodeId, mut node: SceneNode) -> Option<NodeId> {
        let parent = self.nodes.get(&old)?.parent;
        let new_id = node.id;
        node.parent = parent;

        let siblings = match parent {
            Some(p) => &mut self.nodes.get_mut(&p)?.children,
            None => &mut self.roots,
        };
        let slot = siblings.iter().position(|c| *c == old)?;
        siblings[slot] = new_id;

        self.remove_subtree(old);
        self.nodes.insert(new_id, node);
        Some(new_id)
    }

    /// Composed transform from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.nodes.get(&cid) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// `id` followed by all its descendants, depth first
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cid) = stack.pop() {
            if !self.nodes.contains_key(&cid) {
                continue;
            }
            out.push(cid);
            stack.extend(self.children(cid).iter().rev());
        }
        out
    }

    /// Visible state, taking hidden ancestors into account
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.nodes.get(&cid) {
                Some(n) if n.visible => current = n.parent,
                _ => return false,
            }
        }
        true
    }
}
