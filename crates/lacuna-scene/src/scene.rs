//! The retained scene tree.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::handle::{GroupHandle, NodeHandle};
use crate::node::{AttrValue, Attributes, Node, NodeId, NodeKind};

const ROOT: NodeId = NodeId(0);

/// A persistent tree of drawable nodes.
///
/// The scene owns every node. Each node is reachable from exactly one
/// parent, and removing a node destroys its whole subtree. The root is a
/// group-like surface that can be cleared but not removed.
///
/// Mutations take effect immediately: the next read (or [`to_svg`]) sees
/// them.
///
/// [`to_svg`]: Scene::to_svg
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    parents: HashMap<NodeId, NodeId>,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene containing only an empty root.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT, Node::new(NodeKind::Group, Attributes::default()));
        Self {
            nodes,
            parents: HashMap::new(),
            next_id: 1,
        }
    }

    /// Id of the root surface.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Builder handle on the root surface.
    pub fn root_group(&mut self) -> GroupHandle<'_> {
        GroupHandle::new(self, ROOT)
    }

    /// Dynamic handle on any live node.
    pub fn node(&mut self, id: NodeId) -> Result<NodeHandle<'_>> {
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        Ok(NodeHandle::new(self, id))
    }

    /// Whether `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True when the root has no descendants.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(&id).map(Node::kind)
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Parent of a node; `None` for the root and for dead ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Ordered children of a node (empty for leaves and dead ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(Node::children).unwrap_or(&[])
    }

    /// Read an attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&AttrValue> {
        self.nodes.get(&id).and_then(|n| n.attrs().get(name))
    }

    /// Text content of a text node.
    pub fn content(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).and_then(Node::content)
    }

    /// Destroy every descendant of the root. Idempotent.
    pub fn clear(&mut self) {
        self.clear_children(ROOT);
    }

    /// Create a node under `parent`, which must be a group (or the root).
    pub fn create_child<K, V>(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<NodeId>
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        match self.nodes.get(&parent) {
            None => return Err(Error::NodeNotFound(parent)),
            Some(Node::Group { .. }) => {}
            Some(other) => {
                return Err(Error::CapabilityMismatch {
                    kind: other.kind(),
                    operation: "create_child",
                })
            }
        }
        Ok(self.insert(parent, Node::new(kind, attrs.into_iter().collect())))
    }

    /// Upsert an attribute on any node kind.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::NodeNotFound(id))?;
        node.attrs_mut().set(name, value);
        Ok(())
    }

    /// Replace the content of a text node.
    pub fn set_content(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        match self.nodes.get_mut(&id) {
            None => Err(Error::NodeNotFound(id)),
            Some(Node::Text { content, .. }) => {
                *content = text.into();
                Ok(())
            }
            Some(other) => Err(Error::CapabilityMismatch {
                kind: other.kind(),
                operation: "set_content",
            }),
        }
    }

    /// Detach a node from its parent and destroy its subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == ROOT {
            return Err(Error::RootRemoval);
        }
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        if let Some(parent) = self.parents.get(&id).copied() {
            if let Some(Node::Group { children, .. }) = self.nodes.get_mut(&parent) {
                children.retain(|c| *c != id);
            }
        }
        self.destroy(id);
        Ok(())
    }

    /// Destroy every child of a group, keeping the group itself.
    pub(crate) fn clear_children(&mut self, id: NodeId) {
        let children = match self.nodes.get_mut(&id) {
            Some(Node::Group { children, .. }) => std::mem::take(children),
            _ => return,
        };
        for child in children {
            self.destroy(child);
        }
    }

    /// Add a node under a parent known to be a live group.
    pub(crate) fn insert(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        self.parents.insert(id, parent);
        if let Some(Node::Group { children, .. }) = self.nodes.get_mut(&parent) {
            children.push(id);
        }
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Drop a node and all descendants without touching its parent's list.
    fn destroy(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            self.parents.remove(&next);
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend_from_slice(node.children());
            }
        }
    }
}
