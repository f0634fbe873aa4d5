//! Builder handles over scene nodes.
//!
//! Typed handles ([`GroupHandle`], [`RectHandle`], [`TextHandle`],
//! [`PathHandle`]) expose only the operations their kind supports, so code
//! written against them cannot hit a capability mismatch. A [`NodeHandle`]
//! is the dynamic form: it narrows to a typed handle with `as_*`, failing
//! with [`Error::CapabilityMismatch`] when the kind is wrong.
//!
//! A handle mutably borrows its scene and is only constructed for a live
//! node of the right kind, which is what makes the typed operations
//! infallible.

use crate::error::{Error, Result};
use crate::node::{AttrValue, Attributes, Node, NodeId, NodeKind};
use crate::scene::Scene;

macro_rules! leaf_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<'a> {
            scene: &'a mut Scene,
            id: NodeId,
        }

        impl<'a> $name<'a> {
            pub fn id(&self) -> NodeId {
                self.id
            }

            /// Set an attribute and keep building.
            pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
                self.set_attribute(name, value);
                self
            }

            /// Upsert an attribute.
            pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
                if let Some(node) = self.scene.node_mut(self.id) {
                    node.attrs_mut().set(name, value);
                }
            }

            pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
                self.scene.attribute(self.id, name)
            }

            /// Detach and destroy this node.
            pub fn remove(self) {
                // Live non-root node by construction, so this cannot fail.
                let _ = self.scene.remove(self.id);
            }
        }
    };
}

leaf_handle!(
    /// Handle on a rectangle node.
    RectHandle
);
leaf_handle!(
    /// Handle on a text node.
    TextHandle
);
leaf_handle!(
    /// Handle on a path node.
    PathHandle
);

impl TextHandle<'_> {
    /// Set the content and keep building.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.set_content(content);
        self
    }

    pub fn set_content(&mut self, text: impl Into<String>) {
        if let Some(Node::Text { content, .. }) = self.scene.node_mut(self.id) {
            *content = text.into();
        }
    }

    pub fn content(&self) -> &str {
        self.scene.content(self.id).unwrap_or_default()
    }
}

/// Handle on a group node (or the root surface).
pub struct GroupHandle<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl<'a> GroupHandle<'a> {
    pub(crate) fn new(scene: &'a mut Scene, id: NodeId) -> Self {
        Self { scene, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Set an attribute and keep building.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        if let Some(node) = self.scene.node_mut(self.id) {
            node.attrs_mut().set(name, value);
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.scene.attribute(self.id, name)
    }

    pub fn children(&self) -> &[NodeId] {
        self.scene.children(self.id)
    }

    /// Destroy every child, keeping this group.
    pub fn clear(&mut self) {
        self.scene.clear_children(self.id);
    }

    pub fn append_group(&mut self) -> GroupHandle<'_> {
        let id = self.append(NodeKind::Group);
        GroupHandle {
            scene: &mut *self.scene,
            id,
        }
    }

    pub fn append_rect(&mut self) -> RectHandle<'_> {
        let id = self.append(NodeKind::Rect);
        RectHandle {
            scene: &mut *self.scene,
            id,
        }
    }

    pub fn append_text(&mut self, content: impl Into<String>) -> TextHandle<'_> {
        let id = self.append(NodeKind::Text);
        TextHandle {
            scene: &mut *self.scene,
            id,
        }
        .text(content)
    }

    pub fn append_path(&mut self) -> PathHandle<'_> {
        let id = self.append(NodeKind::Path);
        PathHandle {
            scene: &mut *self.scene,
            id,
        }
    }

    /// Detach and destroy this group. The root cannot be detached, so on
    /// the root this clears it instead.
    pub fn remove(self) {
        if self.id == self.scene.root() {
            self.scene.clear();
        } else {
            let _ = self.scene.remove(self.id);
        }
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        self.scene
            .insert(self.id, Node::new(kind, Attributes::default()))
    }
}

/// Kind-erased handle; narrow it with the `as_*` methods.
pub struct NodeHandle<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl<'a> NodeHandle<'a> {
    pub(crate) fn new(scene: &'a mut Scene, id: NodeId) -> Self {
        Self { scene, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        // Liveness is checked in `Scene::node`.
        self.scene.kind(self.id).unwrap_or(NodeKind::Group)
    }

    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        self.scene.set_attribute(self.id, name, value)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.scene.attribute(self.id, name)
    }

    /// Set text content; fails unless this is a text node.
    pub fn set_content(&mut self, text: impl Into<String>) -> Result<()> {
        self.scene.set_content(self.id, text)
    }

    /// Create a child; fails unless this is a group.
    pub fn create_child(&mut self, kind: NodeKind) -> Result<NodeId> {
        self.scene
            .create_child(self.id, kind, std::iter::empty::<(String, AttrValue)>())
    }

    pub fn remove(self) -> Result<()> {
        self.scene.remove(self.id)
    }

    pub fn as_group(self) -> Result<GroupHandle<'a>> {
        self.expect_kind(NodeKind::Group, "as_group")?;
        Ok(GroupHandle {
            scene: self.scene,
            id: self.id,
        })
    }

    pub fn as_rect(self) -> Result<RectHandle<'a>> {
        self.expect_kind(NodeKind::Rect, "as_rect")?;
        Ok(RectHandle {
            scene: self.scene,
            id: self.id,
        })
    }

    pub fn as_text(self) -> Result<TextHandle<'a>> {
        self.expect_kind(NodeKind::Text, "as_text")?;
        Ok(TextHandle {
            scene: self.scene,
            id: self.id,
        })
    }

    pub fn as_path(self) -> Result<PathHandle<'a>> {
        self.expect_kind(NodeKind::Path, "as_path")?;
        Ok(PathHandle {
            scene: self.scene,
            id: self.id,
        })
    }

    fn expect_kind(&self, wanted: NodeKind, operation: &'static str) -> Result<()> {
        let kind = self.kind();
        if kind == wanted {
            Ok(())
        } else {
            Err(Error::CapabilityMismatch { kind, operation })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chains_attributes() {
        let mut scene = Scene::new();
        let rect = scene
            .root_group()
            .append_rect()
            .attr("x", 10)
            .attr("fill", "white")
            .id();

        assert_eq!(scene.attribute(rect, "x"), Some(&AttrValue::Num(10.0)));
        assert_eq!(
            scene.attribute(rect, "fill").and_then(AttrValue::as_str),
            Some("white")
        );
    }

    #[test]
    fn nested_groups_build_a_tree() {
        let mut scene = Scene::new();
        let mut root = scene.root_group();
        let mut slot = root.append_group().attr("class", "slot");
        slot.append_rect().attr("width", 40);
        slot.append_text("7").attr("text-anchor", "middle");
        let slot_id = slot.id();

        assert_eq!(scene.children(slot_id).len(), 2);
        let text = scene.children(slot_id)[1];
        assert_eq!(scene.content(text), Some("7"));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn dynamic_handle_narrows_by_kind() {
        let mut scene = Scene::new();
        let path = scene.root_group().append_path().attr("d", "M0 0").id();

        let err = scene.node(path).unwrap().as_text().err();
        assert_eq!(
            err,
            Some(Error::CapabilityMismatch {
                kind: NodeKind::Path,
                operation: "as_text",
            })
        );

        let handle = scene.node(path).unwrap().as_path().unwrap();
        assert_eq!(handle.attribute("d"), Some(&AttrValue::Str("M0 0".into())));
    }

    #[test]
    fn dynamic_set_content_rejects_rect() {
        let mut scene = Scene::new();
        let rect = scene.root_group().append_rect().attr("x", 3).id();

        let mut node = scene.node(rect).unwrap();
        assert!(matches!(
            node.set_content("nope"),
            Err(Error::CapabilityMismatch { kind: NodeKind::Rect, .. })
        ));
        assert!(matches!(
            node.create_child(NodeKind::Text),
            Err(Error::CapabilityMismatch { .. })
        ));
        assert_eq!(scene.attribute(rect, "x"), Some(&AttrValue::Num(3.0)));
    }

    #[test]
    fn text_handle_updates_content() {
        let mut scene = Scene::new();
        let mut root = scene.root_group();
        let mut label = root.append_text("before");
        label.set_content("after");
        assert_eq!(label.content(), "after");
    }

    #[test]
    fn handle_remove_detaches() {
        let mut scene = Scene::new();
        let mut root = scene.root_group();
        root.append_rect().remove();
        assert!(scene.is_empty());
    }

    #[test]
    fn unknown_node_is_reported() {
        let mut scene = Scene::new();
        let id = scene.root_group().append_rect().id();
        scene.clear();
        assert_eq!(scene.node(id).err(), Some(Error::NodeNotFound(id)));
    }
}
