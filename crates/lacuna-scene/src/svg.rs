//! SVG serialization of a scene.

use std::fmt::Write;

use crate::node::{Attributes, Node, NodeId};
use crate::scene::Scene;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

impl Scene {
    /// Serialize the whole tree as an SVG document.
    ///
    /// Root attributes become attributes of the `<svg>` element. Output is
    /// deterministic: children in creation order, attributes in first-set
    /// order.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let root = self.root();
        out.push_str("<svg xmlns=\"");
        out.push_str(SVG_NS);
        out.push('"');
        if let Some(node) = self.get(root) {
            write_attrs(&mut out, node.attrs());
        }
        out.push('>');
        for child in self.children(root) {
            self.write_node(&mut out, *child);
        }
        out.push_str("</svg>");
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let tag = node.kind().tag();
        out.push('<');
        out.push_str(tag);
        write_attrs(out, node.attrs());
        match node {
            Node::Group { children, .. } => {
                out.push('>');
                for child in children {
                    self.write_node(out, *child);
                }
            }
            Node::Text { content, .. } => {
                out.push('>');
                out.push_str(&escape(content));
            }
            Node::Rect { .. } | Node::Path { .. } => {
                out.push_str("/>");
                return;
            }
        }
        let _ = write!(out, "</{}>", tag);
    }
}

fn write_attrs(out: &mut String, attrs: &Attributes) {
    for (name, value) in attrs.iter() {
        let _ = write!(out, " {}=\"{}\"", name, escape(&value.to_string()));
    }
}

/// Escape text for use in XML content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scene_serializes() {
        let scene = Scene::new();
        assert_eq!(scene.to_svg(), format!("<svg xmlns=\"{}\"></svg>", SVG_NS));
    }

    #[test]
    fn nested_nodes_serialize_in_order() {
        let mut scene = Scene::new();
        let mut root = scene.root_group().attr("viewBox", "0 0 800 300");
        let mut g = root.append_group();
        g.append_rect().attr("x", 50).attr("width", 40);
        g.append_text("4").attr("x", 70);

        let svg = scene.to_svg();
        assert!(svg.contains("viewBox=\"0 0 800 300\""));
        assert!(svg.contains("<g><rect x=\"50\" width=\"40\"/><text x=\"70\">4</text></g>"));
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut scene = Scene::new();
        scene
            .root_group()
            .append_text("a < b & c")
            .attr("title", "\"quoted\"");

        let svg = scene.to_svg();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains("title=\"&quot;quoted&quot;\""));
    }

    #[test]
    fn cleared_scene_drops_markup() {
        let mut scene = Scene::new();
        scene.root_group().append_path().attr("d", "M0 0 L10 10");
        scene.clear();
        assert!(!scene.to_svg().contains("path"));
    }
}
