//! Drawable node types.

use std::fmt;

/// Identifier of a node inside one [`Scene`](crate::Scene).
///
/// Ids are never reused, so an id held past the removal of its node
/// resolves to [`Error::NodeNotFound`](crate::Error::NodeNotFound) rather
/// than to some unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Get the raw id value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four drawable kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Container holding an ordered list of children
    Group,
    /// Axis-aligned rectangle
    Rect,
    /// Text run with string content
    Text,
    /// Free-form vector path
    Path,
}

impl NodeKind {
    /// SVG element name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Group => "g",
            NodeKind::Rect => "rect",
            NodeKind::Text => "text",
            NodeKind::Path => "path",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Group => "group",
            NodeKind::Rect => "rectangle",
            NodeKind::Text => "text",
            NodeKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// An attribute value: either a string or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Num(f64),
}

impl AttrValue {
    /// Numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Num(n) => Some(*n),
            AttrValue::Str(_) => None,
        }
    }

    /// String value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s.as_str()),
            AttrValue::Num(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            // Integral values print without a trailing ".0"
            AttrValue::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            AttrValue::Num(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Num(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Num(n as f64)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Num(n as f64)
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        AttrValue::Num(n as f64)
    }
}

/// Attribute map that keeps first-insertion order.
///
/// Upserts overwrite in place, so the serialized order is stable no matter
/// how often an attribute is rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    /// Insert or overwrite an attribute (last write wins).
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::default();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// A drawable node. Only groups own children; only text carries content.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group {
        attrs: Attributes,
        children: Vec<NodeId>,
    },
    Rect {
        attrs: Attributes,
    },
    Text {
        attrs: Attributes,
        content: String,
    },
    Path {
        attrs: Attributes,
    },
}

impl Node {
    /// Create an empty node of the given kind.
    pub fn new(kind: NodeKind, attrs: Attributes) -> Self {
        match kind {
            NodeKind::Group => Node::Group {
                attrs,
                children: Vec::new(),
            },
            NodeKind::Rect => Node::Rect { attrs },
            NodeKind::Text => Node::Text {
                attrs,
                content: String::new(),
            },
            NodeKind::Path => Node::Path { attrs },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group { .. } => NodeKind::Group,
            Node::Rect { .. } => NodeKind::Rect,
            Node::Text { .. } => NodeKind::Text,
            Node::Path { .. } => NodeKind::Path,
        }
    }

    pub fn attrs(&self) -> &Attributes {
        match self {
            Node::Group { attrs, .. }
            | Node::Rect { attrs }
            | Node::Text { attrs, .. }
            | Node::Path { attrs } => attrs,
        }
    }

    pub fn attrs_mut(&mut self) -> &mut Attributes {
        match self {
            Node::Group { attrs, .. }
            | Node::Rect { attrs }
            | Node::Text { attrs, .. }
            | Node::Path { attrs } => attrs,
        }
    }

    /// Child ids; empty for leaf kinds.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Group { children, .. } => children.as_slice(),
            _ => &[],
        }
    }

    /// Text content; `None` for kinds without content.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Text { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }
}
