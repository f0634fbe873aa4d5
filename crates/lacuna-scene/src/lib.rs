//! Lacuna Scene Graph
//!
//! A small retained-mode drawing tree: groups, rectangles, text and paths,
//! each carrying an attribute map, owned by a single [`Scene`].
//!
//! # Handles
//!
//! Nodes are built through handles that borrow the scene:
//!
//! ```
//! use lacuna_scene::Scene;
//!
//! let mut scene = Scene::new();
//! let mut root = scene.root_group();
//! let mut slot = root.append_group().attr("class", "slot");
//! slot.append_rect().attr("x", 10).attr("width", 40);
//! slot.append_text("7");
//!
//! assert_eq!(scene.len(), 3);
//! scene.clear();
//! assert!(scene.is_empty());
//! ```
//!
//! Typed handles only offer what their kind supports. The id-based
//! [`Scene`] API and [`NodeHandle`] check kinds at runtime and report
//! [`Error::CapabilityMismatch`] instead.

mod error;
mod handle;
mod node;
mod scene;
mod svg;

pub use error::{Error, Result};
pub use handle::{GroupHandle, NodeHandle, PathHandle, RectHandle, TextHandle};
pub use node::{AttrValue, Attributes, Node, NodeId, NodeKind};
pub use scene::Scene;
pub use svg::escape;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clear_always_empties(widths in proptest::collection::vec(0u32..500, 0..40)) {
            let mut scene = Scene::new();
            let mut root = scene.root_group();
            for w in &widths {
                let mut g = root.append_group();
                g.append_rect().attr("width", *w as i64);
            }
            prop_assert_eq!(scene.len(), widths.len() * 2);
            scene.clear();
            prop_assert!(scene.is_empty());
            prop_assert!(scene.children(scene.root()).is_empty());
        }

        #[test]
        fn last_attribute_write_wins(values in proptest::collection::vec(-1000i64..1000, 1..20)) {
            let mut scene = Scene::new();
            let id = scene.root_group().append_rect().id();
            for v in &values {
                scene.set_attribute(id, "x", *v).unwrap();
            }
            let last = *values.last().unwrap() as f64;
            prop_assert_eq!(scene.attribute(id, "x").and_then(AttrValue::as_f64), Some(last));
        }
    }
}
