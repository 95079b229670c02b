use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{Error, Result};

/// The slice of a DOM tree the reconciler needs.
///
/// Implementations wrap a host's element handles (e.g. `web_sys::Element`, or [`crate::NodeId`]
/// for [`crate::MemoryDom`]). Semantics follow the browser DOM:
/// - `insert_before` detaches `child` from its current parent first.
/// - `remove` on a detached node is a no-op.
/// - Only element children count; text nodes are not modelled.
pub trait Dom {
    type Node: Clone + PartialEq + fmt::Debug;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn child_count(&self, parent: &Self::Node) -> usize;

    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;

    /// Inserts `child` before `reference`, or appends it when `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    );

    fn remove(&mut self, node: &Self::Node);

    fn create_element(&mut self, tag: &str) -> Self::Node;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn class_name(&self, node: &Self::Node) -> String;

    fn set_class_name(&mut self, node: &Self::Node, class_name: &str);

    fn children(&self, parent: &Self::Node) -> Vec<Self::Node> {
        (0..self.child_count(parent))
            .filter_map(|i| self.child_at(parent, i))
            .collect()
    }

    fn index_of(&self, node: &Self::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        (0..self.child_count(&parent)).find(|&i| self.child_at(&parent, i).as_ref() == Some(node))
    }
}

/// Inserts `child` so that it becomes child number `index` of `parent`.
///
/// `index == child_count` appends. Anything larger would leave a gap and fails with
/// [`Error::InvalidDomIndex`] before the tree is touched.
pub fn insert_node_at<D: Dom + ?Sized>(
    dom: &mut D,
    parent: &D::Node,
    child: &D::Node,
    index: usize,
) -> Result<()> {
    let len = dom.child_count(parent);
    if index > len {
        return Err(Error::InvalidDomIndex { index, len });
    }
    let reference = dom.child_at(parent, index);
    dom.insert_before(parent, child, reference.as_ref());
    Ok(())
}
