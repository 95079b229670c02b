use alloc::string::String;
use alloc::vec::Vec;

use crate::Dom;

/// A handle into a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    class_name: String,
}

/// An arena-backed element tree implementing [`Dom`].
///
/// Nodes are never freed; removing a node only detaches it, so handles stay valid for the life
/// of the tree (like DOM nodes held by an engine event).
///
/// # Panics
///
/// Every method taking a [`NodeId`], including the [`Dom`] impl, panics if the handle was not
/// created by this tree.
#[derive(Clone, Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(&parent, &child, None);
    }

    /// Creates `count` children of `parent` with the given tag and returns them in order.
    pub fn append_new(&mut self, parent: NodeId, tag: &str, count: usize) -> Vec<NodeId> {
        (0..count)
            .map(|_| {
                let node = self.create_element(tag);
                self.append(parent, node);
                node
            })
            .collect()
    }

    pub fn child_ids(&self, parent: NodeId) -> &[NodeId] {
        &self.nodes[parent.0].children
    }

    /// The `data-id` attribute of every child, in order. Missing attributes read as `""`.
    pub fn data_ids(&self, parent: NodeId) -> Vec<String> {
        self.child_ids(parent)
            .iter()
            .map(|&c| self.attribute(&c, "data-id").unwrap_or_default())
            .collect()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0]
            .class_name
            .split_whitespace()
            .any(|c| c == class)
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn child_count(&self, parent: &NodeId) -> usize {
        self.nodes[parent.0].children.len()
    }

    fn child_at(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.nodes[parent.0].children.get(index).copied()
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
        // Inserting a node before itself leaves it where it is.
        if reference == Some(child) {
            return;
        }
        self.detach(*child);
        let siblings = &mut self.nodes[parent.0].children;
        let at = reference
            .and_then(|r| siblings.iter().position(|c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(at, *child);
        self.nodes[child.0].parent = Some(*parent);
    }

    fn remove(&mut self, node: &NodeId) {
        self.detach(*node);
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.into(),
            ..NodeData::default()
        });
        id
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0]
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let attributes = &mut self.nodes[node.0].attributes;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.into(),
            None => attributes.push((name.into(), value.into())),
        }
    }

    fn class_name(&self, node: &NodeId) -> String {
        self.nodes[node.0].class_name.clone()
    }

    fn set_class_name(&mut self, node: &NodeId, class_name: &str) {
        self.nodes[node.0].class_name = class_name.into();
    }

    fn children(&self, parent: &NodeId) -> Vec<NodeId> {
        self.nodes[parent.0].children.clone()
    }

    fn index_of(&self, node: &NodeId) -> Option<usize> {
        let parent = self.nodes[node.0].parent?;
        self.nodes[parent.0].children.iter().position(|c| c == node)
    }
}
