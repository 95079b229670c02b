use alloc::string::String;
use alloc::vec::Vec;

use sortable_sync::{Dom, Item, ItemId};

/// The UI layer's "render list → DOM" step.
///
/// After a reconciliation is committed, the binding asks the renderer to make the container's
/// children match the list, one child per item, in order.
pub trait Render<T, D: Dom> {
    fn render(&mut self, dom: &mut D, container: &D::Node, list: &[Item<T>]);
}

/// A keyed renderer: one node per item id, created on first sight and reused while the id stays
/// in the list.
///
/// It only touches nodes it created. Anything else left in the container (for example a node the
/// engine failed to hand back) stays put and surfaces as a projection mismatch.
#[derive(Clone, Debug)]
pub struct KeyedRender<N> {
    tag: String,
    nodes: Vec<(ItemId, N)>,
}

impl<N> KeyedRender<N> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            nodes: Vec::new(),
        }
    }

    /// The node currently rendered for `id`.
    pub fn node_for(&self, id: &ItemId) -> Option<&N> {
        self.nodes.iter().find(|(k, _)| k == id).map(|(_, n)| n)
    }
}

impl<T, D: Dom> Render<T, D> for KeyedRender<D::Node> {
    fn render(&mut self, dom: &mut D, container: &D::Node, list: &[Item<T>]) {
        let mut next = Vec::with_capacity(list.len());
        for item in list {
            let node = match self.nodes.iter().position(|(k, _)| *k == item.id) {
                Some(pos) => self.nodes.swap_remove(pos).1,
                None => dom.create_element(&self.tag),
            };
            next.push((item.id.clone(), node));
        }
        for (_, stale) in self.nodes.drain(..) {
            dom.remove(&stale);
        }
        for (_, node) in &next {
            dom.remove(node);
        }
        for (_, node) in &next {
            dom.insert_before(container, node, None);
        }
        self.nodes = next;
    }
}
