use alloc::string::{String, ToString};
use alloc::vec::Vec;

use sortable_sync::{Dom, Error, Item, Result};

use crate::ClassNames;

/// The attribute the engine reads to re-identify items.
pub const DATA_ID: &str = "data-id";

/// Stamps every child of `container` with the identity and state of the item at the same index.
///
/// Sets `data-id` to the item id, and adds or removes the `selected`/`chosen` marker classes to
/// match the item's flags. Other classes on the node are kept. Running it twice without a list
/// change leaves the DOM unchanged.
///
/// A child count that differs from the list length means an upstream reconciliation bug and
/// fails with [`Error::ProjectionMismatch`] before any node is stamped.
pub fn project<T, D: Dom>(
    dom: &mut D,
    container: &D::Node,
    list: &[Item<T>],
    classes: &ClassNames,
) -> Result<()> {
    let children = dom.children(container);
    if children.len() != list.len() {
        awarn!(
            children = children.len(),
            items = list.len(),
            "project: child count mismatch"
        );
        return Err(Error::ProjectionMismatch {
            children: children.len(),
            items: list.len(),
        });
    }

    for (node, item) in children.iter().zip(list) {
        dom.set_attribute(node, DATA_ID, &item.id.to_string());
        let current = dom.class_name(node);
        let next = toggle_classes(
            &current,
            &[
                (classes.selected.as_str(), item.selected),
                (classes.chosen.as_str(), item.chosen),
            ],
        );
        if next != current {
            dom.set_class_name(node, &next);
        }
    }
    atrace!(items = list.len(), "project");
    Ok(())
}

/// Strips the `selected`/`chosen` marker classes named in `classes` from every child.
///
/// Used before marker class names change, so nodes do not keep the old ones.
pub(crate) fn clear_markers<D: Dom>(dom: &mut D, container: &D::Node, classes: &ClassNames) {
    for node in dom.children(container) {
        let current = dom.class_name(&node);
        let next = toggle_classes(
            &current,
            &[
                (classes.selected.as_str(), false),
                (classes.chosen.as_str(), false),
            ],
        );
        if next != current {
            dom.set_class_name(&node, &next);
        }
    }
}

/// Drops every class named in `states`, then re-adds the ones whose flag is set.
fn toggle_classes(current: &str, states: &[(&str, bool)]) -> String {
    let mut classes: Vec<&str> = current
        .split_whitespace()
        .filter(|c| !states.iter().any(|(name, _)| name == c))
        .collect();
    for &(name, on) in states {
        if on && !name.is_empty() && !classes.contains(&name) {
            classes.push(name);
        }
    }
    classes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::toggle_classes;

    #[test]
    fn toggle_keeps_foreign_classes() {
        assert_eq!(
            toggle_classes("row sortable-chosen", &[("sortable-chosen", false)]),
            "row"
        );
        assert_eq!(
            toggle_classes("row", &[("a", true), ("b", false), ("c", true)]),
            "row a c"
        );
        assert_eq!(toggle_classes("", &[("a", false)]), "");
    }
}
