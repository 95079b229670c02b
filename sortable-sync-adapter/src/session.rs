use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use sortable_sync::Item;

/// The list snapshot of the drag currently in flight within a group of bindings.
///
/// The origin binding opens it on `start` and closes it on `end`; a destination binding reads it
/// on `add` to resolve which items arrived. Bindings that exchange items must share one session
/// (clones of a session share state). Every binding gets a private session by default.
pub struct DragSession<T> {
    active: Rc<RefCell<Option<Vec<Item<T>>>>>,
}

impl<T> Clone for DragSession<T> {
    fn clone(&self) -> Self {
        Self {
            active: Rc::clone(&self.active),
        }
    }
}

impl<T> Default for DragSession<T> {
    fn default() -> Self {
        Self {
            active: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T> core::fmt::Debug for DragSession<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragSession")
            .field("active", &self.is_active())
            .finish()
    }
}

impl<T> DragSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub(crate) fn begin(&self, origin: Vec<Item<T>>) {
        *self.active.borrow_mut() = Some(origin);
    }

    pub(crate) fn finish(&self) {
        self.active.borrow_mut().take();
    }

    /// Whether `self` and `other` are the same session.
    pub fn same_as(&self, other: &DragSession<T>) -> bool {
        Rc::ptr_eq(&self.active, &other.active)
    }
}

impl<T: Clone> DragSession<T> {
    /// A copy of the origin list as it was when the drag started.
    pub fn snapshot(&self) -> Option<Vec<Item<T>>> {
        self.active.borrow().clone()
    }
}
