use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use sortable_sync::{EventKind, Item, MoveEvent, MoveResult, SortableEvent};

/// Called with the new list after every committed reconciliation.
pub type ListChangeCallback<T> = Arc<dyn Fn(&[Item<T>]) + Send + Sync>;

/// Produces the item left behind when an item is dragged out in clone pull mode.
///
/// The returned item must have an id that does not collide with the list.
pub type CloneFn<T> = Arc<dyn Fn(&Item<T>) -> Item<T> + Send + Sync>;

/// A user callback for one lifecycle event. It runs after internal state has been updated.
pub type EventHandler<N> = Arc<dyn Fn(&SortableEvent<N>) + Send + Sync>;

/// A user callback for the engine's `move` event.
///
/// The second argument is the host's native input event. Returning `None` keeps the engine's
/// default placement.
pub type MoveHandler<N> = Arc<dyn Fn(&MoveEvent<N>, &dyn Any) -> Option<MoveResult> + Send + Sync>;

/// Whether items may leave a group, and how.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GroupPull {
    #[default]
    Allow,
    Deny,
    Clone,
}

/// Lists with the same group name can exchange items.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupOptions {
    pub name: String,
    pub pull: GroupPull,
    pub put: bool,
}

impl GroupOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pull: GroupPull::Allow,
            put: true,
        }
    }

    pub fn with_pull(mut self, pull: GroupPull) -> Self {
        self.pull = pull;
        self
    }

    pub fn with_put(mut self, put: bool) -> Self {
        self.put = put;
        self
    }
}

/// Marker classes the engine and the projector put on item nodes.
///
/// Only `selected` and `chosen` are projected from list state; the rest are passed through to
/// the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassNames {
    pub chosen: String,
    pub selected: String,
    pub drag: String,
    pub fallback: String,
    pub ghost: String,
    pub swap: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            chosen: "sortable-chosen".into(),
            selected: "sortable-selected".into(),
            drag: "sortable-drag".into(),
            fallback: "sortable-fallback".into(),
            ghost: "sortable-ghost".into(),
            swap: "sortable-swap-highlight".into(),
        }
    }
}

/// One engine option key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionKey {
    Disabled,
    Sort,
    Group,
    Handle,
    Filter,
    Draggable,
    Animation,
    Delay,
    MultiDrag,
    MultiDragKey,
    Swap,
    RemoveOnSpill,
    RevertOnSpill,
    ChosenClass,
    SelectedClass,
    DragClass,
    FallbackClass,
    GhostClass,
    SwapClass,
}

impl OptionKey {
    /// The engine's name for this option.
    pub fn name(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Sort => "sort",
            Self::Group => "group",
            Self::Handle => "handle",
            Self::Filter => "filter",
            Self::Draggable => "draggable",
            Self::Animation => "animation",
            Self::Delay => "delay",
            Self::MultiDrag => "multiDrag",
            Self::MultiDragKey => "multiDragKey",
            Self::Swap => "swap",
            Self::RemoveOnSpill => "removeOnSpill",
            Self::RevertOnSpill => "revertOnSpill",
            Self::ChosenClass => "chosenClass",
            Self::SelectedClass => "selectedClass",
            Self::DragClass => "dragClass",
            Self::FallbackClass => "fallbackClass",
            Self::GhostClass => "ghostClass",
            Self::SwapClass => "swapClass",
        }
    }
}

/// A typed option value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionValue {
    Bool(bool),
    Millis(u32),
    Text(Option<String>),
    Group(Option<GroupOptions>),
}

/// A single `option(key, value)` call on a live engine instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionChange {
    pub key: OptionKey,
    pub value: OptionValue,
}

/// The configuration passed through to the external engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineOptions {
    pub disabled: bool,
    /// Whether items can be reordered within the list.
    pub sort: bool,
    pub group: Option<GroupOptions>,
    /// Selector for the drag handle inside each item.
    pub handle: Option<String>,
    /// Selector for items that must not start a drag.
    pub filter: Option<String>,
    pub draggable: Option<String>,
    pub animation_ms: u32,
    pub delay_ms: u32,
    pub multi_drag: bool,
    pub multi_drag_key: Option<String>,
    pub swap: bool,
    pub remove_on_spill: bool,
    pub revert_on_spill: bool,
    pub classes: ClassNames,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            sort: true,
            group: None,
            handle: None,
            filter: None,
            draggable: None,
            animation_ms: 0,
            delay_ms: 0,
            multi_drag: false,
            multi_drag_key: None,
            swap: false,
            remove_on_spill: false,
            revert_on_spill: false,
            classes: ClassNames::default(),
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_group(mut self, group: Option<GroupOptions>) -> Self {
        self.group = group;
        self
    }

    pub fn with_handle(mut self, handle: Option<impl Into<String>>) -> Self {
        self.handle = handle.map(Into::into);
        self
    }

    pub fn with_filter(mut self, filter: Option<impl Into<String>>) -> Self {
        self.filter = filter.map(Into::into);
        self
    }

    pub fn with_draggable(mut self, draggable: Option<impl Into<String>>) -> Self {
        self.draggable = draggable.map(Into::into);
        self
    }

    pub fn with_animation_ms(mut self, animation_ms: u32) -> Self {
        self.animation_ms = animation_ms;
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_multi_drag(mut self, multi_drag: bool) -> Self {
        self.multi_drag = multi_drag;
        self
    }

    /// The modifier key that adds items to a multi-drag selection.
    pub fn with_multi_drag_key(mut self, multi_drag_key: Option<impl Into<String>>) -> Self {
        self.multi_drag_key = multi_drag_key.map(Into::into);
        self
    }

    pub fn with_swap(mut self, swap: bool) -> Self {
        self.swap = swap;
        self
    }

    /// Sets `remove_on_spill` and `revert_on_spill`.
    pub fn with_spill(mut self, remove_on_spill: bool, revert_on_spill: bool) -> Self {
        self.remove_on_spill = remove_on_spill;
        self.revert_on_spill = revert_on_spill;
        self
    }

    pub fn with_classes(mut self, classes: ClassNames) -> Self {
        self.classes = classes;
        self
    }

    /// Every option as a key/value pair, in a fixed key order.
    pub fn entries(&self) -> Vec<OptionChange> {
        use OptionKey as K;
        use OptionValue as V;

        let text = |s: &String| V::Text(Some(s.clone()));
        let c = &self.classes;
        [
            (K::Disabled, V::Bool(self.disabled)),
            (K::Sort, V::Bool(self.sort)),
            (K::Group, V::Group(self.group.clone())),
            (K::Handle, V::Text(self.handle.clone())),
            (K::Filter, V::Text(self.filter.clone())),
            (K::Draggable, V::Text(self.draggable.clone())),
            (K::Animation, V::Millis(self.animation_ms)),
            (K::Delay, V::Millis(self.delay_ms)),
            (K::MultiDrag, V::Bool(self.multi_drag)),
            (K::MultiDragKey, V::Text(self.multi_drag_key.clone())),
            (K::Swap, V::Bool(self.swap)),
            (K::RemoveOnSpill, V::Bool(self.remove_on_spill)),
            (K::RevertOnSpill, V::Bool(self.revert_on_spill)),
            (K::ChosenClass, text(&c.chosen)),
            (K::SelectedClass, text(&c.selected)),
            (K::DragClass, text(&c.drag)),
            (K::FallbackClass, text(&c.fallback)),
            (K::GhostClass, text(&c.ghost)),
            (K::SwapClass, text(&c.swap)),
        ]
        .into_iter()
        .map(|(key, value)| OptionChange { key, value })
        .collect()
    }

    /// The changes that turn `self` into `next`, one per differing key.
    pub fn diff(&self, next: &EngineOptions) -> Vec<OptionChange> {
        self.entries()
            .into_iter()
            .zip(next.entries())
            .filter(|(prev, next)| prev.value != next.value)
            .map(|(_, next)| next)
            .collect()
    }

    /// Whether the spilled node should be dropped from the DOM.
    pub fn removes_on_spill(&self) -> bool {
        self.remove_on_spill && !self.revert_on_spill
    }
}

/// Configuration for [`crate::Binding`].
///
/// Like the engine options, this is cheap to clone: callbacks live in `Arc`s.
pub struct BindingOptions<T, N> {
    pub engine: EngineOptions,
    /// The application's list-replacement callback.
    pub on_list_change: Option<ListChangeCallback<T>>,
    /// Clone function for clone pull mode. Without one, clones get a fresh id.
    pub clone: Option<CloneFn<T>>,
    handlers: [Option<EventHandler<N>>; EventKind::COUNT],
    pub on_move: Option<MoveHandler<N>>,
}

impl<T, N> Clone for BindingOptions<T, N> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            on_list_change: self.on_list_change.clone(),
            clone: self.clone.clone(),
            handlers: self.handlers.clone(),
            on_move: self.on_move.clone(),
        }
    }
}

impl<T, N> Default for BindingOptions<T, N> {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl<T, N> BindingOptions<T, N> {
    pub fn new(engine: EngineOptions) -> Self {
        Self {
            engine,
            on_list_change: None,
            clone: None,
            handlers: core::array::from_fn(|_| None),
            on_move: None,
        }
    }

    pub fn with_engine(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_on_list_change(
        mut self,
        on_list_change: Option<impl Fn(&[Item<T>]) + Send + Sync + 'static>,
    ) -> Self {
        self.on_list_change = on_list_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_clone(
        mut self,
        clone: Option<impl Fn(&Item<T>) -> Item<T> + Send + Sync + 'static>,
    ) -> Self {
        self.clone = clone.map(|f| Arc::new(f) as _);
        self
    }

    /// Registers the user callback for `kind`, replacing any previous one.
    pub fn with_handler(
        mut self,
        kind: EventKind,
        handler: impl Fn(&SortableEvent<N>) + Send + Sync + 'static,
    ) -> Self {
        self.handlers[kind.index()] = Some(Arc::new(handler));
        self
    }

    pub fn with_on_move(
        mut self,
        on_move: impl Fn(&MoveEvent<N>, &dyn Any) -> Option<MoveResult> + Send + Sync + 'static,
    ) -> Self {
        self.on_move = Some(Arc::new(on_move));
        self
    }

    pub fn handler(&self, kind: EventKind) -> Option<&EventHandler<N>> {
        self.handlers[kind.index()].as_ref()
    }
}

impl<T, N> core::fmt::Debug for BindingOptions<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let handled: Vec<&'static str> = EventKind::ALL
            .iter()
            .filter(|k| self.handler(**k).is_some())
            .map(|k| k.name())
            .collect();
        f.debug_struct("BindingOptions")
            .field("engine", &self.engine)
            .field("on_list_change", &self.on_list_change.is_some())
            .field("clone", &self.clone.is_some())
            .field("handlers", &handled)
            .field("on_move", &self.on_move.is_some())
            .finish()
    }
}
