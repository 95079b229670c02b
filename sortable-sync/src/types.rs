use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A unique item identity, rendered into the `data-id` attribute of the item's node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ItemId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ItemId {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for ItemId {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// One entry of an ordered list.
///
/// `chosen`, `selected` and `dragging` are live interaction flags owned by the reconciler. They
/// must all be `false` when a list is first bound.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item<T> {
    pub id: ItemId,
    pub chosen: bool,
    pub selected: bool,
    pub dragging: bool,
    pub value: T,
}

impl<T> Item<T> {
    pub fn new(id: impl Into<ItemId>, value: T) -> Self {
        Self {
            id: id.into(),
            chosen: false,
            selected: false,
            dragging: false,
            value,
        }
    }

    /// Returns `true` if any transient interaction flag is set.
    pub fn is_dirty(&self) -> bool {
        self.chosen || self.selected || self.dragging
    }

    pub(crate) fn clear_flags(&mut self) {
        self.chosen = false;
        self.selected = false;
        self.dragging = false;
    }
}

/// The named lifecycle callbacks an engine emits with a [`SortableEvent`] payload.
///
/// `move` is not listed here: it carries a [`MoveEvent`] and answers with a [`MoveResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EventKind {
    Add,
    Update,
    Remove,
    Start,
    End,
    Choose,
    Unchoose,
    Select,
    Deselect,
    Sort,
    Change,
    Clone,
    Filter,
    Spill,
}

impl EventKind {
    pub const COUNT: usize = 14;

    pub const ALL: [EventKind; Self::COUNT] = [
        Self::Add,
        Self::Update,
        Self::Remove,
        Self::Start,
        Self::End,
        Self::Choose,
        Self::Unchoose,
        Self::Select,
        Self::Deselect,
        Self::Sort,
        Self::Change,
        Self::Clone,
        Self::Filter,
        Self::Spill,
    ];

    /// The engine's name for this callback.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Start => "start",
            Self::End => "end",
            Self::Choose => "choose",
            Self::Unchoose => "unchoose",
            Self::Select => "select",
            Self::Deselect => "deselect",
            Self::Sort => "sort",
            Self::Change => "change",
            Self::Clone => "clone",
            Self::Filter => "filter",
            Self::Spill => "spill",
        }
    }

    /// Dense index in `0..COUNT`, usable for per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the three raw payload shapes an event carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventShape {
    Single,
    Swap,
    MultiDrag,
}

impl fmt::Display for EventShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single-item",
            Self::Swap => "swap",
            Self::MultiDrag => "multi-drag",
        })
    }
}

/// How items leave a container when dragged into another one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PullMode {
    /// The item moves.
    #[default]
    Move,
    /// The original stays behind and a copy travels.
    Clone,
}

/// A multi-drag "old index" entry: the item's previous position and its node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiDragEntry<N> {
    pub index: usize,
    pub node: Option<N>,
}

/// A multi-drag "new index" entry.
///
/// `index` is `None` when the engine reports `-1`, i.e. the item is being removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiDragIndex<N> {
    pub index: Option<usize>,
    pub node: Option<N>,
}

/// A raw engine event, as delivered to a lifecycle callback.
///
/// Which optional fields are populated depends on the shape (see [`SortableEvent::shape`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortableEvent<N> {
    pub kind: EventKind,
    /// The dragged node.
    pub item: Option<N>,
    /// The container the drag started in.
    pub from: Option<N>,
    /// The container the drag ended in.
    pub to: Option<N>,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
    /// The node the engine left behind in clone pull mode.
    pub clone: Option<N>,
    /// The swap partner, when the swap plugin is active.
    pub swap_item: Option<N>,
    pub old_indicies: Vec<MultiDragEntry<N>>,
    pub new_indicies: Vec<MultiDragIndex<N>>,
    /// Per-item clone nodes for multi-drag in clone pull mode.
    pub clones: Vec<N>,
    pub pull_mode: Option<PullMode>,
}

impl<N> SortableEvent<N> {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            item: None,
            from: None,
            to: None,
            old_index: None,
            new_index: None,
            clone: None,
            swap_item: None,
            old_indicies: Vec::new(),
            new_indicies: Vec::new(),
            clones: Vec::new(),
            pull_mode: None,
        }
    }

    /// Multi-drag wins when its index list is non-empty, then swap, then single-item.
    pub fn shape(&self) -> EventShape {
        if !self.old_indicies.is_empty() {
            EventShape::MultiDrag
        } else if self.swap_item.is_some() {
            EventShape::Swap
        } else {
            EventShape::Single
        }
    }

    pub fn is_clone_pull(&self) -> bool {
        self.pull_mode == Some(PullMode::Clone)
    }

    pub fn with_item(mut self, item: N) -> Self {
        self.item = Some(item);
        self
    }

    /// Sets both `from` and `to`.
    pub fn with_container(mut self, container: N) -> Self
    where
        N: Clone,
    {
        self.from = Some(container.clone());
        self.to = Some(container);
        self
    }

    pub fn with_from(mut self, from: N) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: N) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_indices(mut self, old_index: usize, new_index: usize) -> Self {
        self.old_index = Some(old_index);
        self.new_index = Some(new_index);
        self
    }

    pub fn with_clone(mut self, clone: N) -> Self {
        self.clone = Some(clone);
        self
    }

    pub fn with_swap_item(mut self, swap_item: N) -> Self {
        self.swap_item = Some(swap_item);
        self
    }

    pub fn with_multi_drag(
        mut self,
        old_indicies: Vec<MultiDragEntry<N>>,
        new_indicies: Vec<MultiDragIndex<N>>,
    ) -> Self {
        self.old_indicies = old_indicies;
        self.new_indicies = new_indicies;
        self
    }

    pub fn with_clones(mut self, clones: Vec<N>) -> Self {
        self.clones = clones;
        self
    }

    pub fn with_pull_mode(mut self, pull_mode: PullMode) -> Self {
        self.pull_mode = Some(pull_mode);
        self
    }
}

/// The payload of the engine's `move` callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveEvent<N> {
    pub from: N,
    pub to: N,
    pub dragged: N,
    /// The node the dragged one is being placed next to.
    pub related: N,
    pub will_insert_after: bool,
}

/// The answer to a `move` callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    InsertBefore,
    InsertAfter,
    Reject,
}

impl MoveResult {
    /// What the engine would do on its own.
    pub fn default_for<N>(event: &MoveEvent<N>) -> Self {
        if event.will_insert_after {
            Self::InsertAfter
        } else {
            Self::InsertBefore
        }
    }
}
