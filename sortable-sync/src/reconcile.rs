use alloc::format;
use alloc::vec::Vec;

use crate::{Error, Item, ItemId, MoveRecord, Result};

/// How a removal in clone pull mode refills the vacated slots.
pub enum ClonePolicy<'a, T> {
    /// Copy the item and give it an id produced by [`fresh_clone_id`].
    FreshId,
    /// Delegate to an application clone function. It must return a non-colliding id.
    With(&'a dyn Fn(&Item<T>) -> Item<T>),
}

impl<T> core::fmt::Debug for ClonePolicy<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FreshId => f.write_str("FreshId"),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

/// What happened to a list, with the data each kind needs.
#[derive(Debug)]
pub enum ListAction<'a, N, T> {
    /// Items arrived from another container.
    Add(&'a [MoveRecord<N, T>]),
    /// Items left for another container; `clone` is set in clone pull mode.
    Remove {
        records: &'a [MoveRecord<N, T>],
        clone: Option<ClonePolicy<'a, T>>,
    },
    /// Items were reordered within the container.
    Update(&'a [MoveRecord<N, T>]),
    /// A drag started: chosen items become `dragging`.
    Start,
    /// A drag ended: nothing is `dragging` any more.
    End,
    Choose { index: usize },
    Unchoose,
    /// Multi-drag selection changed. Both carry the engine's whole selection after the change;
    /// `None` entries (items being removed) are skipped.
    Select(&'a [Option<usize>]),
    Deselect(&'a [Option<usize>]),
}

/// Derives the next list from `prior` and an action.
///
/// Returns `Ok(None)` when the action changes nothing, so callers can skip a commit. The prior
/// list is never mutated; on error it simply stands.
///
/// Removals run strictly descending by old index and insertions strictly ascending by new index,
/// so no index drifts mid-operation. An index that does not fit the list is a programming error
/// upstream and fails with [`Error::IndexOutOfRange`].
pub fn reconcile<N, T: Clone>(
    prior: &[Item<T>],
    action: &ListAction<'_, N, T>,
) -> Result<Option<Vec<Item<T>>>> {
    let next = match action {
        ListAction::Update(records) => {
            let mut next = prior.to_vec();
            remove_old(&mut next, records)?;
            insert_new(&mut next, records, |r| r.source_item.clone())?;
            next
        }
        ListAction::Add(records) => {
            let mut next = prior.to_vec();
            insert_new(&mut next, records, |r| {
                let mut item = r.source_item.clone();
                item.clear_flags();
                item
            })?;
            check_unique_ids(&next)?;
            next
        }
        ListAction::Remove { records, clone } => {
            let mut next = prior.to_vec();
            remove_old(&mut next, records)?;
            if let Some(policy) = clone {
                refill_with_clones(prior, &mut next, records, policy)?;
                check_unique_ids(&next)?;
            }
            next
        }
        ListAction::Start => {
            return Ok(map_flags(prior, |item| {
                if item.chosen && !item.dragging {
                    item.dragging = true;
                    true
                } else {
                    false
                }
            }));
        }
        ListAction::End => {
            return Ok(map_flags(prior, |item| {
                core::mem::replace(&mut item.dragging, false)
            }));
        }
        ListAction::Choose { index } => {
            check_index(*index, prior.len())?;
            if prior[*index].chosen {
                return Ok(None);
            }
            let mut next = prior.to_vec();
            next[*index].chosen = true;
            next
        }
        ListAction::Unchoose => {
            return Ok(map_flags(prior, |item| {
                core::mem::replace(&mut item.chosen, false)
            }));
        }
        ListAction::Select(indices) | ListAction::Deselect(indices) => {
            return replace_selection(prior, indices);
        }
    };

    strace!(prior = prior.len(), next = next.len(), "reconcile");
    Ok(Some(next))
}

/// Rejects a list that cannot be bound: transient flags set, or ids repeated.
pub fn check_initial_list<T>(list: &[Item<T>]) -> Result<()> {
    if let Some(item) = list.iter().find(|item| item.chosen || item.selected) {
        return Err(Error::ListPrecondition {
            id: item.id.clone(),
        });
    }
    check_unique_ids(list)
}

/// Picks an id for a clone of an item with id `base`.
///
/// Integer ids count down from `-1`; string ids get a `-clone` suffix, then `-clone-2`,
/// `-clone-3`, ... The first candidate for which `taken` is false wins.
pub fn fresh_clone_id(base: &ItemId, taken: impl Fn(&ItemId) -> bool) -> ItemId {
    match base {
        ItemId::Int(_) => (1i64..)
            .map(|n| ItemId::Int(-n))
            .find(|id| !taken(id))
            .unwrap_or(ItemId::Int(i64::MIN)),
        ItemId::Str(s) => {
            let first = ItemId::Str(format!("{s}-clone"));
            if !taken(&first) {
                return first;
            }
            (2u64..)
                .map(|n| ItemId::Str(format!("{s}-clone-{n}")))
                .find(|id| !taken(id))
                .unwrap_or(first)
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(())
}

fn remove_old<N, T>(list: &mut Vec<Item<T>>, records: &[MoveRecord<N, T>]) -> Result<()> {
    let mut olds: Vec<usize> = records.iter().map(|r| r.old_index).collect();
    olds.sort_unstable_by(|a, b| b.cmp(a));
    debug_assert!(
        olds.windows(2).all(|w| w[0] != w[1]),
        "move records must have distinct old indices"
    );
    for index in olds {
        check_index(index, list.len())?;
        list.remove(index);
    }
    Ok(())
}

fn insert_new<N, T>(
    list: &mut Vec<Item<T>>,
    records: &[MoveRecord<N, T>],
    mut item_for: impl FnMut(&MoveRecord<N, T>) -> Item<T>,
) -> Result<()> {
    let mut ascending: Vec<&MoveRecord<N, T>> = records.iter().collect();
    ascending.sort_by_key(|r| r.new_index);
    for r in ascending {
        if r.new_index > list.len() {
            return Err(Error::IndexOutOfRange {
                index: r.new_index,
                len: list.len(),
            });
        }
        list.insert(r.new_index, item_for(r));
    }
    Ok(())
}

fn refill_with_clones<N, T: Clone>(
    prior: &[Item<T>],
    list: &mut Vec<Item<T>>,
    records: &[MoveRecord<N, T>],
    policy: &ClonePolicy<'_, T>,
) -> Result<()> {
    let mut ascending: Vec<&MoveRecord<N, T>> = records.iter().collect();
    ascending.sort_by_key(|r| r.old_index);
    for r in ascending {
        let mut copy = match policy {
            ClonePolicy::With(f) => f(&r.source_item),
            ClonePolicy::FreshId => {
                let id = fresh_clone_id(&r.source_item.id, |id| {
                    prior.iter().chain(list.iter()).any(|item| &item.id == id)
                });
                Item {
                    id,
                    ..r.source_item.clone()
                }
            }
        };
        copy.clear_flags();
        sdebug!(id = %copy.id, index = r.old_index, "reconcile: clone left behind");
        if r.old_index > list.len() {
            return Err(Error::IndexOutOfRange {
                index: r.old_index,
                len: list.len(),
            });
        }
        list.insert(r.old_index, copy);
    }
    Ok(())
}

fn check_unique_ids<T>(list: &[Item<T>]) -> Result<()> {
    let mut ids: Vec<&ItemId> = list.iter().map(|item| &item.id).collect();
    ids.sort_unstable();
    match ids.windows(2).find(|w| w[0] == w[1]) {
        Some(w) => Err(Error::DuplicateId(w[0].clone())),
        None => Ok(()),
    }
}

/// Applies `f` to a copy of every item; `None` if `f` reported no change for any of them.
fn map_flags<T: Clone>(
    prior: &[Item<T>],
    mut f: impl FnMut(&mut Item<T>) -> bool,
) -> Option<Vec<Item<T>>> {
    let mut next = prior.to_vec();
    let mut changed = false;
    for item in &mut next {
        changed |= f(item);
    }
    changed.then_some(next)
}

/// Marks exactly the items at `indices` as selected. `chosen` is left alone.
fn replace_selection<T: Clone>(
    prior: &[Item<T>],
    indices: &[Option<usize>],
) -> Result<Option<Vec<Item<T>>>> {
    let mut next = prior.to_vec();
    for item in &mut next {
        item.selected = false;
    }
    for &index in indices.iter().flatten() {
        check_index(index, next.len())?;
        next[index].selected = true;
    }
    let changed = next.iter().zip(prior).any(|(n, p)| n.selected != p.selected);
    Ok(changed.then_some(next))
}
