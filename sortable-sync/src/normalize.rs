use alloc::vec::Vec;

use crate::{EventShape, Item, MalformedEvent, Result, SortableEvent};

/// One moved node, in engine-agnostic form.
///
/// `source_item` is the item that sat at `old_index` in the list the event was normalized
/// against, resolved once here so later stages never re-derive identity from node handles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord<N, T> {
    /// The container the node moved out of.
    pub parent: N,
    pub element: N,
    /// The node the engine left behind in clone pull mode, if any.
    pub clone: Option<N>,
    pub old_index: usize,
    pub new_index: usize,
    pub source_item: Item<T>,
}

struct PreRecord<N> {
    element: N,
    clone: Option<N>,
    old_index: usize,
    new_index: usize,
}

/// Converts a raw engine event into move records, sorted ascending by `old_index`.
///
/// Produces one record for a single-item move, two for a swap (the partner's indices are the
/// dragged item's, reversed) and one per entry for multi-drag. `list` is the list the old
/// indices refer to.
///
/// Fails with [`MalformedEvent`] when a field the detected shape needs is absent, when the
/// multi-drag index lists differ in length, when indices repeat, or when an old index is past
/// the end of `list`. Nothing is mutated either way.
pub fn normalize<N: Clone, T: Clone>(
    list: &[Item<T>],
    event: &SortableEvent<N>,
) -> Result<Vec<MoveRecord<N, T>>> {
    let shape = event.shape();
    let missing = |field| MalformedEvent::MissingField { shape, field };

    let parent = event.from.clone().ok_or_else(|| missing("from"))?;

    let pre = match shape {
        EventShape::Single => {
            let element = event.item.clone().ok_or_else(|| missing("item"))?;
            let old_index = event.old_index.ok_or_else(|| missing("old_index"))?;
            let new_index = event.new_index.ok_or_else(|| missing("new_index"))?;
            alloc::vec![PreRecord {
                element,
                clone: event.clone.clone(),
                old_index,
                new_index,
            }]
        }
        EventShape::Swap => {
            let element = event.item.clone().ok_or_else(|| missing("item"))?;
            let partner = event.swap_item.clone().ok_or_else(|| missing("swap_item"))?;
            let old_index = event.old_index.ok_or_else(|| missing("old_index"))?;
            let new_index = event.new_index.ok_or_else(|| missing("new_index"))?;
            alloc::vec![
                PreRecord {
                    element,
                    clone: event.clone.clone(),
                    old_index,
                    new_index,
                },
                PreRecord {
                    element: partner,
                    clone: None,
                    old_index: new_index,
                    new_index: old_index,
                },
            ]
        }
        EventShape::MultiDrag => {
            let old = &event.old_indicies;
            let new = &event.new_indicies;
            if old.len() != new.len() {
                return Err(MalformedEvent::LengthMismatch {
                    old: old.len(),
                    new: new.len(),
                }
                .into());
            }
            old.iter()
                .zip(new)
                .enumerate()
                .map(|(i, (o, n))| -> Result<PreRecord<N>> {
                    Ok(PreRecord {
                        element: o.node.clone().ok_or_else(|| missing("old_indicies.node"))?,
                        clone: event.clones.get(i).cloned(),
                        old_index: o.index,
                        new_index: n.index.ok_or_else(|| missing("new_indicies.index"))?,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    check_distinct(shape, pre.iter().map(|p| p.old_index))?;
    check_distinct(shape, pre.iter().map(|p| p.new_index))?;

    let mut records = pre
        .into_iter()
        .map(|p| -> Result<MoveRecord<N, T>> {
            let source_item = list
                .get(p.old_index)
                .cloned()
                .ok_or(MalformedEvent::SourceOutOfRange {
                    index: p.old_index,
                    len: list.len(),
                })?;
            Ok(MoveRecord {
                parent: parent.clone(),
                element: p.element,
                clone: p.clone,
                old_index: p.old_index,
                new_index: p.new_index,
                source_item,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    records.sort_by_key(|r| r.old_index);

    strace!(
        shape = ?shape,
        records = records.len(),
        "normalize"
    );
    Ok(records)
}

fn check_distinct(shape: EventShape, indices: impl Iterator<Item = usize>) -> Result<()> {
    let mut seen: Vec<usize> = indices.collect();
    seen.sort_unstable();
    match seen.windows(2).find(|w| w[0] == w[1]) {
        Some(w) => Err(MalformedEvent::DuplicateIndex {
            shape,
            index: w[0],
        }
        .into()),
        None => Ok(()),
    }
}
