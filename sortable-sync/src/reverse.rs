use alloc::vec::Vec;

use crate::{Dom, Error, MalformedEvent, MoveRecord, Result, insert_node_at};

/// Which engine edit is being undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reversal {
    /// Nodes arrived from a foreign container: detach them. The UI layer renders its own node for
    /// every item it keeps.
    Add,
    /// Nodes left for another container: put them back at their old index. With `pull_clone`,
    /// the clone nodes the engine left behind are detached afterwards.
    Remove { pull_clone: bool },
    /// Nodes were reordered in place: detach and re-attach at the old index.
    Update,
}

/// A single DOM edit in a reversal plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<N> {
    Detach(N),
    /// Make `node` child number `index` of `parent`, counted after `node` is detached.
    Insert { parent: N, node: N, index: usize },
}

/// Builds the ordered edits that undo the engine's DOM moves for `records`.
///
/// Removals run descending by old index, insertions ascending, so no step shifts a target that
/// is still waiting to be placed.
pub fn plan<N: Clone, T>(records: &[MoveRecord<N, T>], reversal: Reversal) -> Result<Vec<Step<N>>> {
    let mut ascending: Vec<&MoveRecord<N, T>> = records.iter().collect();
    ascending.sort_by_key(|r| r.old_index);

    let detach_all = |steps: &mut Vec<Step<N>>| {
        for r in ascending.iter().rev() {
            steps.push(Step::Detach(r.element.clone()));
        }
    };
    let insert_all = |steps: &mut Vec<Step<N>>| {
        for r in &ascending {
            steps.push(Step::Insert {
                parent: r.parent.clone(),
                node: r.element.clone(),
                index: r.old_index,
            });
        }
    };

    let mut steps = Vec::with_capacity(records.len() * 2);
    match reversal {
        Reversal::Add => detach_all(&mut steps),
        Reversal::Update => {
            detach_all(&mut steps);
            insert_all(&mut steps);
        }
        Reversal::Remove { pull_clone: false } => insert_all(&mut steps),
        Reversal::Remove { pull_clone: true } => {
            // Each clone still holds its original's old slot, so every original placed earlier
            // pushes the later targets one slot to the right.
            let clones = ascending
                .iter()
                .map(|r| r.clone.clone().ok_or(MalformedEvent::MissingClone))
                .collect::<core::result::Result<Vec<N>, _>>()?;
            for (rank, r) in ascending.iter().enumerate() {
                steps.push(Step::Insert {
                    parent: r.parent.clone(),
                    node: r.element.clone(),
                    index: r.old_index + rank,
                });
            }
            steps.extend(clones.into_iter().map(Step::Detach));
        }
    }
    Ok(steps)
}

/// Undoes the engine's DOM moves described by `records`.
///
/// The plan is dry-run against a copy of the affected child lists first, so an out-of-range
/// insertion fails with [`Error::InvalidDomIndex`] before any node is touched.
pub fn reverse<D: Dom, T>(
    dom: &mut D,
    records: &[MoveRecord<D::Node, T>],
    reversal: Reversal,
) -> Result<()> {
    let steps = plan(records, reversal)?;
    if let Err(err) = Shadow::default().dry_run(dom, &steps) {
        swarn!(reversal = ?reversal, error = %err, "reverse: plan rejected, DOM untouched");
        return Err(err);
    }

    strace!(reversal = ?reversal, steps = steps.len(), "reverse");
    for step in &steps {
        match step {
            Step::Detach(node) => dom.remove(node),
            Step::Insert {
                parent,
                node,
                index,
            } => {
                dom.remove(node);
                insert_node_at(dom, parent, node, *index)?;
            }
        }
    }
    Ok(())
}

/// Copies of the child lists a plan touches, edited instead of the real tree.
struct Shadow<N> {
    parents: Vec<(N, Vec<N>)>,
}

impl<N> Default for Shadow<N> {
    fn default() -> Self {
        Self {
            parents: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> Shadow<N> {
    fn dry_run<D: Dom<Node = N>>(&mut self, dom: &D, steps: &[Step<N>]) -> Result<()> {
        for step in steps {
            match step {
                Step::Detach(node) => self.detach(dom, node),
                Step::Insert {
                    parent,
                    node,
                    index,
                } => {
                    self.detach(dom, node);
                    let children = self.load(dom, parent);
                    if *index > children.len() {
                        return Err(Error::InvalidDomIndex {
                            index: *index,
                            len: children.len(),
                        });
                    }
                    children.insert(*index, node.clone());
                }
            }
        }
        Ok(())
    }

    fn load<D: Dom<Node = N>>(&mut self, dom: &D, parent: &N) -> &mut Vec<N> {
        let pos = match self.parents.iter().position(|(p, _)| p == parent) {
            Some(pos) => pos,
            None => {
                self.parents.push((parent.clone(), dom.children(parent)));
                self.parents.len() - 1
            }
        };
        &mut self.parents[pos].1
    }

    fn detach<D: Dom<Node = N>>(&mut self, dom: &D, node: &N) {
        // Loading the real parent first keeps the shadow complete for nodes not yet touched.
        if let Some(parent) = dom.parent(node) {
            self.load(dom, &parent);
        }
        for (_, children) in &mut self.parents {
            children.retain(|c| c != node);
        }
    }
}
