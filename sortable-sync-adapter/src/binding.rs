use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use sortable_sync::{
    ClonePolicy, Dom, Error, EventKind, Item, ListAction, MalformedEvent, MoveEvent, MoveRecord,
    MoveResult, Result, Reversal, SortableEvent, check_initial_list, normalize, reconcile, reverse,
};

use crate::project::clear_markers;
use crate::{BindingOptions, DragSession, Render, SortableEngine, project};

enum State<N, I> {
    Unbound,
    Bound { container: N, instance: I },
}

/// Keeps one application list in sync with one engine-controlled container.
///
/// Lifecycle: [`Binding::mount`] attaches the engine once the container exists,
/// [`Binding::set_options`] updates the live engine key by key, and [`Binding::unmount`] destroys
/// it. While bound, the host forwards every engine callback to [`Binding::handle`] (and `move` to
/// [`Binding::handle_move`]).
///
/// Each callback runs one synchronous pipeline: normalize the event, reverse the engine's DOM
/// edits, reconcile the list, commit it (list-change callback, render), project child attributes,
/// then forward the raw event to the user handler for its kind. User handlers therefore always
/// observe post-reconciliation state. The binding is the only writer of its list and container.
pub struct Binding<T, D: Dom, E: SortableEngine<D::Node>> {
    list: Vec<Item<T>>,
    options: BindingOptions<T, D::Node>,
    engine: E,
    render: Box<dyn Render<T, D>>,
    session: DragSession<T>,
    /// Set between this binding's own `start` and `end`.
    drag_origin: bool,
    state: State<D::Node, E::Instance>,
}

impl<T: Clone, D: Dom, E: SortableEngine<D::Node>> Binding<T, D, E> {
    pub fn new(
        list: Vec<Item<T>>,
        options: BindingOptions<T, D::Node>,
        engine: E,
        render: impl Render<T, D> + 'static,
    ) -> Self {
        Self {
            list,
            options,
            engine,
            render: Box::new(render),
            session: DragSession::new(),
            drag_origin: false,
            state: State::Unbound,
        }
    }

    /// Joins `session`, so items can be dragged between this binding and others sharing it.
    pub fn with_session(mut self, session: DragSession<T>) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &DragSession<T> {
        &self.session
    }

    pub fn list(&self) -> &[Item<T>] {
        &self.list
    }

    pub fn options(&self) -> &BindingOptions<T, D::Node> {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, State::Bound { .. })
    }

    /// The container the engine is attached to.
    pub fn container(&self) -> Option<&D::Node> {
        match &self.state {
            State::Bound { container, .. } => Some(container),
            State::Unbound => None,
        }
    }

    pub fn instance(&self) -> Option<&E::Instance> {
        match &self.state {
            State::Bound { instance, .. } => Some(instance),
            State::Unbound => None,
        }
    }

    /// Attaches the engine to `container`.
    ///
    /// The list is checked first (no transient flags, no duplicate ids); a violation fails with
    /// [`Error::ListPrecondition`] or [`Error::DuplicateId`] before anything is rendered or
    /// attached. Mounting while bound destroys the previous engine instance.
    pub fn mount(&mut self, dom: &mut D, container: D::Node) -> Result<()> {
        check_initial_list(&self.list)?;
        if self.is_bound() {
            self.unmount();
        }

        self.render.render(dom, &container, &self.list);
        project(dom, &container, &self.list, &self.options.engine.classes)?;

        let instance = self.engine.create(&container, &self.options.engine);
        adebug!(items = self.list.len(), "Binding::mount");
        self.state = State::Bound {
            container,
            instance,
        };
        Ok(())
    }

    /// Destroys the engine instance. A drag this binding started is abandoned.
    pub fn unmount(&mut self) {
        let State::Bound { instance, .. } = core::mem::replace(&mut self.state, State::Unbound)
        else {
            return;
        };
        self.engine.destroy(instance);
        if core::mem::take(&mut self.drag_origin) {
            self.session.finish();
        }
        adebug!("Binding::unmount");
    }

    /// Replaces the options. While bound, each changed engine key is applied to the live
    /// instance and child attributes are re-projected (marker class names may have changed).
    pub fn set_options(&mut self, dom: &mut D, options: BindingOptions<T, D::Node>) -> Result<()> {
        let State::Bound {
            container,
            instance,
        } = &mut self.state
        else {
            self.options = options;
            return Ok(());
        };

        let changes = self.options.engine.diff(&options.engine);
        adebug!(changes = changes.len(), "Binding::set_options");
        for change in &changes {
            self.engine.set_option(instance, change);
        }
        if self.options.engine.classes != options.engine.classes {
            clear_markers(dom, container, &self.options.engine.classes);
        }
        self.options = options;
        project(dom, container, &self.list, &self.options.engine.classes)
    }

    /// Runs the pipeline for one engine callback.
    ///
    /// On error the interaction is dropped: the list stays at its last committed value and no
    /// user handler runs.
    pub fn handle(&mut self, dom: &mut D, event: &SortableEvent<D::Node>) -> Result<()> {
        let State::Bound { container, .. } = &self.state else {
            awarn!(kind = %event.kind, "Binding::handle: callback while unbound");
            return Err(Error::NotBound);
        };
        let container = container.clone();
        atrace!(kind = %event.kind, shape = ?event.shape(), "Binding::handle");

        let next = match event.kind {
            EventKind::Add => {
                let origin = self
                    .session
                    .snapshot()
                    .ok_or(MalformedEvent::NoActiveDrag)?;
                let records = normalize(&origin, event)?;
                reverse(dom, &records, Reversal::Add)?;
                reconcile(&self.list, &ListAction::Add(&records))?
            }
            EventKind::Remove => {
                let records = normalize(&self.list, event)?;
                let pull_clone = event.is_clone_pull();
                reverse(dom, &records, Reversal::Remove { pull_clone })?;
                let clone = pull_clone.then(|| match &self.options.clone {
                    Some(f) => ClonePolicy::With(&**f),
                    None => ClonePolicy::FreshId,
                });
                reconcile(
                    &self.list,
                    &ListAction::Remove {
                        records: &records,
                        clone,
                    },
                )?
            }
            EventKind::Update => {
                let records = normalize(&self.list, event)?;
                reverse(dom, &records, Reversal::Update)?;
                reconcile(&self.list, &ListAction::Update(&records))?
            }
            EventKind::Start => {
                self.session.begin(self.list.clone());
                self.drag_origin = true;
                reconcile::<D::Node, T>(&self.list, &ListAction::Start)?
            }
            EventKind::End => {
                if core::mem::take(&mut self.drag_origin) {
                    self.session.finish();
                }
                reconcile::<D::Node, T>(&self.list, &ListAction::End)?
            }
            EventKind::Choose => {
                let index = event.old_index.ok_or(MalformedEvent::MissingField {
                    shape: event.shape(),
                    field: "old_index",
                })?;
                reconcile::<D::Node, T>(&self.list, &ListAction::Choose { index })?
            }
            EventKind::Unchoose => reconcile::<D::Node, T>(&self.list, &ListAction::Unchoose)?,
            EventKind::Select | EventKind::Deselect => {
                let indices: Vec<Option<usize>> =
                    event.new_indicies.iter().map(|e| e.index).collect();
                let action = if event.kind == EventKind::Select {
                    ListAction::Select(&indices)
                } else {
                    ListAction::Deselect(&indices)
                };
                reconcile::<D::Node, T>(&self.list, &action)?
            }
            EventKind::Change => {
                if event.is_clone_pull() {
                    if let Some(clone) = &event.clone {
                        dom.remove(clone);
                    }
                }
                None
            }
            EventKind::Spill if self.options.engine.removes_on_spill() => {
                let record = self.spilled_record(&container, event)?;
                dom.remove(&record.element);
                let records = [record];
                reconcile(
                    &self.list,
                    &ListAction::Remove {
                        records: &records,
                        clone: None,
                    },
                )?
            }
            EventKind::Spill => None,
            EventKind::Sort | EventKind::Clone | EventKind::Filter => None,
        };

        if let Some(next) = next {
            self.commit(dom, &container, next)?;
        }
        if let Some(handler) = self.options.handler(event.kind) {
            handler(event);
        }
        Ok(())
    }

    /// Answers the engine's `move` callback.
    ///
    /// Asks the user move handler first; without one, or when it returns `None`, the engine's
    /// default placement stands.
    pub fn handle_move(&self, event: &MoveEvent<D::Node>, native: &dyn Any) -> MoveResult {
        self.options
            .on_move
            .as_ref()
            .and_then(|f| f(event, native))
            .unwrap_or_else(|| MoveResult::default_for(event))
    }

    /// Re-stamps child attributes from the current list.
    pub fn project(&self, dom: &mut D) -> Result<()> {
        let State::Bound { container, .. } = &self.state else {
            return Err(Error::NotBound);
        };
        project(dom, container, &self.list, &self.options.engine.classes)
    }

    /// The item dropped outside every container, resolved against the current list.
    fn spilled_record(
        &self,
        container: &D::Node,
        event: &SortableEvent<D::Node>,
    ) -> Result<MoveRecord<D::Node, T>> {
        let missing = |field| MalformedEvent::MissingField {
            shape: event.shape(),
            field,
        };
        let element = event.item.clone().ok_or_else(|| missing("item"))?;
        let old_index = event.old_index.ok_or_else(|| missing("old_index"))?;
        let source_item = self.list.get(old_index).cloned().ok_or(
            MalformedEvent::SourceOutOfRange {
                index: old_index,
                len: self.list.len(),
            },
        )?;
        Ok(MoveRecord {
            parent: event.from.clone().unwrap_or_else(|| container.clone()),
            element,
            clone: None,
            old_index,
            new_index: old_index,
            source_item,
        })
    }

    fn commit(&mut self, dom: &mut D, container: &D::Node, next: Vec<Item<T>>) -> Result<()> {
        self.list = next;
        if let Some(on_list_change) = &self.options.on_list_change {
            on_list_change(&self.list);
        }
        self.render.render(dom, container, &self.list);
        project(dom, container, &self.list, &self.options.engine.classes)
    }
}

impl<T, D: Dom, E: SortableEngine<D::Node>> core::fmt::Debug for Binding<T, D, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binding")
            .field("items", &self.list.len())
            .field("options", &self.options)
            .field("session", &self.session)
            .field("drag_origin", &self.drag_origin)
            .field("bound", &matches!(self.state, State::Bound { .. }))
            .finish_non_exhaustive()
    }
}
