use crate::*;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use std::sync::{Arc, Mutex};

use sortable_sync::Dom as _;
use sortable_sync::{
    Error, EventKind, EventShape, Item, ItemId, MalformedEvent, MemoryDom, MoveEvent, MoveResult,
    MultiDragEntry, MultiDragIndex, NodeId, PullMode, SortableEvent, insert_node_at,
};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Create(NodeId, u32),
    Set(u32, OptionChange),
    Destroy(u32),
}

/// Records what the binding asks of the engine; instances are plain counters.
#[derive(Debug, Default)]
struct RecordingEngine {
    next: u32,
    calls: Vec<Call>,
}

impl SortableEngine<NodeId> for RecordingEngine {
    type Instance = u32;

    fn create(&mut self, container: &NodeId, _options: &EngineOptions) -> u32 {
        let id = self.next;
        self.next += 1;
        self.calls.push(Call::Create(*container, id));
        id
    }

    fn set_option(&mut self, instance: &mut u32, change: &OptionChange) {
        self.calls.push(Call::Set(*instance, change.clone()));
    }

    fn destroy(&mut self, instance: u32) {
        self.calls.push(Call::Destroy(instance));
    }
}

type TestBinding = Binding<(), MemoryDom, RecordingEngine>;

fn items(ids: &[i64]) -> Vec<Item<()>> {
    ids.iter().map(|&id| Item::new(id, ())).collect()
}

fn binding(ids: &[i64], options: BindingOptions<(), NodeId>) -> TestBinding {
    Binding::new(
        items(ids),
        options,
        RecordingEngine::default(),
        KeyedRender::new("li"),
    )
}

fn mounted(dom: &mut MemoryDom, mut binding: TestBinding) -> (TestBinding, NodeId) {
    let root = dom.create_element("ul");
    binding.mount(dom, root).unwrap();
    (binding, root)
}

fn list_ids(binding: &TestBinding) -> Vec<String> {
    binding.list().iter().map(|item| item.id.to_string()).collect()
}

/// Drags child `old` of `root` to index `new`, the way the engine does before reporting.
fn engine_drag(dom: &mut MemoryDom, root: NodeId, old: usize, new: usize) -> NodeId {
    let node = dom.child_ids(root)[old];
    dom.remove(&node);
    insert_node_at(dom, &root, &node, new).unwrap();
    node
}

fn event(
    kind: EventKind,
    root: NodeId,
    item: NodeId,
    old: usize,
    new: usize,
) -> SortableEvent<NodeId> {
    SortableEvent::new(kind)
        .with_container(root)
        .with_item(item)
        .with_indices(old, new)
}

#[test]
fn mount_rejects_dirty_list() {
    let mut dom = MemoryDom::new();
    let root = dom.create_element("ul");
    let mut list = items(&[1, 2]);
    list[1].selected = true;
    let mut b: TestBinding = Binding::new(
        list,
        BindingOptions::default(),
        RecordingEngine::default(),
        KeyedRender::new("li"),
    );

    assert_eq!(
        b.mount(&mut dom, root),
        Err(Error::ListPrecondition {
            id: ItemId::Int(2)
        })
    );
    assert!(!b.is_bound());
    assert!(b.engine().calls.is_empty());
    assert_eq!(dom.child_count(&root), 0);
}

#[test]
fn mount_rejects_duplicate_ids() {
    let mut dom = MemoryDom::new();
    let root = dom.create_element("ul");
    let mut b = binding(&[1, 2, 1], BindingOptions::default());

    assert_eq!(b.mount(&mut dom, root), Err(Error::DuplicateId(ItemId::Int(1))));
    assert!(b.engine().calls.is_empty());
}

#[test]
fn mount_renders_projects_then_creates_engine() {
    let mut dom = MemoryDom::new();
    let (b, root) = mounted(&mut dom, binding(&[1, 2, 3], BindingOptions::default()));

    assert!(b.is_bound());
    assert_eq!(b.container(), Some(&root));
    assert_eq!(b.instance(), Some(&0));
    assert_eq!(dom.data_ids(root), ["1", "2", "3"]);
    assert_eq!(b.engine().calls, [Call::Create(root, 0)]);
}

#[test]
fn handle_while_unbound_fails() {
    let mut dom = MemoryDom::new();
    let root = dom.create_element("ul");
    let item = dom.create_element("li");
    let mut b = binding(&[1], BindingOptions::default());

    assert_eq!(
        b.handle(&mut dom, &event(EventKind::Update, root, item, 0, 0)),
        Err(Error::NotBound)
    );
    assert_eq!(b.project(&mut dom), Err(Error::NotBound));
}

#[test]
fn update_keeps_list_and_dom_in_step() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3], BindingOptions::default()));
    let before = dom.child_ids(root).to_vec();

    let node = engine_drag(&mut dom, root, 0, 2);
    b.handle(&mut dom, &event(EventKind::Update, root, node, 0, 2))
        .unwrap();

    assert_eq!(list_ids(&b), ["2", "3", "1"]);
    assert_eq!(dom.data_ids(root), ["2", "3", "1"]);
    // Keyed render reuses the original nodes.
    assert_eq!(dom.child_ids(root), [before[1], before[2], before[0]]);
}

#[test]
fn random_updates_never_drift() {
    let mut rng = Lcg::new(0x5eed);
    let mut dom = MemoryDom::new();
    let ids: Vec<i64> = (1..=8).collect();
    let (mut b, root) = mounted(&mut dom, binding(&ids, BindingOptions::default()));

    for _ in 0..200 {
        let old = rng.gen_range_usize(0, ids.len());
        let new = rng.gen_range_usize(0, ids.len());
        if old == new {
            continue;
        }
        let node = engine_drag(&mut dom, root, old, new);
        b.handle(&mut dom, &event(EventKind::Update, root, node, old, new))
            .unwrap();

        assert_eq!(dom.data_ids(root), list_ids(&b));
        assert_eq!(dom.child_count(&root), ids.len());
    }
}

#[test]
fn swap_through_binding() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3], BindingOptions::default()));
    let nodes = dom.child_ids(root).to_vec();

    // The engine exchanges the two nodes.
    dom.insert_before(&root, &nodes[2], Some(&nodes[0]));
    dom.append(root, nodes[0]);
    assert_eq!(dom.data_ids(root), ["3", "2", "1"]);

    let ev = event(EventKind::Update, root, nodes[0], 0, 2).with_swap_item(nodes[2]);
    b.handle(&mut dom, &ev).unwrap();

    assert_eq!(list_ids(&b), ["3", "2", "1"]);
    assert_eq!(dom.data_ids(root), ["3", "2", "1"]);
}

#[test]
fn multi_drag_through_binding() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3, 4], BindingOptions::default()));
    let nodes = dom.child_ids(root).to_vec();

    // Lift items 0 and 2, drop them at 2 and 3.
    dom.remove(&nodes[0]);
    dom.remove(&nodes[2]);
    dom.append(root, nodes[0]);
    dom.append(root, nodes[2]);

    let ev = SortableEvent::new(EventKind::Update)
        .with_container(root)
        .with_multi_drag(
            alloc::vec![
                MultiDragEntry {
                    index: 0,
                    node: Some(nodes[0]),
                },
                MultiDragEntry {
                    index: 2,
                    node: Some(nodes[2]),
                },
            ],
            alloc::vec![
                MultiDragIndex {
                    index: Some(2),
                    node: Some(nodes[0]),
                },
                MultiDragIndex {
                    index: Some(3),
                    node: Some(nodes[2]),
                },
            ],
        );
    b.handle(&mut dom, &ev).unwrap();

    assert_eq!(list_ids(&b), ["2", "4", "1", "3"]);
    assert_eq!(dom.data_ids(root), ["2", "4", "1", "3"]);
}

#[test]
fn item_moves_between_bindings_sharing_a_session() {
    let mut dom = MemoryDom::new();
    let session = DragSession::new();
    let (mut a, ra) = mounted(
        &mut dom,
        binding(&[1, 2, 3], BindingOptions::default()).with_session(session.clone()),
    );
    let (mut b, rb) = mounted(
        &mut dom,
        binding(&[10, 20], BindingOptions::default()).with_session(session.clone()),
    );
    assert!(a.session().same_as(b.session()));

    let dragged = dom.child_ids(ra)[1];
    a.handle(&mut dom, &event(EventKind::Choose, ra, dragged, 1, 1))
        .unwrap();
    assert!(dom.has_class(dragged, "sortable-chosen"));
    a.handle(&mut dom, &event(EventKind::Start, ra, dragged, 1, 1))
        .unwrap();
    assert!(session.is_active());
    assert!(a.list()[1].dragging);

    // The engine carries the node into the other container.
    insert_node_at(&mut dom, &rb, &dragged, 1).unwrap();

    let cross = |kind| {
        SortableEvent::new(kind)
            .with_from(ra)
            .with_to(rb)
            .with_item(dragged)
            .with_indices(1, 1)
    };

    b.handle(&mut dom, &cross(EventKind::Add)).unwrap();
    assert_eq!(list_ids(&b), ["10", "2", "20"]);
    assert!(!b.list()[1].is_dirty());
    assert_eq!(dom.data_ids(rb), ["10", "2", "20"]);
    assert_eq!(dom.parent(&dragged), None);

    a.handle(&mut dom, &cross(EventKind::Remove)).unwrap();
    assert_eq!(list_ids(&a), ["1", "3"]);
    assert_eq!(dom.data_ids(ra), ["1", "3"]);

    a.handle(&mut dom, &event(EventKind::End, ra, dragged, 1, 1))
        .unwrap();
    assert!(!session.is_active());
}

/// Runs a clone-mode drag of the item at index 1 of `a` into index 0 of `b`.
fn clone_drag(dom: &mut MemoryDom, a: &mut TestBinding, b: &mut TestBinding) {
    let ra = *a.container().unwrap();
    let rb = *b.container().unwrap();
    let dragged = dom.child_ids(ra)[1];
    a.handle(dom, &event(EventKind::Start, ra, dragged, 1, 1))
        .unwrap();

    // The engine leaves a copy behind and carries the original over.
    let clone = dom.create_element("li");
    dom.insert_before(&ra, &clone, Some(&dragged));
    insert_node_at(dom, &rb, &dragged, 0).unwrap();

    let cross = |kind| {
        SortableEvent::new(kind)
            .with_from(ra)
            .with_to(rb)
            .with_item(dragged)
            .with_clone(clone)
            .with_indices(1, 0)
            .with_pull_mode(PullMode::Clone)
    };
    b.handle(dom, &cross(EventKind::Add)).unwrap();
    a.handle(dom, &cross(EventKind::Remove)).unwrap();
    a.handle(dom, &event(EventKind::End, ra, dragged, 1, 0))
        .unwrap();
    assert_eq!(dom.parent(&clone), None);
}

#[test]
fn clone_pull_leaves_a_fresh_copy_behind() {
    let mut dom = MemoryDom::new();
    let session = DragSession::new();
    let (mut a, ra) = mounted(
        &mut dom,
        binding(&[1, 2, 3], BindingOptions::default()).with_session(session.clone()),
    );
    let (mut b, rb) = mounted(
        &mut dom,
        binding(&[10], BindingOptions::default()).with_session(session),
    );

    clone_drag(&mut dom, &mut a, &mut b);

    assert_eq!(list_ids(&a), ["1", "-1", "3"]);
    assert_eq!(list_ids(&b), ["2", "10"]);
    assert_eq!(dom.data_ids(ra), ["1", "-1", "3"]);
    assert_eq!(dom.data_ids(rb), ["2", "10"]);
}

#[test]
fn clone_pull_uses_the_clone_fn() {
    let mut dom = MemoryDom::new();
    let session = DragSession::new();
    let options = BindingOptions::default()
        .with_clone(Some(|item: &Item<()>| {
            Item::new(alloc::format!("copy-of-{}", item.id), ())
        }));
    let (mut a, ra) = mounted(
        &mut dom,
        binding(&[1, 2, 3], options).with_session(session.clone()),
    );
    let (mut b, _) = mounted(
        &mut dom,
        binding(&[10], BindingOptions::default()).with_session(session),
    );

    clone_drag(&mut dom, &mut a, &mut b);

    assert_eq!(list_ids(&a), ["1", "copy-of-2", "3"]);
    assert_eq!(dom.data_ids(ra), ["1", "copy-of-2", "3"]);
}

#[test]
fn add_without_active_drag_is_dropped() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[10], BindingOptions::default()));
    let stray = dom.create_element("li");

    let result = b.handle(&mut dom, &event(EventKind::Add, root, stray, 0, 0));

    assert_eq!(result, Err(MalformedEvent::NoActiveDrag.into()));
    assert_eq!(list_ids(&b), ["10"]);
}

#[test]
fn handlers_observe_committed_state() {
    let latest = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let options = BindingOptions::default()
        .with_on_list_change(Some({
            let latest = Arc::clone(&latest);
            move |list: &[Item<()>]| {
                *latest.lock().unwrap() = list.iter().map(|i| i.id.to_string()).collect();
            }
        }))
        .with_handler(EventKind::Update, {
            let latest = Arc::clone(&latest);
            let seen = Arc::clone(&seen);
            move |_: &SortableEvent<NodeId>| {
                seen.lock().unwrap().push(latest.lock().unwrap().join(","));
            }
        });

    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3], options));
    let node = engine_drag(&mut dom, root, 2, 0);
    b.handle(&mut dom, &event(EventKind::Update, root, node, 2, 0))
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), ["3,1,2"]);
}

#[test]
fn malformed_event_skips_commit_and_handler() {
    let calls = Arc::new(Mutex::new(0usize));
    let options = BindingOptions::default()
        .with_on_list_change(Some({
            let calls = Arc::clone(&calls);
            move |_: &[Item<()>]| *calls.lock().unwrap() += 1
        }))
        .with_handler(EventKind::Update, {
            let calls = Arc::clone(&calls);
            move |_: &SortableEvent<NodeId>| *calls.lock().unwrap() += 1
        });

    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3], options));
    let node = dom.child_ids(root)[0];
    let mut ev = SortableEvent::new(EventKind::Update)
        .with_container(root)
        .with_item(node);
    ev.old_index = Some(0);

    assert_eq!(
        b.handle(&mut dom, &ev),
        Err(Error::MalformedEvent(MalformedEvent::MissingField {
            shape: EventShape::Single,
            field: "new_index",
        }))
    );
    assert_eq!(*calls.lock().unwrap(), 0);
    assert_eq!(list_ids(&b), ["1", "2", "3"]);
    assert_eq!(dom.data_ids(root), ["1", "2", "3"]);
}

#[test]
fn passive_events_reach_handlers_without_commit() {
    let sorted = Arc::new(Mutex::new(0usize));
    let options = BindingOptions::default().with_handler(EventKind::Sort, {
        let sorted = Arc::clone(&sorted);
        move |_: &SortableEvent<NodeId>| *sorted.lock().unwrap() += 1
    });
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2], options));
    let node = dom.child_ids(root)[0];

    b.handle(&mut dom, &event(EventKind::Sort, root, node, 0, 1))
        .unwrap();

    assert_eq!(*sorted.lock().unwrap(), 1);
    assert_eq!(list_ids(&b), ["1", "2"]);
}

#[test]
fn choose_and_select_are_projected_as_classes() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3], BindingOptions::default()));
    let nodes = dom.child_ids(root).to_vec();

    b.handle(&mut dom, &event(EventKind::Choose, root, nodes[0], 0, 0))
        .unwrap();
    assert!(b.list()[0].chosen);
    assert!(dom.has_class(nodes[0], "sortable-chosen"));

    let select = SortableEvent::new(EventKind::Select)
        .with_container(root)
        .with_multi_drag(
            Vec::new(),
            alloc::vec![
                MultiDragIndex {
                    index: Some(1),
                    node: Some(nodes[1]),
                },
                MultiDragIndex {
                    index: None,
                    node: None,
                },
            ],
        );
    b.handle(&mut dom, &select).unwrap();
    assert!(dom.has_class(nodes[1], "sortable-selected"));
    assert!(!dom.has_class(nodes[2], "sortable-selected"));

    // Deselecting the only selected item leaves an empty selection.
    let deselect = SortableEvent::new(EventKind::Deselect).with_container(root);
    b.handle(&mut dom, &deselect).unwrap();
    assert!(!dom.has_class(nodes[1], "sortable-selected"));

    b.handle(&mut dom, &event(EventKind::Unchoose, root, nodes[0], 0, 0))
        .unwrap();
    assert!(!dom.has_class(nodes[0], "sortable-chosen"));
}

#[test]
fn choose_without_index_is_malformed() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1], BindingOptions::default()));

    let ev = SortableEvent::new(EventKind::Choose).with_container(root);
    assert_eq!(
        b.handle(&mut dom, &ev),
        Err(Error::MalformedEvent(MalformedEvent::MissingField {
            shape: EventShape::Single,
            field: "old_index",
        }))
    );
}

#[test]
fn start_and_end_toggle_dragging() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let node = dom.child_ids(root)[1];

    b.handle(&mut dom, &event(EventKind::Choose, root, node, 1, 1))
        .unwrap();
    b.handle(&mut dom, &event(EventKind::Start, root, node, 1, 1))
        .unwrap();
    assert!(b.list()[1].dragging);
    assert!(!b.list()[0].dragging);

    b.handle(&mut dom, &event(EventKind::End, root, node, 1, 1))
        .unwrap();
    assert!(b.list().iter().all(|item| !item.dragging));
    assert!(!b.session().is_active());
}

#[test]
fn projection_is_idempotent_and_keeps_foreign_classes() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let nodes = dom.child_ids(root).to_vec();
    dom.set_class_name(&nodes[0], "row");
    b.handle(&mut dom, &event(EventKind::Choose, root, nodes[0], 0, 0))
        .unwrap();

    let snapshot = |dom: &MemoryDom| -> Vec<(String, Option<String>)> {
        nodes
            .iter()
            .map(|n| (dom.class_name(n), dom.attribute(n, DATA_ID)))
            .collect()
    };
    let first = snapshot(&dom);
    b.project(&mut dom).unwrap();
    assert_eq!(snapshot(&dom), first);
    assert_eq!(dom.class_name(&nodes[0]), "row sortable-chosen");
}

#[test]
fn projection_rejects_a_foreign_child() {
    let mut dom = MemoryDom::new();
    let (b, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    dom.append_new(root, "li", 1);

    assert_eq!(
        b.project(&mut dom),
        Err(Error::ProjectionMismatch {
            children: 3,
            items: 2,
        })
    );
}

#[test]
fn set_options_applies_only_changed_keys() {
    let mut dom = MemoryDom::new();
    let (mut b, _) = mounted(&mut dom, binding(&[1], BindingOptions::default()));

    let next = BindingOptions::default().with_engine(
        EngineOptions::new()
            .with_sort(false)
            .with_animation_ms(150),
    );
    b.set_options(&mut dom, next).unwrap();

    assert_eq!(
        b.engine().calls[1..],
        [
            Call::Set(
                0,
                OptionChange {
                    key: OptionKey::Sort,
                    value: OptionValue::Bool(false),
                }
            ),
            Call::Set(
                0,
                OptionChange {
                    key: OptionKey::Animation,
                    value: OptionValue::Millis(150),
                }
            ),
        ]
    );
    assert!(!b.options().engine.sort);
}

#[test]
fn renamed_marker_class_is_reprojected() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let node = dom.child_ids(root)[0];
    b.handle(&mut dom, &event(EventKind::Choose, root, node, 0, 0))
        .unwrap();

    let classes = ClassNames {
        chosen: "picked".into(),
        ..ClassNames::default()
    };
    let next = BindingOptions::default().with_engine(EngineOptions::new().with_classes(classes));
    b.set_options(&mut dom, next).unwrap();

    assert_eq!(dom.class_name(&node), "picked");
    assert_eq!(
        b.engine().calls.last(),
        Some(&Call::Set(
            0,
            OptionChange {
                key: OptionKey::ChosenClass,
                value: OptionValue::Text(Some("picked".into())),
            }
        ))
    );
}

#[test]
fn set_options_while_unbound_only_stores() {
    let mut dom = MemoryDom::new();
    let mut b = binding(&[1], BindingOptions::default());
    b.set_options(
        &mut dom,
        BindingOptions::default().with_engine(EngineOptions::new().with_disabled(true)),
    )
    .unwrap();

    assert!(b.options().engine.disabled);
    assert!(b.engine().calls.is_empty());
}

#[test]
fn unmount_destroys_once() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1], BindingOptions::default()));
    let node = dom.child_ids(root)[0];

    b.unmount();
    b.unmount();

    assert_eq!(b.engine().calls, [Call::Create(root, 0), Call::Destroy(0)]);
    assert_eq!(
        b.handle(&mut dom, &event(EventKind::Update, root, node, 0, 0)),
        Err(Error::NotBound)
    );
}

#[test]
fn remount_replaces_the_instance() {
    let mut dom = MemoryDom::new();
    let (mut b, first) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let second = dom.create_element("ol");

    b.mount(&mut dom, second).unwrap();

    assert_eq!(
        b.engine().calls,
        [
            Call::Create(first, 0),
            Call::Destroy(0),
            Call::Create(second, 1),
        ]
    );
    assert_eq!(dom.child_count(&first), 0);
    assert_eq!(dom.data_ids(second), ["1", "2"]);
}

#[test]
fn unmount_mid_drag_closes_the_session() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let node = dom.child_ids(root)[0];
    b.handle(&mut dom, &event(EventKind::Start, root, node, 0, 0))
        .unwrap();
    assert!(b.session().is_active());

    b.unmount();
    assert!(!b.session().is_active());
}

#[test]
fn move_defers_to_user_handler() {
    let mut dom = MemoryDom::new();
    let root = dom.create_element("ul");
    let nodes = dom.append_new(root, "li", 2);
    let ev = MoveEvent {
        from: root,
        to: root,
        dragged: nodes[0],
        related: nodes[1],
        will_insert_after: true,
    };

    let plain = binding(&[1, 2], BindingOptions::default());
    assert_eq!(plain.handle_move(&ev, &()), MoveResult::InsertAfter);

    let guarded = binding(
        &[1, 2],
        BindingOptions::default().with_on_move(|_: &MoveEvent<NodeId>, native: &dyn Any| {
            native
                .downcast_ref::<&str>()
                .filter(|key| **key == "locked")
                .map(|_| MoveResult::Reject)
        }),
    );
    assert_eq!(guarded.handle_move(&ev, &"locked"), MoveResult::Reject);
    assert_eq!(guarded.handle_move(&ev, &"free"), MoveResult::InsertAfter);
}

#[test]
fn change_in_clone_mode_detaches_the_clone() {
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let node = dom.child_ids(root)[0];
    let clone = dom.create_element("li");
    dom.append(root, clone);

    let ev = event(EventKind::Change, root, node, 0, 1)
        .with_clone(clone)
        .with_pull_mode(PullMode::Clone);
    b.handle(&mut dom, &ev).unwrap();

    assert_eq!(dom.parent(&clone), None);
    assert_eq!(dom.child_count(&root), 2);
}

#[test]
fn spill_removes_only_when_configured() {
    let mut dom = MemoryDom::new();
    let (mut keep, root) = mounted(&mut dom, binding(&[1, 2], BindingOptions::default()));
    let node = dom.child_ids(root)[0];
    keep.handle(&mut dom, &event(EventKind::Spill, root, node, 0, 0))
        .unwrap();
    assert_eq!(dom.parent(&node), Some(root));

    let reverting =
        BindingOptions::default().with_engine(EngineOptions::new().with_spill(true, true));
    let (mut keep, root) = mounted(&mut dom, binding(&[1, 2], reverting));
    let node = dom.child_ids(root)[0];
    keep.handle(&mut dom, &event(EventKind::Spill, root, node, 0, 0))
        .unwrap();
    assert_eq!(list_ids(&keep), ["1", "2"]);
    assert_eq!(dom.data_ids(root), ["1", "2"]);
}

#[test]
fn spilled_item_leaves_list_and_dom() {
    let latest = Arc::new(Mutex::new(Vec::<String>::new()));
    let options = BindingOptions::default()
        .with_engine(EngineOptions::new().with_spill(true, false))
        .with_on_list_change(Some({
            let latest = Arc::clone(&latest);
            move |list: &[Item<()>]| {
                *latest.lock().unwrap() = list.iter().map(|i| i.id.to_string()).collect();
            }
        }));
    let mut dom = MemoryDom::new();
    let (mut b, root) = mounted(&mut dom, binding(&[1, 2, 3], options));
    let node = dom.child_ids(root)[1];

    let spill = SortableEvent::new(EventKind::Spill)
        .with_container(root)
        .with_item(node);
    assert_eq!(
        b.handle(&mut dom, &spill),
        Err(Error::MalformedEvent(MalformedEvent::MissingField {
            shape: EventShape::Single,
            field: "old_index",
        }))
    );
    assert_eq!(dom.parent(&node), Some(root));

    b.handle(&mut dom, &event(EventKind::Spill, root, node, 1, 1))
        .unwrap();

    assert_eq!(dom.parent(&node), None);
    assert_eq!(list_ids(&b), ["1", "3"]);
    assert_eq!(dom.data_ids(root), ["1", "3"]);
    assert_eq!(*latest.lock().unwrap(), ["1", "3"]);
    assert_eq!(b.project(&mut dom), Ok(()));
}

#[test]
fn random_cross_list_moves_never_drift() {
    let mut rng = Lcg::new(0xc0ffee);
    let mut dom = MemoryDom::new();
    let session = DragSession::new();
    let (mut a, ra) = mounted(
        &mut dom,
        binding(&[1, 2, 3, 4, 5], BindingOptions::default()).with_session(session.clone()),
    );
    let (mut b, rb) = mounted(
        &mut dom,
        binding(&[10, 20, 30], BindingOptions::default()).with_session(session.clone()),
    );

    for _ in 0..300 {
        let a_to_b = if a.list().is_empty() {
            false
        } else if b.list().is_empty() {
            true
        } else {
            rng.next_u64() & 1 == 0
        };
        let (src, src_root, dst, dst_root) = if a_to_b {
            (&mut a, ra, &mut b, rb)
        } else {
            (&mut b, rb, &mut a, ra)
        };

        let old = rng.gen_range_usize(0, src.list().len());
        let new = rng.gen_range_usize(0, dst.list().len() + 1);
        let node = dom.child_ids(src_root)[old];
        src.handle(&mut dom, &event(EventKind::Start, src_root, node, old, old))
            .unwrap();

        insert_node_at(&mut dom, &dst_root, &node, new).unwrap();
        let cross = |kind| {
            SortableEvent::new(kind)
                .with_from(src_root)
                .with_to(dst_root)
                .with_item(node)
                .with_indices(old, new)
        };
        dst.handle(&mut dom, &cross(EventKind::Add)).unwrap();
        src.handle(&mut dom, &cross(EventKind::Remove)).unwrap();
        src.handle(&mut dom, &cross(EventKind::End)).unwrap();

        assert!(!session.is_active());
        assert_eq!(dom.data_ids(ra), list_ids(&a));
        assert_eq!(dom.data_ids(rb), list_ids(&b));
        assert_eq!(a.list().len() + b.list().len(), 8);
    }
}

#[test]
fn engine_options_diff_is_empty_for_equal_options() {
    let a = EngineOptions::new()
        .with_group(Some(GroupOptions::new("shared").with_pull(GroupPull::Clone)));
    assert!(a.diff(&a.clone()).is_empty());
    assert_eq!(a.entries().len(), 19);
    assert!(!EngineOptions::new().with_spill(true, true).removes_on_spill());

    let keyed = EngineOptions::new()
        .with_draggable(Some(".row"))
        .with_multi_drag_key(Some("Shift"));
    let changes = EngineOptions::new().diff(&keyed);
    assert_eq!(
        changes,
        [
            OptionChange {
                key: OptionKey::Draggable,
                value: OptionValue::Text(Some(".row".into())),
            },
            OptionChange {
                key: OptionKey::MultiDragKey,
                value: OptionValue::Text(Some("Shift".into())),
            },
        ]
    );
}
