use sortable_sync::{Dom, EventKind, Item, MemoryDom, PullMode, SortableEvent, insert_node_at};
use sortable_sync_adapter::{
    Binding, BindingOptions, DragSession, EngineOptions, GroupOptions, GroupPull, KeyedRender,
    OptionChange, SortableEngine,
};

/// Stands in for a real drag engine: it only logs what the binding asks of it.
struct LoggingEngine;

impl SortableEngine<sortable_sync::NodeId> for LoggingEngine {
    type Instance = sortable_sync::NodeId;

    fn create(
        &mut self,
        container: &sortable_sync::NodeId,
        options: &EngineOptions,
    ) -> Self::Instance {
        println!("engine: attach to {container:?} (group={:?})", options.group);
        *container
    }

    fn set_option(&mut self, instance: &mut Self::Instance, change: &OptionChange) {
        println!("engine: {instance:?}.{} = {:?}", change.key.name(), change.value);
    }

    fn destroy(&mut self, instance: Self::Instance) {
        println!("engine: detach from {instance:?}");
    }
}

fn main() {
    // Example: a palette that hands out copies to a board (clone pull mode).
    //
    // Both bindings share one drag session so the board can resolve which palette items arrived.
    let session = DragSession::new();
    let group = GroupOptions::new("blocks").with_pull(GroupPull::Clone);

    let palette_options = BindingOptions::default()
        .with_engine(EngineOptions::new().with_group(Some(group.clone())).with_sort(false))
        .with_on_list_change(Some(|list: &[Item<&'static str>]| {
            println!("palette: {:?}", list.iter().map(|i| i.id.to_string()).collect::<Vec<_>>());
        }));
    let board_options = BindingOptions::default()
        .with_engine(EngineOptions::new().with_group(Some(group.with_pull(GroupPull::Deny))))
        .with_on_list_change(Some(|list: &[Item<&'static str>]| {
            println!("board:   {:?}", list.iter().map(|i| i.value).collect::<Vec<_>>());
        }))
        .with_handler(EventKind::Add, |event: &SortableEvent<_>| {
            println!("board: user handler saw add at {:?}", event.new_index);
        });

    let mut dom = MemoryDom::new();
    let palette_root = dom.create_element("ul");
    let board_root = dom.create_element("ul");

    let mut palette = Binding::new(
        vec![Item::new("text", "Text"), Item::new("image", "Image")],
        palette_options,
        LoggingEngine,
        KeyedRender::new("li"),
    )
    .with_session(session.clone());
    let mut board = Binding::new(
        vec![Item::new("title", "Title")],
        board_options,
        LoggingEngine,
        KeyedRender::new("li"),
    )
    .with_session(session);

    palette.mount(&mut dom, palette_root).expect("fresh palette list");
    board.mount(&mut dom, board_root).expect("fresh board list");

    // The user drags "Image" onto the board; the engine leaves a copy in the palette.
    let dragged = dom.child_ids(palette_root)[1];
    let start = SortableEvent::new(EventKind::Start)
        .with_container(palette_root)
        .with_item(dragged)
        .with_indices(1, 1);
    palette.handle(&mut dom, &start).expect("start");

    let clone = dom.create_element("li");
    dom.insert_before(&palette_root, &clone, Some(&dragged));
    insert_node_at(&mut dom, &board_root, &dragged, 1).expect("index is in range");

    let dropped = |kind| {
        SortableEvent::new(kind)
            .with_from(palette_root)
            .with_to(board_root)
            .with_item(dragged)
            .with_clone(clone)
            .with_indices(1, 1)
            .with_pull_mode(PullMode::Clone)
    };
    board.handle(&mut dom, &dropped(EventKind::Add)).expect("add");
    palette.handle(&mut dom, &dropped(EventKind::Remove)).expect("remove");
    palette
        .handle(&mut dom, &SortableEvent { kind: EventKind::End, ..start })
        .expect("end");

    println!("palette DOM: {:?}", dom.data_ids(palette_root));
    println!("board DOM:   {:?}", dom.data_ids(board_root));

    palette.unmount();
    board.unmount();
}
