use sortable_sync::{
    Dom, EventKind, Item, ListAction, MemoryDom, Reversal, SortableEvent, insert_node_at,
    normalize, reconcile, reverse,
};

fn main() {
    // Example: one drag inside a single container, handled without any UI framework.
    //
    // The host flow is:
    // 1) the drag engine moves a DOM node and reports `update`
    // 2) normalize the report into move records
    // 3) reverse the engine's DOM edit so the UI layer stays the only writer
    // 4) reconcile the list, then re-render from it
    let list: Vec<Item<&str>> = vec![
        Item::new(1, "apples"),
        Item::new(2, "bread"),
        Item::new(3, "coffee"),
    ];

    let mut dom = MemoryDom::new();
    let root = dom.create_element("ul");
    let nodes = dom.append_new(root, "li", list.len());
    for (node, item) in nodes.iter().zip(&list) {
        dom.set_attribute(node, "data-id", &item.id.to_string());
    }

    // The engine drags "apples" to the end.
    dom.remove(&nodes[0]);
    insert_node_at(&mut dom, &root, &nodes[0], 2).expect("index is in range");
    println!("engine DOM:   {:?}", dom.data_ids(root));

    let event = SortableEvent::new(EventKind::Update)
        .with_container(root)
        .with_item(nodes[0])
        .with_indices(0, 2);

    let records = normalize(&list, &event).expect("well-formed update");
    reverse(&mut dom, &records, Reversal::Update).expect("reversible");
    println!("reversed DOM: {:?}", dom.data_ids(root));

    let next = reconcile(&list, &ListAction::Update(&records))
        .expect("records fit the list")
        .unwrap_or(list);
    let values: Vec<&str> = next.iter().map(|item| item.value).collect();
    println!("next list:    {values:?}");
}
