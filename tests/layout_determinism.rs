/// Spring layout reproducibility on the sample document.

use callview::domain::callgraph::FileCallGraph;
use callview::domain::document::CallGraphDocument;
use callview::domain::layout::SpringLayout;
use callview::infrastructure::JsonFileSource;
use callview::ports::DocumentSource;

fn graph() -> FileCallGraph {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/call_graph.json");
    let doc: CallGraphDocument = JsonFileSource::new(path).load().unwrap();
    FileCallGraph::from_document(&doc, "ingestion.py")
}

#[test]
fn same_seed_same_coordinates() {
    let g = graph();
    let params = SpringLayout::default();
    let first = params.compute(&g.graph);
    let second = params.compute(&g.graph);
    assert_eq!(first.positions(), second.positions());
    assert_eq!(first.len(), g.node_count());
}

#[test]
fn reload_and_relayout_is_stable() {
    let first = SpringLayout::default().compute(&graph().graph);
    let second = SpringLayout::default().compute(&graph().graph);
    assert_eq!(first, second);
}

#[test]
fn thread_count_does_not_change_layout() {
    let g = graph();
    let params = SpringLayout::default();

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| params.compute(&g.graph));
    let several = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| params.compute(&g.graph));

    assert_eq!(single, several);
}

#[test]
fn every_node_is_placed_inside_unit_box() {
    let g = graph();
    let layout = SpringLayout::default().compute(&g.graph);
    for idx in g.graph.node_indices() {
        let p = layout.position(idx).expect("node has a position");
        assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9);
    }
}
