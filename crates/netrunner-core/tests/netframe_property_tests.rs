use netrunner_core::{EdgeIdentity, Frame, FrameSpec, Identity, NetFrame, NodeLinkDocument, Value};
use proptest::prelude::*;

/// Rows of `(source, target)` drawn from a small alphabet so duplicates and
/// reversed pairs are common. `None` becomes a missing cell.
fn rows_strategy() -> impl Strategy<Value = Vec<(Option<u8>, Option<u8>)>> {
    prop::collection::vec(
        (prop::option::weighted(0.85, 0u8..6), prop::option::weighted(0.85, 0u8..6)),
        0..=24,
    )
}

fn cell(v: Option<u8>) -> Value {
    match v {
        Some(n) => Value::Text(format!("n{n}")),
        None => Value::Null,
    }
}

fn frame_of(rows: &[(Option<u8>, Option<u8>)]) -> Frame {
    let mut frame = Frame::new(["a", "b"]).expect("frame columns");
    for (s, t) in rows {
        frame.push_row([cell(*s), cell(*t)]).expect("push row");
    }
    frame
}

fn engine(rows: &[(Option<u8>, Option<u8>)]) -> NetFrame {
    let spec = FrameSpec::default().with_nodes(["a", "b"]).with_link("a", "b");
    NetFrame::from_spec(frame_of(rows), &spec).expect("build engine")
}

/// Distinct non-missing values of `a` then `b`, in first-occurrence order.
fn naive_nodes(rows: &[(Option<u8>, Option<u8>)]) -> Vec<Identity> {
    let mut out: Vec<Identity> = Vec::new();
    let columns = [
        rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        rows.iter().map(|r| r.1).collect::<Vec<_>>(),
    ];
    for column in columns {
        for v in column.into_iter().flatten() {
            let id = Identity::from(format!("n{v}"));
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn node_keys_match_naive_distinct_scan(rows in rows_strategy()) {
        let nf = engine(&rows);
        prop_assert_eq!(nf.node_index().identities().to_vec(), naive_nodes(&rows));
    }

    #[test]
    fn repeated_node_extraction_changes_nothing(rows in rows_strategy()) {
        let mut nf = engine(&rows);
        let before = nf.node_index().clone();
        nf.add_nodes(&["a", "b"], None).expect("re-add nodes");
        prop_assert_eq!(nf.node_index().identities(), before.identities());
        for (id, record) in before.iter() {
            let after = nf.node_index().get(id).expect("node kept");
            prop_assert_eq!(&after.source_columns, &record.source_columns);
        }
    }

    #[test]
    fn edges_never_touch_missing_cells(rows in rows_strategy()) {
        let nf = engine(&rows);
        let complete = rows.iter().filter(|(s, t)| s.is_some() && t.is_some()).count();
        prop_assert!(nf.edge_index().len() <= complete);
        for edge in nf.edge_index().identities() {
            prop_assert!(nf.node_index().contains(&edge.source));
            prop_assert!(nf.node_index().contains(&edge.target));
        }
        for (s, t) in rows.iter() {
            if let (Some(s), Some(t)) = (s, t) {
                let edge = EdgeIdentity::new(format!("n{s}"), format!("n{t}"));
                prop_assert!(nf.edge_index().contains(&edge));
            }
        }
    }

    #[test]
    fn projection_has_no_more_edges_than_the_index(rows in rows_strategy()) {
        let nf = engine(&rows);
        prop_assert_eq!(nf.graph().node_count(), nf.node_index().len());
        prop_assert!(nf.graph().edge_count() <= nf.edge_index().len());
        for edge in nf.edge_index().identities() {
            prop_assert!(nf.graph().contains_edge(&edge.target, &edge.source));
        }
    }

    #[test]
    fn apply_frame_rebuilds_the_same_indexes(rows in rows_strategy()) {
        let mut nf = engine(&rows);
        let nodes = nf.node_index().identities().to_vec();
        let edges = nf.edge_index().identities().to_vec();
        nf.apply_frame().expect("apply frame");
        prop_assert_eq!(nf.node_index().identities().to_vec(), nodes);
        prop_assert_eq!(nf.edge_index().identities().to_vec(), edges);
    }

    #[test]
    fn document_round_trips_node_keys(rows in rows_strategy()) {
        let nf = engine(&rows);
        let json = nf.to_json().expect("to_json");
        let doc = NodeLinkDocument::from_value(json).expect("reparse");
        let ids: Vec<Identity> = doc.nodes.iter().map(|n| n.id.clone()).collect();
        prop_assert_eq!(ids, nf.node_index().identities().to_vec());
        prop_assert_eq!(doc.links.len(), nf.graph().edge_count());
    }

    #[test]
    fn join_graph_is_a_union(left in rows_strategy(), right in rows_strategy()) {
        let mut joined = engine(&left);
        let other = engine(&right);
        joined.join_graph(&other);

        let mut expected = naive_nodes(&left);
        for id in naive_nodes(&right) {
            if !expected.contains(&id) {
                expected.push(id);
            }
        }
        prop_assert_eq!(joined.node_index().identities().to_vec(), expected);
        for edge in other.edge_index().identities() {
            prop_assert!(joined.edge_index().contains(edge));
        }
        prop_assert_eq!(joined.graph().node_count(), joined.node_index().len());
    }
}
