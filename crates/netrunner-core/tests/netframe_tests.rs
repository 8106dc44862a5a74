use anyhow::Result;
use netrunner_core::{
    AlgorithmResult, EdgeIdentity, Frame, FrameSpec, Identity, NetFrame, NetFrameError, Value,
};
use serde_json::json;

fn kings() -> Result<Frame> {
    Ok(Frame::from_records(&json!([
        {"name": "X", "king": "A"},
        {"name": "Y", "king": "B"},
    ]))?)
}

fn keys(nf: &NetFrame) -> Vec<String> {
    nf.node_index()
        .identities()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn two_row_table_projects_four_nodes_and_two_links() -> Result<()> {
    let spec = FrameSpec::default()
        .with_nodes(["name", "king"])
        .with_link("name", "king");
    let nf = NetFrame::from_spec(kings()?, &spec)?;

    assert_eq!(keys(&nf), ["X", "Y", "A", "B"]);
    assert_eq!(
        nf.edge_index().identities(),
        [EdgeIdentity::new("X", "A"), EdgeIdentity::new("Y", "B")]
    );
    assert_eq!(nf.graph().node_count(), 4);
    assert_eq!(nf.graph().edge_count(), 2);

    let json = nf.to_json()?;
    assert_eq!(json["nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["links"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn degree_result_is_an_idempotent_overwrite() -> Result<()> {
    let spec = FrameSpec::default()
        .with_nodes(["name", "king"])
        .with_link("name", "king");
    let mut nf = NetFrame::from_spec(kings()?, &spec)?;
    let degree = AlgorithmResult::PairSequence(vec![
        (Identity::from("X"), Value::Int(2)),
        (Identity::from("Y"), Value::Int(1)),
    ]);

    for _ in 0..2 {
        nf.apply_result(&degree, "degree");
        let x = nf.node_index().get(&Identity::from("X")).expect("X indexed");
        let y = nf.node_index().get(&Identity::from("Y")).expect("Y indexed");
        assert_eq!(x.attributes.get("degree"), Some(&Value::Int(2)));
        assert_eq!(y.attributes.get("degree"), Some(&Value::Int(1)));
    }
    Ok(())
}

#[test]
fn value_in_two_node_columns_accumulates_provenance() -> Result<()> {
    let frame = Frame::from_records(&json!([
        {"attacker": "Robb", "defender": "Joffrey"},
        {"attacker": "Joffrey", "defender": "Robb"},
    ]))?;
    let mut nf = NetFrame::new(frame);
    nf.add_nodes(&["attacker", "defender"], None)?;
    nf.add_nodes(&["attacker"], None)?;

    let robb = nf.node_index().get(&Identity::from("Robb")).expect("Robb indexed");
    assert_eq!(robb.source_columns, ["attacker", "defender"]);
    assert_eq!(nf.node_index().len(), 2);
    Ok(())
}

#[test]
fn separate_edge_calls_replace_but_one_call_keeps_both() -> Result<()> {
    let frame = Frame::from_records(&json!([
        {"x": "a", "y": "b", "z": "c", "w": "d"},
    ]))?;
    let mut nf = NetFrame::new(frame);
    nf.add_nodes(&["x", "y", "z", "w"], None)?;

    nf.add_edges(&[("x", "y")], None)?;
    nf.add_edges(&[("z", "w")], None)?;
    assert_eq!(nf.edge_index().identities(), [EdgeIdentity::new("c", "d")]);

    nf.add_edges(&[("x", "y"), ("z", "w")], None)?;
    assert_eq!(nf.edge_index().len(), 2);
    assert_eq!(nf.edge_columns().len(), 2);
    Ok(())
}

#[test]
fn ignore_sentinel_and_missing_cells_are_excluded() -> Result<()> {
    let frame = Frame::from_records(&json!([
        {"name": "Golden Tooth", "king": "Joffrey"},
        {"name": "Raid", "king": "None"},
        {"name": "Skirmish", "king": null},
    ]))?;
    let spec = FrameSpec::default()
        .with_nodes(["name", "king"])
        .with_link("name", "king")
        .with_ignore_value("None");
    let nf = NetFrame::from_spec(frame, &spec)?;

    assert_eq!(keys(&nf), ["Golden Tooth", "Raid", "Skirmish", "Joffrey"]);
    assert_eq!(nf.edge_index().len(), 1);
    assert_eq!(nf.ignore_value(), Some("None"));
    Ok(())
}

#[test]
fn flush_keeps_indexes_and_populate_restores_graph() -> Result<()> {
    let spec = FrameSpec::default()
        .with_nodes(["name", "king"])
        .with_link("name", "king");
    let mut nf = NetFrame::from_spec(kings()?, &spec)?;
    nf.flush_network();
    assert!(nf.graph().is_empty());
    assert_eq!(nf.node_index().len(), 4);

    nf.populate_network();
    assert_eq!(nf.graph().edge_count(), 2);
    Ok(())
}

#[test]
fn apply_frame_follows_frame_edits() -> Result<()> {
    let spec = FrameSpec::default()
        .with_nodes(["name", "king"])
        .with_link("name", "king");
    let mut nf = NetFrame::from_spec(kings()?, &spec)?;
    // records columns are sorted: king, name
    nf.frame_mut().push_row(["A", "Z"])?;
    nf.apply_frame()?;

    assert_eq!(keys(&nf), ["X", "Y", "Z", "A", "B"]);
    assert!(nf.graph().contains_edge(&Identity::from("A"), &Identity::from("Z")));
    Ok(())
}

#[test]
fn unknown_columns_surface_as_table_errors() -> Result<()> {
    let mut nf = NetFrame::new(kings()?);
    let err = nf.add_nodes(&["region"], None).unwrap_err();
    assert!(matches!(err, NetFrameError::Table(_)));
    assert!(nf.node_index().is_empty());
    Ok(())
}

#[test]
fn spec_file_drives_the_whole_build() -> Result<()> {
    let spec = FrameSpec::from_json_str(
        r#"{
            "nodes": ["name", "king"],
            "links": [["name", "king"]],
            "node_attributes": {"name": ["year"]},
            "edge_attributes": [{"source": "name", "target": "king", "attributes": ["outcome"]}]
        }"#,
    )?;
    let frame = Frame::from_records(&json!([
        {"name": "X", "king": "A", "year": 299, "outcome": "win"},
    ]))?;
    let nf = NetFrame::from_spec(frame, &spec)?;

    let x = nf.node_index().get(&Identity::from("X")).expect("X indexed");
    assert_eq!(x.attributes.get("year"), Some(&Value::Int(299)));
    let json = nf.to_json()?;
    assert_eq!(json["links"][0]["outcome"], "win");
    Ok(())
}

#[test]
fn node_attribute_columns_apply_in_declaration_order() -> Result<()> {
    let spec = FrameSpec::from_json_str(
        r#"{
            "nodes": ["name", "king"],
            "links": [["name", "king"]],
            "node_attributes": {"name": ["size"], "king": ["size"]}
        }"#,
    )?;
    let frame = Frame::from_records(&json!([
        {"name": "X", "king": "A", "size": 10},
        {"name": "A", "king": "B", "size": 20},
    ]))?;
    let nf = NetFrame::from_spec(frame, &spec)?;

    // `king` is declared last, so its row (X, A, 10) wins for A.
    let a = nf.node_index().get(&Identity::from("A")).expect("A indexed");
    assert_eq!(a.attributes.get("size"), Some(&Value::Int(10)));
    let b = nf.node_index().get(&Identity::from("B")).expect("B indexed");
    assert_eq!(b.attributes.get("size"), Some(&Value::Int(20)));
    Ok(())
}

#[test]
fn mapping_results_apply_to_numeric_nodes_like_pairs() -> Result<()> {
    let frame = Frame::from_records(&json!([{"a": 1, "b": 2}]))?;
    let spec = FrameSpec::default().with_nodes(["a", "b"]).with_link("a", "b");
    let mut nf = NetFrame::from_spec(frame, &spec)?;

    let pairs = nf.apply_result_json(&json!({"pairs": [[1, 0.5], [2, 0.5]]}), "by_pairs")?;
    let mapping = nf.apply_result_json(&json!({"mapping": {"1": 0.5, "2": 0.5}}), "by_mapping")?;
    assert_eq!((pairs, mapping), (2, 2));

    let one = nf.node_index().get(&Identity::from(1_i64)).expect("1 indexed");
    assert_eq!(one.attributes.get("by_mapping"), Some(&Value::Float(0.5)));
    assert_eq!(one.attributes.get("by_pairs"), one.attributes.get("by_mapping"));
    Ok(())
}
