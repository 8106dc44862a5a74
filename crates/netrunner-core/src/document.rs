//! Node-link JSON document for force-directed viewers.
//!
//! ```json
//! {"directed": false, "multigraph": false, "graph": {},
//!  "nodes": [{"id": "X", "degree": 1}],
//!  "links": [{"source": "X", "target": "A"}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::projection::Graph;
use crate::{Attributes, NetFrame, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub multigraph: bool,
    #[serde(default)]
    pub graph: serde_json::Map<String, serde_json::Value>,
    pub nodes: Vec<NodeEntry>,
    pub links: Vec<LinkEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: Identity,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub source: Identity,
    pub target: Identity,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Attribute bag minus the keys the document reserves.
fn without(attributes: &Attributes, reserved: &[&str]) -> Attributes {
    attributes
        .iter()
        .filter(|(k, _)| !reserved.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl NodeLinkDocument {
    /// Snapshot a projected graph. `id`, `source` and `target` take
    /// precedence over attributes of the same name.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|n| NodeEntry {
                id: n.identity.clone(),
                attributes: without(&n.attributes, &["id"]),
            })
            .collect();
        let links = graph
            .edges()
            .map(|(source, target, attributes)| LinkEntry {
                source: source.clone(),
                target: target.clone(),
                attributes: without(attributes, &["source", "target"]),
            })
            .collect();
        Self {
            directed: false,
            multigraph: false,
            graph: serde_json::Map::new(),
            nodes,
            links,
        }
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl NetFrame {
    /// Node-link JSON of the current projected graph.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        NodeLinkDocument::from_graph(&self.graph).to_value()
    }

    pub fn to_document(&self) -> NodeLinkDocument {
        NodeLinkDocument::from_graph(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameSpec;
    use crate::overlay::AlgorithmResult;
    use netrunner_table::{Frame, Value};

    fn engine() -> NetFrame {
        let mut f = Frame::new(["name", "king"]).unwrap();
        f.push_row(["X", "A"]).unwrap();
        f.push_row(["Y", "B"]).unwrap();
        let spec = FrameSpec::default()
            .with_nodes(["name", "king"])
            .with_link("name", "king");
        NetFrame::from_spec(f, &spec).unwrap()
    }

    #[test]
    fn document_lists_nodes_and_links_in_index_order() {
        let json = engine().to_json().unwrap();
        let nodes = json["nodes"].as_array().unwrap();
        let links = json["links"].as_array().unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(links.len(), 2);
        assert_eq!(nodes[0]["id"], "X");
        assert_eq!(links[1]["source"], "Y");
        assert_eq!(links[1]["target"], "B");
        assert_eq!(json["directed"], false);
    }

    #[test]
    fn attributes_are_flattened_but_never_shadow_id() {
        let mut nf = engine();
        nf.apply_result(
            &AlgorithmResult::PairSequence(vec![(Identity::from("X"), Value::from("other"))]),
            "id",
        );
        nf.apply_result(
            &AlgorithmResult::PairSequence(vec![(Identity::from("X"), Value::Int(1))]),
            "degree",
        );
        let json = nf.to_json().unwrap();
        assert_eq!(json["nodes"][0]["id"], "X");
        assert_eq!(json["nodes"][0]["degree"], 1);
    }

    #[test]
    fn document_reparses_into_same_keys() {
        let nf = engine();
        let doc = NodeLinkDocument::from_value(nf.to_json().unwrap()).unwrap();
        let ids: Vec<&Identity> = doc.nodes.iter().map(|n| &n.id).collect();
        let expected: Vec<&Identity> = nf.node_index().identities().iter().collect();
        assert_eq!(ids, expected);
        assert_eq!(doc, nf.to_document());
    }
}
