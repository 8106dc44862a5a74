//! Projection of the indexes into an undirected `petgraph` graph.
//!
//! The graph is a derived view: it is rebuilt from [`NodeIndex`] and
//! [`EdgeIndex`] on demand and is never the source of truth.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex as Slot, UnGraph};
use petgraph::visit::EdgeRef;

use crate::edge_index::EdgeIndex;
use crate::identity::Identity;
use crate::node_index::NodeIndex;
use crate::Attributes;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub identity: Identity,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphEdge {
    pub attributes: Attributes,
}

/// Simple undirected graph keyed by [`Identity`].
///
/// `(a, b)` and `(b, a)` share one edge; their attribute bags are merged in
/// edge-index order. Node and edge iteration follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: UnGraph<GraphNode, GraphEdge>,
    slots: HashMap<Identity, Slot>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    pub fn contains_node(&self, identity: &Identity) -> bool {
        self.slots.contains_key(identity)
    }

    pub fn contains_edge(&self, a: &Identity, b: &Identity) -> bool {
        match (self.slots.get(a), self.slots.get(b)) {
            (Some(&a), Some(&b)) => self.inner.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn node_attributes(&self, identity: &Identity) -> Option<&Attributes> {
        let slot = *self.slots.get(identity)?;
        Some(&self.inner[slot].attributes)
    }

    pub(crate) fn node_attributes_mut(&mut self, identity: &Identity) -> Option<&mut Attributes> {
        let slot = *self.slots.get(identity)?;
        Some(&mut self.inner[slot].attributes)
    }

    pub fn edge_attributes(&self, a: &Identity, b: &Identity) -> Option<&Attributes> {
        let (&a, &b) = (self.slots.get(a)?, self.slots.get(b)?);
        let edge = self.inner.find_edge(a, b)?;
        Some(&self.inner[edge].attributes)
    }

    pub(crate) fn edge_attributes_mut(
        &mut self,
        a: &Identity,
        b: &Identity,
    ) -> Option<&mut Attributes> {
        let (&a, &b) = (self.slots.get(a)?, self.slots.get(b)?);
        let edge = self.inner.find_edge(a, b)?;
        Some(&mut self.inner[edge].attributes)
    }

    /// Number of incident edges; a self-loop counts twice.
    pub fn degree(&self, identity: &Identity) -> Option<usize> {
        let slot = *self.slots.get(identity)?;
        Some(
            self.inner
                .edges(slot)
                .map(|e| if e.source() == e.target() { 2 } else { 1 })
                .sum(),
        )
    }

    pub fn neighbors(&self, identity: &Identity) -> Vec<&Identity> {
        let Some(&slot) = self.slots.get(identity) else {
            return Vec::new();
        };
        self.inner
            .neighbors(slot)
            .map(|n| &self.inner[n].identity)
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.inner.node_indices().map(move |i| &self.inner[i])
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Identity, &Identity, &Attributes)> + '_ {
        self.inner.edge_references().map(move |e| {
            (
                &self.inner[e.source()].identity,
                &self.inner[e.target()].identity,
                &e.weight().attributes,
            )
        })
    }

    /// The underlying `petgraph` graph, for running its algorithms directly.
    pub fn inner(&self) -> &UnGraph<GraphNode, GraphEdge> {
        &self.inner
    }

    fn ensure_node(&mut self, identity: &Identity, attributes: Attributes) -> Slot {
        if let Some(&slot) = self.slots.get(identity) {
            return slot;
        }
        let slot = self.inner.add_node(GraphNode {
            identity: identity.clone(),
            attributes,
        });
        self.slots.insert(identity.clone(), slot);
        slot
    }
}

/// Build a fresh graph from the current index contents.
///
/// Edge endpoints with no node record are added as bare nodes.
pub fn project(nodes: &NodeIndex, edges: &EdgeIndex) -> Graph {
    let mut graph = Graph::new();
    for (identity, record) in nodes.iter() {
        graph.ensure_node(identity, record.attributes.clone());
    }

    let mut dangling = 0usize;
    for (identity, record) in edges.iter() {
        for end in [&identity.source, &identity.target] {
            if !graph.contains_node(end) {
                dangling += 1;
                graph.ensure_node(end, Attributes::new());
            }
        }
        let a = graph.ensure_node(&identity.source, Attributes::new());
        let b = graph.ensure_node(&identity.target, Attributes::new());
        match graph.inner.find_edge(a, b) {
            Some(edge) => graph.inner[edge]
                .attributes
                .extend(record.attributes.iter().map(|(k, v)| (k.clone(), v.clone()))),
            None => {
                graph.inner.add_edge(
                    a,
                    b,
                    GraphEdge {
                        attributes: record.attributes.clone(),
                    },
                );
            }
        }
    }

    if dangling > 0 {
        tracing::warn!(
            count = dangling,
            "edge endpoints without node records were added as bare nodes"
        );
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "projected graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_index::EdgeRecord;
    use crate::identity::EdgeIdentity;
    use crate::node_index::NodeCandidate;
    use netrunner_table::Value;

    fn node(id: &str, column: &str) -> NodeCandidate {
        NodeCandidate {
            identity: Identity::from(id),
            column: column.to_string(),
        }
    }

    fn edge(index: &mut EdgeIndex, a: &str, b: &str, weight: i64) {
        let mut record = EdgeRecord::default();
        record.attributes.insert("weight".into(), Value::Int(weight));
        index.upsert(EdgeIdentity::new(a, b), record);
    }

    #[test]
    fn reversed_pairs_share_one_undirected_edge() {
        let mut nodes = NodeIndex::new();
        nodes.merge([node("a", "c"), node("b", "c")]);
        let mut edges = EdgeIndex::new();
        edge(&mut edges, "a", "b", 1);
        edge(&mut edges, "b", "a", 2);

        let graph = project(&nodes, &edges);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        let attrs = graph
            .edge_attributes(&Identity::from("b"), &Identity::from("a"))
            .unwrap();
        assert_eq!(attrs.get("weight"), Some(&Value::Int(2)));
    }

    #[test]
    fn projection_is_repeatable() {
        let mut nodes = NodeIndex::new();
        nodes.merge([node("a", "c"), node("b", "c"), node("d", "c")]);
        let mut edges = EdgeIndex::new();
        edge(&mut edges, "a", "b", 1);
        edge(&mut edges, "b", "d", 1);

        let first = project(&nodes, &edges);
        let second = project(&nodes, &edges);
        let ids = |g: &Graph| g.nodes().map(|n| n.identity.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.edge_count(), second.edge_count());
    }

    #[test]
    fn dangling_endpoints_become_bare_nodes() {
        let nodes = NodeIndex::new();
        let mut edges = EdgeIndex::new();
        edge(&mut edges, "a", "b", 1);
        let graph = project(&nodes, &edges);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.node_attributes(&Identity::from("a")).unwrap().is_empty());
    }

    #[test]
    fn self_loop_counts_twice_in_degree() {
        let mut nodes = NodeIndex::new();
        nodes.merge([node("a", "c"), node("b", "c")]);
        let mut edges = EdgeIndex::new();
        edge(&mut edges, "a", "a", 1);
        edge(&mut edges, "a", "b", 1);
        let graph = project(&nodes, &edges);
        assert_eq!(graph.degree(&Identity::from("a")), Some(3));
        assert_eq!(graph.degree(&Identity::from("b")), Some(1));
        assert_eq!(graph.neighbors(&Identity::from("b")), vec![&Identity::from("a")]);
    }
}
