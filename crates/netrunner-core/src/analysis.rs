//! Basic graph measures over a projected [`Graph`], returned in the shapes
//! [`NetFrame::apply_result`](crate::NetFrame::apply_result) accepts.

use petgraph::visit::Bfs;

use crate::overlay::AlgorithmResult;
use crate::projection::Graph;
use netrunner_table::Value;

/// Degree of every node, in graph order.
pub fn degree(graph: &Graph) -> AlgorithmResult {
    let pairs = graph
        .nodes()
        .map(|n| {
            let d = graph.degree(&n.identity).unwrap_or(0);
            (n.identity.clone(), Value::Int(d as i64))
        })
        .collect();
    AlgorithmResult::PairSequence(pairs)
}

/// Degree divided by `n - 1`, in graph order; every node scores 0 when
/// `n <= 1`.
pub fn degree_centrality(graph: &Graph) -> AlgorithmResult {
    let n = graph.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
    let mapping = graph
        .nodes()
        .map(|node| {
            let d = graph.degree(&node.identity).unwrap_or(0) as f64;
            (node.identity.clone(), Value::Float(d * scale))
        })
        .collect();
    AlgorithmResult::Mapping(mapping)
}

/// Connected components, each listed in BFS order from its first node.
/// Components are ordered by their first node's position in the graph.
pub fn connected_components(graph: &Graph) -> AlgorithmResult {
    let inner = graph.inner();
    let mut seen = vec![false; inner.node_count()];
    let mut groups = Vec::new();

    for start in inner.node_indices() {
        if seen[start.index()] {
            continue;
        }
        let mut group = Vec::new();
        let mut bfs = Bfs::new(inner, start);
        while let Some(slot) = bfs.next(inner) {
            seen[slot.index()] = true;
            group.push(inner[slot].identity.clone());
        }
        groups.push(group);
    }
    AlgorithmResult::Partition(groups)
}
