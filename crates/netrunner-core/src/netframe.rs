//! The NetFrame engine: one frame, its node/edge indexes, and the graph
//! projected from them.

use netrunner_table::Frame;

use crate::config::FrameSpec;
use crate::edge_index::{EdgeCandidate, EdgeIndex};
use crate::node_index::{NodeCandidate, NodeIndex};
use crate::projection::{self, Graph};
use crate::Result;

/// Owns its frame, both indexes and the projected graph.
///
/// Mutating calls take `&mut self`, so a shared `&NetFrame` is always a
/// consistent snapshot. Callers that need concurrent readers should clone
/// after a mutation completes.
#[derive(Debug, Clone, Default)]
pub struct NetFrame {
    pub(crate) frame: Frame,
    pub(crate) graph: Graph,
    pub(crate) nodes: NodeIndex,
    pub(crate) edges: EdgeIndex,
    pub(crate) node_columns: Vec<String>,
    pub(crate) edge_columns: Vec<(String, String)>,
    pub(crate) ignore_value: Option<String>,
}

impl NetFrame {
    /// An engine over `frame` with nothing indexed yet.
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    /// Index the declared node and link columns, project when both are
    /// present, then overlay the declared attribute columns.
    pub fn from_spec(frame: Frame, spec: &FrameSpec) -> Result<Self> {
        let mut nf = Self::new(frame);
        let ignore = spec.ignore_value.as_deref();

        if !spec.nodes.is_empty() {
            nf.add_nodes(&spec.nodes, ignore)?;
        }
        if !spec.links.is_empty() {
            nf.add_edges(&spec.links, ignore)?;
        }
        if !spec.nodes.is_empty() && !spec.links.is_empty() {
            nf.populate_network();
        }
        if !spec.node_attributes.is_empty() {
            nf.apply_node_attributes(&spec.node_attributes)?;
        }
        if !spec.edge_attributes.is_empty() {
            nf.apply_edge_attributes(&spec.edge_attributes)?;
        }
        Ok(nf)
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable access to the frame. Indexes do not follow the change until
    /// [`NetFrame::apply_frame`] is called.
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node_index(&self) -> &NodeIndex {
        &self.nodes
    }

    pub fn edge_index(&self) -> &EdgeIndex {
        &self.edges
    }

    pub fn node_columns(&self) -> &[String] {
        &self.node_columns
    }

    pub fn edge_columns(&self) -> &[(String, String)] {
        &self.edge_columns
    }

    pub fn ignore_value(&self) -> Option<&str> {
        self.ignore_value.as_deref()
    }

    /// Extract node identities from `columns` and merge them into the node
    /// index. Repeating a column is a no-op apart from logging.
    pub fn add_nodes<S: AsRef<str>>(&mut self, columns: &[S], ignore: Option<&str>) -> Result<()> {
        let mut candidates: Vec<NodeCandidate> = Vec::new();
        for column in columns {
            let column = column.as_ref();
            let found = NodeIndex::extract(&self.frame, column, ignore)?;
            tracing::debug!(column = %column, count = found.len(), "extracted node identities");
            candidates.extend(found);
            if !self.node_columns.iter().any(|c| c == column) {
                self.node_columns.push(column.to_string());
            }
        }
        self.remember_ignore(ignore);

        let inserted = self.nodes.merge(candidates);
        tracing::debug!(inserted, total = self.nodes.len(), "merged nodes");
        Ok(())
    }

    /// Extract edges for every `(source, target)` pair and make them the
    /// whole edge index.
    ///
    /// This replaces: edges indexed by an earlier call are dropped, so pass
    /// every pair you want in one call. The column ledger still accumulates,
    /// and [`NetFrame::apply_frame`] replays all ledgered pairs together.
    pub fn add_edges<S: AsRef<str>>(
        &mut self,
        pairs: &[(S, S)],
        ignore: Option<&str>,
    ) -> Result<()> {
        let mut candidates: Vec<EdgeCandidate> = Vec::new();
        for (source, target) in pairs {
            let (source, target) = (source.as_ref(), target.as_ref());
            let found = EdgeIndex::extract(&self.frame, source, target, ignore)?;
            tracing::debug!(
                source = %source,
                target = %target,
                count = found.len(),
                "extracted edge identities"
            );
            candidates.extend(found);
            if !self
                .edge_columns
                .iter()
                .any(|(s, t)| s == source && t == target)
            {
                self.edge_columns
                    .push((source.to_string(), target.to_string()));
            }
        }
        self.remember_ignore(ignore);

        self.edges.replace(candidates);
        tracing::debug!(total = self.edges.len(), "replaced edge index");
        Ok(())
    }

    fn remember_ignore(&mut self, ignore: Option<&str>) {
        if let Some(value) = ignore {
            self.ignore_value = Some(value.to_string());
        }
    }

    /// Rebuild the graph from the indexes.
    pub fn populate_network(&mut self) {
        self.graph = projection::project(&self.nodes, &self.edges);
    }

    /// Drop the projected graph. The indexes are kept.
    pub fn flush_network(&mut self) {
        self.graph = Graph::new();
    }

    /// Re-derive everything from the current frame.
    ///
    /// Flushes both indexes and the graph, re-extracts every ledgered node
    /// column and all ledgered edge pairs (in one call), then re-projects.
    /// Attribute overlays are not replayed. The most recent ignore sentinel
    /// is reused.
    pub fn apply_frame(&mut self) -> Result<()> {
        self.nodes.clear();
        self.edges.clear();
        self.flush_network();

        let ignore = self.ignore_value.clone();
        let node_columns = self.node_columns.clone();
        let edge_columns = self.edge_columns.clone();
        self.add_nodes(&node_columns, ignore.as_deref())?;
        self.add_edges(&edge_columns, ignore.as_deref())?;
        self.populate_network();
        Ok(())
    }
}
