//! Netrunner core: a table-to-graph projection engine
//!
//! A [`NetFrame`] owns a tabular [`Frame`] and derives a graph from it:
//! - declared node columns feed a [`NodeIndex`] (identity -> attributes and
//!   source-column provenance)
//! - declared `(source, target)` column pairs feed an [`EdgeIndex`]
//! - [`project`] turns both indexes into an undirected [`Graph`]
//!
//! Around that core sit algorithm-result overlays ([`AlgorithmResult`]),
//! frame and graph joins, a node-link JSON document for viewers, a few graph
//! measures ([`analysis`]) and label-grouped export planning ([`ExportPlan`]).

use std::collections::BTreeMap;

pub mod analysis;
mod config;
mod document;
mod edge_index;
mod export;
mod identity;
mod merge;
mod netframe;
mod node_index;
mod overlay;
mod projection;

pub use config::{EdgeAttributeSpec, FrameSpec};
pub use document::{LinkEntry, NodeEntry, NodeLinkDocument};
pub use edge_index::{EdgeCandidate, EdgeIndex, EdgeRecord};
pub use export::{
    EdgeLabel, ExportPlan, LabelMapping, NodeBatch, PlannedEdge, PlannedNode, RelationshipBatch,
};
pub use identity::{EdgeIdentity, Identity};
pub use netframe::NetFrame;
pub use node_index::{NodeCandidate, NodeIndex, NodeRecord};
pub use overlay::AlgorithmResult;
pub use projection::{project, Graph, GraphEdge, GraphNode};

pub use netrunner_table::{Frame, JoinHow, TableError, Value};

/// Attribute bag of a node or edge. Keys are kept sorted.
pub type Attributes = BTreeMap<String, Value>;

pub type Result<T, E = NetFrameError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum NetFrameError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("unsupported algorithm result shape: {found}")]
    UnsupportedResultShape { found: String },

    #[error("no relationship label for ({source_label}, {target_label})")]
    MissingLabelMapping {
        source_label: String,
        target_label: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
