//! Export planning for bulk graph-database loaders.
//!
//! Builds label-grouped node batches and relationship batches from a
//! [`NetFrame`]'s indexes. No database is touched here: a loader takes the
//! plan and performs the inserts. Planning is all-or-nothing: an edge group
//! with no relationship label aborts the whole plan.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::{Attributes, NetFrame, NetFrameError, Result};

/// Node labels and relationship labels.
///
/// `node_labels` renames source columns: `{"King": ["attacker_king",
/// "defender_king"]}` puts nodes from either column under `King`. Columns not
/// listed keep their own name as label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelMapping {
    pub node_labels: BTreeMap<String, Vec<String>>,
    pub edge_labels: Vec<EdgeLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub source_label: String,
    pub target_label: String,
    pub relationship: String,
}

impl LabelMapping {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn node_label<'a>(&'a self, column: &'a str) -> &'a str {
        self.node_labels
            .iter()
            .find(|(_, columns)| columns.iter().any(|c| c == column))
            .map(|(label, _)| label.as_str())
            .unwrap_or(column)
    }

    fn relationship(&self, source_label: &str, target_label: &str) -> Option<&str> {
        self.edge_labels
            .iter()
            .find(|l| l.source_label == source_label && l.target_label == target_label)
            .map(|l| l.relationship.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedNode {
    pub name: Identity,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBatch {
    pub label: String,
    pub nodes: Vec<PlannedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedEdge {
    pub source: Identity,
    pub target: Identity,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipBatch {
    pub source_label: String,
    pub target_label: String,
    pub relationship: String,
    pub edges: Vec<PlannedEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportPlan {
    pub node_batches: Vec<NodeBatch>,
    pub relationship_batches: Vec<RelationshipBatch>,
}

impl ExportPlan {
    pub fn build(nf: &NetFrame, labels: &LabelMapping) -> Result<Self> {
        let mut plan = ExportPlan::default();

        // Nodes: one entry per (label, node), batches in first-seen label order.
        let mut node_slots: HashMap<String, usize> = HashMap::new();
        for (identity, record) in nf.node_index().iter() {
            let mut placed: Vec<&str> = Vec::new();
            for column in &record.source_columns {
                let label = labels.node_label(column);
                if placed.contains(&label) {
                    continue;
                }
                placed.push(label);
                let slot = *node_slots.entry(label.to_string()).or_insert_with(|| {
                    plan.node_batches.push(NodeBatch {
                        label: label.to_string(),
                        nodes: Vec::new(),
                    });
                    plan.node_batches.len() - 1
                });
                plan.node_batches[slot].nodes.push(PlannedNode {
                    name: identity.clone(),
                    attributes: record.attributes.clone(),
                });
            }
        }

        // Edges: group by resolved (source label, target label).
        let mut edge_slots: HashMap<(String, String), usize> = HashMap::new();
        for (identity, record) in nf.edge_index().iter() {
            let source_label = labels.node_label(&record.source_column).to_string();
            let target_label = labels.node_label(&record.target_column).to_string();
            let key = (source_label, target_label);
            let slot = match edge_slots.get(&key) {
                Some(&slot) => slot,
                None => {
                    let relationship = labels
                        .relationship(&key.0, &key.1)
                        .ok_or_else(|| NetFrameError::MissingLabelMapping {
                            source_label: key.0.clone(),
                            target_label: key.1.clone(),
                        })?;
                    plan.relationship_batches.push(RelationshipBatch {
                        source_label: key.0.clone(),
                        target_label: key.1.clone(),
                        relationship: relationship.to_string(),
                        edges: Vec::new(),
                    });
                    let slot = plan.relationship_batches.len() - 1;
                    edge_slots.insert(key, slot);
                    slot
                }
            };
            plan.relationship_batches[slot].edges.push(PlannedEdge {
                source: identity.source.clone(),
                target: identity.target.clone(),
                attributes: record.attributes.clone(),
            });
        }

        tracing::debug!(
            node_batches = plan.node_batches.len(),
            relationship_batches = plan.relationship_batches.len(),
            "built export plan"
        );
        Ok(plan)
    }
}
