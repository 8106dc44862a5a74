//! Attribute overlays: table columns and graph-algorithm results merged into
//! node and edge attribute bags.
//!
//! Both halves are permissive about lookups: a declared column that is not a
//! ledgered node/edge column, or a row value with no record, is skipped. A
//! result whose *shape* is not understood is an error.

use std::collections::HashMap;

use netrunner_table::Value;

use crate::config::EdgeAttributeSpec;
use crate::identity::{EdgeIdentity, Identity};
use crate::{NetFrame, NetFrameError, Result};

/// Output of an external graph algorithm, in one of the three shapes the
/// engine accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmResult {
    /// `(node, value)` pairs, e.g. degree.
    PairSequence(Vec<(Identity, Value)>),
    /// `node -> value`, e.g. centrality. Entries apply in the order given.
    Mapping(Vec<(Identity, Value)>),
    /// Ordered groups of nodes, e.g. communities. Each member receives its
    /// group's 0-based position.
    Partition(Vec<Vec<Identity>>),
}

impl AlgorithmResult {
    /// Read a tagged JSON result:
    ///
    /// - `{"pairs": [[node, value], ...]}`
    /// - `{"mapping": {"node": value, ...}}` (keys are text; see
    ///   [`NetFrame::apply_result`] for how they meet non-text nodes)
    /// - `{"partition": [[node, ...], ...]}`
    ///
    /// Anything else fails with [`NetFrameError::UnsupportedResultShape`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let unsupported = || NetFrameError::UnsupportedResultShape {
            found: describe(value),
        };
        let serde_json::Value::Object(obj) = value else {
            return Err(unsupported());
        };
        let mut entries = obj.iter();
        let (Some((tag, body)), None) = (entries.next(), entries.next()) else {
            return Err(unsupported());
        };

        match (tag.as_str(), body) {
            ("pairs", serde_json::Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let serde_json::Value::Array(pair) = item else {
                        return Err(unsupported());
                    };
                    let [node, scalar] = pair.as_slice() else {
                        return Err(unsupported());
                    };
                    let node = identity(node).ok_or_else(unsupported)?;
                    let scalar = scalar_of(scalar).ok_or_else(unsupported)?;
                    out.push((node, scalar));
                }
                Ok(Self::PairSequence(out))
            }
            ("mapping", serde_json::Value::Object(map)) => {
                let mut out = Vec::with_capacity(map.len());
                for (key, scalar) in map {
                    let scalar = scalar_of(scalar).ok_or_else(unsupported)?;
                    out.push((Identity::from(key.as_str()), scalar));
                }
                Ok(Self::Mapping(out))
            }
            ("partition", serde_json::Value::Array(groups)) => {
                let mut out = Vec::with_capacity(groups.len());
                for group in groups {
                    let serde_json::Value::Array(members) = group else {
                        return Err(unsupported());
                    };
                    let members = members
                        .iter()
                        .map(identity)
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(unsupported)?;
                    out.push(members);
                }
                Ok(Self::Partition(out))
            }
            _ => Err(unsupported()),
        }
    }

    /// `(node, value)` assignments in application order.
    fn assignments(&self) -> Vec<(&Identity, Value)> {
        match self {
            Self::PairSequence(pairs) => pairs.iter().map(|(n, v)| (n, v.clone())).collect(),
            Self::Mapping(map) => map.iter().map(|(n, v)| (n, v.clone())).collect(),
            Self::Partition(groups) => groups
                .iter()
                .enumerate()
                .flat_map(|(idx, group)| {
                    group.iter().map(move |n| (n, Value::Int(idx as i64)))
                })
                .collect(),
        }
    }
}

fn identity(value: &serde_json::Value) -> Option<Identity> {
    Identity::new(Value::from_json(value)?)
}

fn scalar_of(value: &serde_json::Value) -> Option<Value> {
    Value::from_json(value)
}

fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(_) => "boolean".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Array(items) => format!("untagged array of {}", items.len()),
        serde_json::Value::Object(obj) => {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
    }
}

impl NetFrame {
    /// Merge an algorithm result into the node attribute bags under `name`.
    ///
    /// Mapping keys that match no node exactly fall back to the first node
    /// (in index order) with the same display form, so `{"mapping": {"1": ..}}`
    /// reaches an integer node `1`. Nodes still missing from the index are
    /// skipped with a warning. Re-applying the same result leaves the bags
    /// unchanged. Returns the number of assignments applied.
    pub fn apply_result(&mut self, result: &AlgorithmResult, name: &str) -> usize {
        let by_display = match result {
            AlgorithmResult::Mapping(_) => self.display_lookup(),
            _ => HashMap::new(),
        };
        let mut applied = 0;
        let mut skipped = 0;
        for (node, value) in result.assignments() {
            let node = if self.nodes.contains(node) {
                node.clone()
            } else if let Some(found) = by_display.get(&node.to_string()) {
                found.clone()
            } else {
                tracing::trace!(node = %node, attribute = %name, "result for unknown node skipped");
                skipped += 1;
                continue;
            };
            self.nodes.set_attribute(&node, name, value.clone());
            if let Some(attrs) = self.graph.node_attributes_mut(&node) {
                attrs.insert(name.to_string(), value);
            }
            applied += 1;
        }
        if skipped > 0 {
            tracing::warn!(attribute = %name, applied, skipped, "result entries matched no node");
        }
        tracing::debug!(attribute = %name, applied, "applied algorithm result");
        applied
    }

    fn display_lookup(&self) -> HashMap<String, Identity> {
        let mut lookup = HashMap::with_capacity(self.nodes.len());
        for identity in self.nodes.identities() {
            lookup
                .entry(identity.to_string())
                .or_insert_with(|| identity.clone());
        }
        lookup
    }

    /// [`NetFrame::apply_result`] for a tagged JSON result.
    pub fn apply_result_json(&mut self, result: &serde_json::Value, name: &str) -> Result<usize> {
        let result = AlgorithmResult::from_json(result)?;
        Ok(self.apply_result(&result, name))
    }

    /// For each node column, copy the listed attribute columns of every row
    /// into the record of that row's node.
    ///
    /// Columns are visited in declaration order, so when two node columns
    /// write the same attribute of one node the later declaration wins.
    ///
    /// Node columns that are not ledgered, rows whose node is not indexed,
    /// and missing attribute cells are skipped. Attribute columns must exist
    /// in the frame. Rows are visited in frame order, so a later row wins.
    pub fn apply_node_attributes(
        &mut self,
        declared: &[(String, Vec<String>)],
    ) -> Result<usize> {
        let mut applied = 0;
        for (column, attributes) in declared {
            if !self.node_columns.contains(column) {
                tracing::debug!(column = %column, "attributes for undeclared node column skipped");
                continue;
            }
            for attr in attributes {
                if !self.frame.has_column(attr) {
                    return Err(netrunner_table::TableError::UnknownColumn(attr.clone()).into());
                }
            }

            for row in self.frame.rows() {
                let Some(node) = row.get(column).and_then(Identity::from_cell) else {
                    continue;
                };
                if !self.nodes.contains(&node) {
                    continue;
                }
                for attr in attributes {
                    let Some(value) = row.get(attr).filter(|v| !v.is_missing()) else {
                        continue;
                    };
                    self.nodes.set_attribute(&node, attr, value.clone());
                    if let Some(bag) = self.graph.node_attributes_mut(&node) {
                        bag.insert(attr.clone(), value.clone());
                    }
                    applied += 1;
                }
            }
        }
        tracing::debug!(applied, "applied node attributes");
        Ok(applied)
    }

    /// Edge counterpart of [`NetFrame::apply_node_attributes`].
    ///
    /// Rows are matched to edges in extraction direction, i.e. by
    /// `(source cell, target cell)` of the declared pair.
    pub fn apply_edge_attributes(&mut self, declared: &[EdgeAttributeSpec]) -> Result<usize> {
        let mut applied = 0;
        for decl in declared {
            let ledgered = self
                .edge_columns
                .iter()
                .any(|(s, t)| *s == decl.source && *t == decl.target);
            if !ledgered {
                tracing::debug!(
                    source = %decl.source,
                    target = %decl.target,
                    "attributes for undeclared edge columns skipped"
                );
                continue;
            }
            for attr in &decl.attributes {
                if !self.frame.has_column(attr) {
                    return Err(netrunner_table::TableError::UnknownColumn(attr.clone()).into());
                }
            }

            for row in self.frame.rows() {
                let source = row.get(&decl.source).and_then(Identity::from_cell);
                let target = row.get(&decl.target).and_then(Identity::from_cell);
                let (Some(source), Some(target)) = (source, target) else {
                    continue;
                };
                let edge = EdgeIdentity { source, target };
                if !self.edges.contains(&edge) {
                    continue;
                }
                for attr in &decl.attributes {
                    let Some(value) = row.get(attr).filter(|v| !v.is_missing()) else {
                        continue;
                    };
                    self.edges.set_attribute(&edge, attr, value.clone());
                    if let Some(bag) = self.graph.edge_attributes_mut(&edge.source, &edge.target) {
                        bag.insert(attr.clone(), value.clone());
                    }
                    applied += 1;
                }
            }
        }
        tracing::debug!(applied, "applied edge attributes");
        Ok(applied)
    }
}
