//! NodeIndex: one record per node identity, with column provenance.

use std::collections::{HashMap, HashSet};

use netrunner_table::{Frame, Value};

use crate::identity::Identity;
use crate::{Attributes, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRecord {
    pub attributes: Attributes,
    /// Columns this identity was extracted from, in first-seen order.
    pub source_columns: Vec<String>,
}

/// A node identity found in a column, not yet indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCandidate {
    pub identity: Identity,
    pub column: String,
}

/// Insertion-ordered node store.
///
/// Records live in a dense vector; `positions` maps identity to slot. Nothing
/// is ever removed except by [`NodeIndex::clear`], so slots stay stable.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    identities: Vec<Identity>,
    records: Vec<NodeRecord>,
    positions: HashMap<Identity, usize>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.positions.contains_key(identity)
    }

    pub fn get(&self, identity: &Identity) -> Option<&NodeRecord> {
        self.positions.get(identity).map(|&i| &self.records[i])
    }

    pub(crate) fn get_mut(&mut self, identity: &Identity) -> Option<&mut NodeRecord> {
        let i = *self.positions.get(identity)?;
        Some(&mut self.records[i])
    }

    /// Identities in insertion order.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &NodeRecord)> + '_ {
        self.identities.iter().zip(self.records.iter())
    }

    pub fn clear(&mut self) {
        self.identities.clear();
        self.records.clear();
        self.positions.clear();
    }

    /// Distinct identities in `column`, in first-occurrence order.
    ///
    /// Missing cells and cells rendering as `ignore` are skipped.
    pub fn extract(frame: &Frame, column: &str, ignore: Option<&str>) -> Result<Vec<NodeCandidate>> {
        let mut seen: HashSet<Identity> = HashSet::new();
        let mut out = Vec::new();
        for cell in frame.column(column)? {
            if Identity::matches_sentinel(cell, ignore) {
                continue;
            }
            let Some(identity) = Identity::from_cell(cell) else {
                continue;
            };
            if seen.insert(identity.clone()) {
                out.push(NodeCandidate {
                    identity,
                    column: column.to_string(),
                });
            }
        }
        Ok(out)
    }

    /// Add candidates. Existing identities only gain the column in their
    /// provenance (once); their attributes are untouched.
    ///
    /// Returns the number of new records.
    pub fn merge(&mut self, candidates: impl IntoIterator<Item = NodeCandidate>) -> usize {
        let mut inserted = 0;
        for NodeCandidate { identity, column } in candidates {
            match self.positions.get(&identity) {
                Some(&i) => {
                    let record = &mut self.records[i];
                    if record.source_columns.contains(&column) {
                        tracing::trace!(node = %identity, column = %column, "duplicate node");
                    } else {
                        record.source_columns.push(column);
                    }
                }
                None => {
                    self.insert(
                        identity,
                        NodeRecord {
                            attributes: Attributes::new(),
                            source_columns: vec![column],
                        },
                    );
                    inserted += 1;
                }
            }
        }
        inserted
    }

    fn insert(&mut self, identity: Identity, record: NodeRecord) {
        self.positions.insert(identity.clone(), self.records.len());
        self.identities.push(identity);
        self.records.push(record);
    }

    /// Union with another index.
    ///
    /// Provenance lists are concatenated as-is (duplicates across the two
    /// indexes are kept); attributes are unioned with `other` winning per key.
    pub fn absorb(&mut self, other: &NodeIndex) {
        for (identity, theirs) in other.iter() {
            match self.positions.get(identity).copied() {
                Some(i) => {
                    let ours = &mut self.records[i];
                    ours.source_columns
                        .extend(theirs.source_columns.iter().cloned());
                    ours.attributes.extend(
                        theirs
                            .attributes
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                }
                None => self.insert(identity.clone(), theirs.clone()),
            }
        }
    }

    /// Merge one attribute into an existing record. Unknown identities are a
    /// no-op; returns whether a record was touched.
    pub fn set_attribute(&mut self, identity: &Identity, name: &str, value: Value) -> bool {
        match self.get_mut(identity) {
            Some(record) => {
                record.attributes.insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }
}
