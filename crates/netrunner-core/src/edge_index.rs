//! EdgeIndex: one record per ordered `(source, target)` identity.

use std::collections::HashMap;

use netrunner_table::{Frame, Value};

use crate::identity::{EdgeIdentity, Identity};
use crate::{Attributes, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeRecord {
    pub attributes: Attributes,
    pub source_column: String,
    pub target_column: String,
}

/// One row's edge, not yet indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeCandidate {
    pub identity: EdgeIdentity,
    pub source_column: String,
    pub target_column: String,
}

/// Insertion-ordered edge store, laid out like [`crate::NodeIndex`].
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    identities: Vec<EdgeIdentity>,
    records: Vec<EdgeRecord>,
    positions: HashMap<EdgeIdentity, usize>,
}

impl EdgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, identity: &EdgeIdentity) -> bool {
        self.positions.contains_key(identity)
    }

    pub fn get(&self, identity: &EdgeIdentity) -> Option<&EdgeRecord> {
        self.positions.get(identity).map(|&i| &self.records[i])
    }

    pub fn identities(&self) -> &[EdgeIdentity] {
        &self.identities
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeIdentity, &EdgeRecord)> + '_ {
        self.identities.iter().zip(self.records.iter())
    }

    pub fn clear(&mut self) {
        self.identities.clear();
        self.records.clear();
        self.positions.clear();
    }

    /// Zip two columns row-wise into edge candidates.
    ///
    /// A row is dropped when either side is missing or renders as `ignore`.
    /// Duplicate pairs are kept here; the index collapses them.
    pub fn extract(
        frame: &Frame,
        source_column: &str,
        target_column: &str,
        ignore: Option<&str>,
    ) -> Result<Vec<EdgeCandidate>> {
        let mut out = Vec::new();
        for (s, t) in frame.column_pairs(source_column, target_column)? {
            if Identity::matches_sentinel(s, ignore) || Identity::matches_sentinel(t, ignore) {
                continue;
            }
            let (Some(source), Some(target)) = (Identity::from_cell(s), Identity::from_cell(t))
            else {
                continue;
            };
            out.push(EdgeCandidate {
                identity: EdgeIdentity { source, target },
                source_column: source_column.to_string(),
                target_column: target_column.to_string(),
            });
        }
        Ok(out)
    }

    /// Make the index hold exactly `candidates`.
    ///
    /// Everything indexed before, attributes included, is dropped. Within the
    /// batch a repeated identity keeps its first position and takes the last
    /// candidate's column pair.
    pub fn replace(&mut self, candidates: impl IntoIterator<Item = EdgeCandidate>) {
        self.clear();
        for EdgeCandidate {
            identity,
            source_column,
            target_column,
        } in candidates
        {
            self.upsert(
                identity,
                EdgeRecord {
                    attributes: Attributes::new(),
                    source_column,
                    target_column,
                },
            );
        }
    }

    /// Insert or overwrite one record, keeping the existing slot on overwrite.
    pub fn upsert(&mut self, identity: EdgeIdentity, record: EdgeRecord) {
        match self.positions.get(&identity).copied() {
            Some(i) => {
                tracing::trace!(edge = %identity, "edge record overwritten");
                self.records[i] = record;
            }
            None => {
                self.positions.insert(identity.clone(), self.records.len());
                self.identities.push(identity);
                self.records.push(record);
            }
        }
    }

    /// Union with another index; `other` wins on identity collisions.
    pub fn absorb(&mut self, other: &EdgeIndex) {
        for (identity, record) in other.iter() {
            self.upsert(identity.clone(), record.clone());
        }
    }

    pub fn set_attribute(&mut self, identity: &EdgeIdentity, name: &str, value: Value) -> bool {
        match self.positions.get(identity).copied() {
            Some(i) => {
                self.records[i]
                    .attributes
                    .insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }
}
