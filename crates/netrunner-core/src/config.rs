//! Column declarations for building a [`crate::NetFrame`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Which columns become nodes and edges, and which columns to overlay as
/// attributes.
///
/// ```json
/// {
///   "nodes": ["name", "attacker_king"],
///   "links": [["name", "attacker_king"]],
///   "ignore_value": "None",
///   "node_attributes": {"name": ["year"]},
///   "edge_attributes": [
///     {"source": "name", "target": "attacker_king", "attributes": ["attacker_outcome"]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSpec {
    pub nodes: Vec<String>,
    pub links: Vec<(String, String)>,
    pub ignore_value: Option<String>,
    /// `node column -> attribute columns`, kept in declaration order.
    #[serde(with = "declared_order")]
    pub node_attributes: Vec<(String, Vec<String>)>,
    pub edge_attributes: Vec<EdgeAttributeSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttributeSpec {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl FrameSpec {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_nodes<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_link(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.links.push((source.into(), target.into()));
        self
    }

    pub fn with_ignore_value(mut self, value: impl Into<String>) -> Self {
        self.ignore_value = Some(value.into());
        self
    }

    pub fn with_node_attributes<I, S>(mut self, column: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let column = column.into();
        let attributes = attributes.into_iter().map(Into::into);
        match self.node_attributes.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => existing.extend(attributes),
            None => self.node_attributes.push((column, attributes.collect())),
        }
        self
    }

    pub fn with_edge_attributes<I, S>(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        attributes: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_attributes.push(EdgeAttributeSpec {
            source: source.into(),
            target: target.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// A JSON object read into `(key, value)` pairs in document order. A
/// repeated key keeps its first position and its last value.
mod declared_order {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    type Entries = Vec<(String, Vec<String>)>;

    pub fn serialize<S: Serializer>(entries: &Entries, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (column, attributes) in entries {
            map.serialize_entry(column, attributes)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Entries, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from node column to attribute columns")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Entries, A::Error> {
                let mut out: Entries = Vec::new();
                while let Some((column, attributes)) = access.next_entry::<String, Vec<String>>()? {
                    match out.iter_mut().find(|(c, _)| *c == column) {
                        Some(entry) => entry.1 = attributes,
                        None => out.push((column, attributes)),
                    }
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
