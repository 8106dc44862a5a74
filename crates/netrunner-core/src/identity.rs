//! Deduplication keys for nodes and edges.

use std::fmt;
use std::hash::{Hash, Hasher};

use netrunner_table::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node key: any non-missing cell value.
///
/// Equality is by variant and value, so `Int(1)` and `Float(1.0)` are two
/// different identities. Floats compare by bit pattern after folding `-0.0`
/// into `0.0`; NaN never gets this far because it is missing.
#[derive(Debug, Clone)]
pub struct Identity(Value);

impl Identity {
    /// `None` for missing cells (`Null`, NaN).
    pub fn new(value: Value) -> Option<Self> {
        if value.is_missing() {
            None
        } else {
            Some(Identity(value))
        }
    }

    pub fn from_cell(value: &Value) -> Option<Self> {
        Self::new(value.clone())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// True if the cell renders as the caller's ignore sentinel.
    pub(crate) fn matches_sentinel(value: &Value, sentinel: Option<&str>) -> bool {
        sentinel.is_some_and(|s| value.to_string() == s)
    }
}

fn float_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (a, b) => a == b,
        }
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.0).hash(state);
        match &self.0 {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(x) => float_bits(*x).hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Identity::new(value)
            .ok_or_else(|| serde::de::Error::custom("identity cannot be a missing value"))
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Identity(Value::Text(s.to_string()))
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Identity(Value::Text(s))
    }
}

impl From<i64> for Identity {
    fn from(i: i64) -> Self {
        Identity(Value::Int(i))
    }
}

/// An ordered `(source, target)` pair. `(a, b)` and `(b, a)` are distinct
/// keys even though they project onto the same undirected edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeIdentity {
    pub source: Identity,
    pub target: Identity,
}

impl EdgeIdentity {
    pub fn new(source: impl Into<Identity>, target: impl Into<Identity>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

impl fmt::Display for EdgeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}
