//! Tabular frames for Netrunner
//!
//! The graph engine treats its source table as a collaborator that can:
//! - project a column (or a pair of columns, row-wise)
//! - iterate rows while telling missing cells apart from real values
//! - join with another table on a key (`left`, `right`, `inner`, `outer`)
//!
//! [`Frame`] is a small row-major implementation of exactly that surface,
//! plus JSON-records ingestion and a split-and-explode helper.

mod frame;
mod value;

pub use frame::{Frame, JoinHow, Row};
pub use value::Value;

pub type Result<T, E = TableError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),

    #[error("row has {actual} cells, expected {expected}")]
    RaggedRow { expected: usize, actual: usize },

    #[error("invalid records: {0}")]
    InvalidRecords(String),

    #[error("unknown join mode `{0}` (expected left|right|inner|outer)")]
    InvalidJoinMode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
