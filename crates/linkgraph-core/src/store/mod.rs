//! Backing store capability.
//!
//! The engine reads through `Store::execute` only. A `SelectSpec` names a
//! table, a column list, and an optional `column IN (ids)` filter; nothing
//! else crosses this boundary.

mod codec;
mod memory;

use crate::{types::Id, value::Value};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

// re-exports
pub use codec::{ColumnCodec, decode_enum_set, encode_enum_set};
pub use memory::MemoryStore;

///
/// Row
/// Values in the order of the `SelectSpec` columns.
///

pub type Row = Vec<Value>;

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("table '{0}' not found")]
    UnknownTable(String),

    #[error("column '{column}' not found in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("row arity {found} does not match table '{table}' ({expected} columns)")]
    Arity {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("corrupt value in '{table}.{column}': {message}")]
    Corrupt {
        table: String,
        column: String,
        message: String,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

///
/// KeyFilter
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyFilter {
    pub column: String,
    pub keys: BTreeSet<Id>,
}

///
/// SelectSpec
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectSpec {
    pub table: String,
    pub columns: Vec<String>,
    pub filter: Option<KeyFilter>,
}

impl SelectSpec {
    #[must_use]
    pub fn new<S: AsRef<str>>(table: &str, columns: &[S]) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            filter: None,
        }
    }

    /// Restrict to rows whose `column` holds one of `keys`.
    #[must_use]
    pub fn with_filter(mut self, column: &str, keys: BTreeSet<Id>) -> Self {
        self.filter = Some(KeyFilter {
            column: column.to_string(),
            keys,
        });
        self
    }
}

///
/// Store
///
/// Read capability over a relational backing store.
/// Implementations must tolerate concurrent calls from the worker pool.
///

pub trait Store: Send + Sync {
    fn execute(&self, select: &SelectSpec) -> Result<Vec<Row>, StoreError>;
}
