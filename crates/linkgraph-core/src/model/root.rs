use crate::{error::Error, store::Store, types::Id};
use std::fmt;

///
/// RootFn
///
/// Custom root enumeration; receives the store explicitly.
///

pub type RootFn = fn(&dyn Store) -> Result<Vec<Id>, Error>;

///
/// RootStrategy
///

#[derive(Clone)]
pub enum RootStrategy {
    /// Select every value of `column` from `table`.
    Scan { table: String, column: String },

    Custom(RootFn),
}

impl fmt::Debug for RootStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan { table, column } => f
                .debug_struct("Scan")
                .field("table", table)
                .field("column", column)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

///
/// RootLink
/// Query entry point; always to-many, never requires a source field.
///

#[derive(Clone, Debug)]
pub struct RootLink {
    name: String,
    target: String,
    strategy: RootStrategy,
}

impl RootLink {
    #[must_use]
    pub fn scan(name: &str, target: &str, table: &str, column: &str) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            strategy: RootStrategy::Scan {
                table: table.to_string(),
                column: column.to_string(),
            },
        }
    }

    #[must_use]
    pub fn custom(name: &str, target: &str, resolve: RootFn) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            strategy: RootStrategy::Custom(resolve),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn strategy(&self) -> &RootStrategy {
        &self.strategy
    }
}
