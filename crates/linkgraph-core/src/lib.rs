//! Core runtime for linkgraph: schema models, composition, batched resolvers,
//! the execution engine, and the store capability the engine reads through.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod enums;
pub mod error;
pub mod exec;
pub mod model;
pub mod obs;
pub mod query;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Maximum length of an entity, field, link, or root name.
pub const MAX_NAME_LEN: usize = 64;

/// Upper bound on the worker pool size accepted from configuration.
pub const MAX_WORKER_THREADS: usize = 256;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No executors, stores, or resolver entrypoints are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{Association, EntityModel, FieldModel, LinkModel, RootLink},
        query::{Request, Selection},
        types::{Cardinality, FieldType, Id, ScalarKind},
        value::{Record, Value},
    };
}
