//! ## Crate layout
//! - `core`: schema models, composition, resolvers, the engine, and the store capability.
//!
//! The `prelude` module carries everything a schema declaration and a caller
//! need; resolver entrypoints stay under `core::resolve`.

pub use linkgraph_core as core;

// export so things just work in downstream schema crates
extern crate self as linkgraph;

/// re-exports
///
/// schema crates can use these without naming them in their own Cargo.toml
pub mod __reexports {
    pub use serde;
    pub use serde_json;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{
    config::EngineConfig,
    error::{Error, ErrorClass},
    exec::{CancelToken, Engine},
    schema::{Schema, compose_schema},
};

/// Render a response as JSON text.
pub fn to_json(response: &crate::core::query::Response, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    }
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        enums::{EnumDef, EnumRegistry},
        exec::{CancelToken, Engine},
        model::{Association, EntityModel, FieldModel, LinkModel, RootLink},
        obs::{CountingSink, MetricsSink, TracingSink},
        query::{Request, Response, ResultValue, Selection},
        schema::{Schema, compose_schema},
        store::{MemoryStore, Store},
        types::{Cardinality, FieldType, Id, ScalarKind},
        value::{Record, Value},
    };
}
