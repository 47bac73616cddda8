//! Star Wars demo domain: enums, the storage and display graphs, and
//! deterministic fixture rows for a `MemoryStore`.

pub mod enums;
pub mod fixtures;
pub mod graph;

pub use fixtures::{IdSequence, TableRows, fixture_rows, seed};
pub use graph::{display_schema, index_request, storage_schema};
