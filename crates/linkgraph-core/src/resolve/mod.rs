//! Batched resolvers.
//!
//! - `fields`: one select per (entity, id set) for raw columns
//! - `link`: one select per (link, source-key set), plus root enumeration
//! - `computed`: pure evaluation of derived fields
//! - `records`: field planning across embedded entities

mod computed;
mod fields;
mod link;
mod records;

#[cfg(test)]
mod tests;

use crate::{enums::EnumRegistry, obs::MetricsSink, store::Store};

pub use computed::{enum_titles, evaluate};
pub use fields::fetch_fields;
pub use link::{LinkTargets, resolve_link, resolve_root};
pub use records::load_records;

///
/// ResolveContext
///
/// Explicit dependencies of every resolver call. Built per execution; the
/// store is never looked up by name.
///

#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub store: &'a dyn Store,
    pub enums: &'a EnumRegistry,
    pub sink: &'a dyn MetricsSink,
}
