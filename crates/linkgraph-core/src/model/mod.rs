//! Declarative schema models.
//!
//! Entities, fields, links and root links are plain owned data built once at
//! startup. Composition (`crate::schema`) validates them and freezes them
//! behind `Arc`.

mod entity;
mod field;
mod link;
mod root;

pub use entity::{EntityModel, EntitySource, TableBinding};
pub use field::{ComputeFn, FieldKind, FieldModel};
pub use link::{Association, LinkModel, LinkStrategy};
pub use root::{RootFn, RootLink, RootStrategy};
