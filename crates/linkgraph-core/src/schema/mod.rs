//! Schema registry and composition.
//!
//! A `Schema` is built once from static declarations, validated as a whole,
//! and shared read-only (behind `Arc`) by every execution.

mod validate;


use crate::{
    enums::EnumRegistry,
    error::Error,
    model::{EntityModel, RootLink},
};
use indexmap::IndexMap;
use std::{collections::BTreeMap, sync::Arc};

///
/// Schema
///

#[derive(Debug)]
pub struct Schema {
    entities: BTreeMap<String, Arc<EntityModel>>,
    roots: IndexMap<String, RootLink>,
    enums: Arc<EnumRegistry>,
}

impl Schema {
    /// Look up an entity type by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Arc<EntityModel>> {
        self.entities.get(name)
    }

    #[must_use]
    pub fn root(&self, name: &str) -> Option<&RootLink> {
        self.roots.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<EntityModel>> {
        self.entities.values()
    }

    /// Root links in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &RootLink> {
        self.roots.values()
    }

    #[must_use]
    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    #[must_use]
    pub fn shared_enums(&self) -> Arc<EnumRegistry> {
        Arc::clone(&self.enums)
    }
}

/// Validate and assemble a schema.
///
/// Every problem is collected into one `ErrorTree`; a schema that fails here
/// must not be used to start a process.
pub fn compose_schema(
    entities: impl IntoIterator<Item = EntityModel>,
    roots: impl IntoIterator<Item = RootLink>,
    enums: impl Into<Arc<EnumRegistry>>,
) -> Result<Schema, Error> {
    let entities: Vec<EntityModel> = entities.into_iter().collect();
    let roots: Vec<RootLink> = roots.into_iter().collect();
    let enums = enums.into();

    validate::validate_schema(&entities, &roots, &enums).map_err(Error::SchemaComposition)?;

    Ok(Schema {
        entities: entities
            .into_iter()
            .map(|e| (e.name().to_string(), Arc::new(e)))
            .collect(),
        roots: roots
            .into_iter()
            .map(|r| (r.name().to_string(), r))
            .collect(),
        enums,
    })
}
