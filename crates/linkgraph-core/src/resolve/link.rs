use crate::{
    error::Error,
    model::{EntityModel, LinkStrategy, RootLink, RootStrategy},
    store::{SelectSpec, Store, StoreError},
    types::Id,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// LinkTargets
///
/// Resolver output keyed by the link's required-field value. Every key of
/// the input batch is present; an empty list or `None` means no target.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LinkTargets {
    Many(BTreeMap<Id, Vec<Id>>),
    One(BTreeMap<Id, Option<Id>>),
}

impl LinkTargets {
    /// Union of all target ids, the next depth's batch.
    #[must_use]
    pub fn target_ids(&self) -> BTreeSet<Id> {
        match self {
            Self::Many(map) => map.values().flatten().copied().collect(),
            Self::One(map) => map.values().flatten().copied().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Many(map) => map.len(),
            Self::One(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve `link_name` on `entity` for a whole batch of source keys.
pub fn resolve_link(
    store: &dyn Store,
    entity: &EntityModel,
    link_name: &str,
    source_keys: &BTreeSet<Id>,
) -> Result<LinkTargets, Error> {
    let link = entity
        .get_link(link_name)
        .ok_or_else(|| Error::unknown_link(entity.name(), link_name))?;

    match link.strategy() {
        LinkStrategy::ForeignKey => Ok(LinkTargets::One(
            source_keys.iter().map(|&k| (k, Some(k))).collect(),
        )),

        LinkStrategy::Association(assoc) => {
            let mut targets: BTreeMap<Id, Vec<Id>> =
                source_keys.iter().map(|&k| (k, Vec::new())).collect();
            if source_keys.is_empty() {
                return Ok(LinkTargets::Many(targets));
            }

            let select = SelectSpec::new(&assoc.table, &[&assoc.from_column, &assoc.to_column])
                .with_filter(&assoc.from_column, source_keys.clone());

            for row in store.execute(&select)? {
                let (Some(from), Some(to)) = (
                    row.first().and_then(|v| v.as_id()),
                    row.get(1).and_then(|v| v.as_id()),
                ) else {
                    return Err(StoreError::Corrupt {
                        table: assoc.table.clone(),
                        column: assoc.to_column.clone(),
                        message: "association row does not hold two integer keys".to_string(),
                    }
                    .into());
                };

                // rows outside the batch are ignored, a store may over-fetch
                if let Some(list) = targets.get_mut(&from) {
                    list.push(to);
                }
            }

            Ok(LinkTargets::Many(targets))
        }
    }
}

/// Enumerate the id list for a root link.
pub fn resolve_root(store: &dyn Store, root: &RootLink) -> Result<Vec<Id>, Error> {
    match root.strategy() {
        RootStrategy::Scan { table, column } => store
            .execute(&SelectSpec::new(table, &[column]))?
            .into_iter()
            .map(|row| {
                row.first().and_then(|v| v.as_id()).ok_or_else(|| {
                    Error::from(StoreError::Corrupt {
                        table: table.clone(),
                        column: column.clone(),
                        message: "key is not an integer".to_string(),
                    })
                })
            })
            .collect(),
        RootStrategy::Custom(resolve) => resolve(store),
    }
}
