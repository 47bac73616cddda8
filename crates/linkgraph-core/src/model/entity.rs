use crate::model::{field::FieldModel, link::LinkModel};
use std::sync::Arc;

///
/// TableBinding
/// Store table backing a storage-facing entity.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableBinding {
    pub table: String,
    pub key_column: String,
}

///
/// EntitySource
///
/// Where an entity's field inputs come from. A storage entity reads raw
/// columns; an embedded entity takes the inner entity's fields as private
/// inputs and layers its own computed fields on top.
///

#[derive(Clone, Debug)]
pub enum EntitySource {
    Table(TableBinding),
    Embedded(Arc<EntityModel>),
}

///
/// EntityModel
///

#[derive(Clone, Debug)]
pub struct EntityModel {
    name: String,
    source: EntitySource,
    fields: Vec<FieldModel>,
    links: Vec<LinkModel>,
}

impl EntityModel {
    /// Storage-facing entity backed by `table`, keyed by `key_column`.
    #[must_use]
    pub fn table(name: &str, table: &str, key_column: &str) -> Self {
        Self {
            name: name.to_string(),
            source: EntitySource::Table(TableBinding {
                table: table.to_string(),
                key_column: key_column.to_string(),
            }),
            fields: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Entity embedding `inner`; inner fields become dependency inputs.
    #[must_use]
    pub fn wrap(name: &str, inner: &Arc<Self>) -> Self {
        Self {
            name: name.to_string(),
            source: EntitySource::Embedded(Arc::clone(inner)),
            fields: Vec::new(),
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn link(mut self, link: LinkModel) -> Self {
        self.links.push(link);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn source(&self) -> &EntitySource {
        &self.source
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    #[must_use]
    pub fn links(&self) -> &[LinkModel] {
        &self.links
    }

    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub fn get_link(&self, name: &str) -> Option<&LinkModel> {
        self.links.iter().find(|l| l.name() == name)
    }

    #[must_use]
    pub const fn inner(&self) -> Option<&Arc<Self>> {
        match &self.source {
            EntitySource::Embedded(inner) => Some(inner),
            EntitySource::Table(_) => None,
        }
    }

    #[must_use]
    pub const fn table_binding(&self) -> Option<&TableBinding> {
        match &self.source {
            EntitySource::Table(binding) => Some(binding),
            EntitySource::Embedded(_) => None,
        }
    }

    /// Whether `name` is readable as an input on this entity: one of its own
    /// fields or, for an embedded entity, a field of the inner entity.
    #[must_use]
    pub fn has_input(&self, name: &str) -> bool {
        self.get_field(name).is_some() || self.inner().is_some_and(|i| i.has_input(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[test]
    fn wrapped_entity_sees_inner_inputs() {
        let inner = Arc::new(
            EntityModel::table("planet", "planet", "id")
                .field(FieldModel::raw("id", FieldType::INT))
                .field(FieldModel::raw("name", FieldType::TEXT)),
        );
        let outer = EntityModel::wrap("planet", &inner)
            .field(FieldModel::passthrough("name", FieldType::TEXT));

        assert!(outer.has_input("id"));
        assert!(outer.get_field("id").is_none());
        assert!(outer.table_binding().is_none());
        assert_eq!(outer.inner().unwrap().name(), "planet");
    }
}
