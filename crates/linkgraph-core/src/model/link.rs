use crate::types::Cardinality;

///
/// Association
/// Join relation storing `(from, to)` id pairs.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Association {
    pub table: String,
    pub from_column: String,
    pub to_column: String,
}

impl Association {
    #[must_use]
    pub fn new(table: &str, from_column: &str, to_column: &str) -> Self {
        Self {
            table: table.to_string(),
            from_column: from_column.to_string(),
            to_column: to_column.to_string(),
        }
    }

    /// The same relation walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(&self.table, &self.to_column, &self.from_column)
    }
}

///
/// LinkStrategy
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LinkStrategy {
    /// To-many via an association table, one select per batch.
    Association(Association),

    /// To-one; the required field already holds the target id.
    ForeignKey,
}

///
/// LinkModel
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkModel {
    name: String,
    target: String,
    cardinality: Cardinality,
    requires: String,
    strategy: LinkStrategy,
}

impl LinkModel {
    /// To-many link through `association`, keyed by the source `id` field.
    #[must_use]
    pub fn association(name: &str, target: &str, association: Association) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            cardinality: Cardinality::Many,
            requires: "id".to_string(),
            strategy: LinkStrategy::Association(association),
        }
    }

    /// To-one link whose target id is the value of `requires`.
    #[must_use]
    pub fn foreign_key(name: &str, target: &str, requires: &str) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            cardinality: Cardinality::One,
            requires: requires.to_string(),
            strategy: LinkStrategy::ForeignKey,
        }
    }

    /// Override the source field fed into the resolver.
    #[must_use]
    pub fn requires(mut self, field: &str) -> Self {
        self.requires = field.to_string();
        self
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
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub fn required_field(&self) -> &str {
        &self.requires
    }

    #[must_use]
    pub const fn strategy(&self) -> &LinkStrategy {
        &self.strategy
    }
}
