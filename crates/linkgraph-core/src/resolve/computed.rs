use crate::{
    enums::EnumRegistry,
    error::Error,
    model::{FieldKind, FieldModel},
    types::{FieldType, ScalarKind},
    value::{Record, Value},
};
use std::collections::BTreeSet;

/// Evaluate one field against an already-resolved input record.
///
/// Raw fields are read through unchanged. Derived fields read their declared
/// dependencies from `inputs`; a dependency that is not there is a scheduling
/// defect, reported as `MissingDependency`. Results are not checked against
/// the declared type.
pub fn evaluate(
    entity: &str,
    field: &FieldModel,
    inputs: &Record,
    enums: &EnumRegistry,
) -> Result<Value, Error> {
    Ok(match field.kind() {
        FieldKind::Raw { .. } => inputs
            .get(field.name())
            .cloned()
            .ok_or_else(|| Error::missing_dependency(entity, field.name(), field.name()))?,

        FieldKind::Computed {
            dependencies,
            compute,
        } => {
            let args = dependencies
                .iter()
                .map(|dep| {
                    inputs
                        .get(dep)
                        .ok_or_else(|| Error::missing_dependency(entity, field.name(), dep))
                })
                .collect::<Result<Vec<_>, _>>()?;

            compute(&args)?
        }

        FieldKind::EnumTitles {
            dependency,
            enum_type,
        } => {
            let input = inputs
                .get(dependency)
                .ok_or_else(|| Error::missing_dependency(entity, field.name(), dependency))?;
            let values = match input {
                Value::Null => BTreeSet::new(),
                Value::Int(v) => BTreeSet::from([*v]),
                Value::EnumSet(set) => set.clone(),
                other => return Err(not_an_enum_set(entity, field, other.clone())),
            };

            match enum_titles(enums, enum_type, &values)? {
                Some(joined) => Value::Text(joined),
                None if field.ty().optional => Value::Null,
                None => Value::Text(String::new()),
            }
        }
    })
}

/// Titles of `values`, sorted lexicographically and joined with ", ".
/// `None` when there is nothing to join.
pub fn enum_titles(
    enums: &EnumRegistry,
    enum_type: &str,
    values: &BTreeSet<i64>,
) -> Result<Option<String>, Error> {
    if values.is_empty() {
        return Ok(None);
    }

    let mut titles = values
        .iter()
        .map(|&v| enums.title_of(enum_type, v))
        .collect::<Result<Vec<_>, _>>()?;
    titles.sort_unstable();

    Ok(Some(titles.join(", ")))
}

fn not_an_enum_set(entity: &str, field: &FieldModel, value: Value) -> Error {
    Error::TypeMismatch {
        entity: entity.to_string(),
        field: field.name().to_string(),
        expected: FieldType::optional(ScalarKind::EnumSet),
        value,
    }
}
