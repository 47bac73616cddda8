use crate::{
    error::Error,
    model::{EntityModel, FieldKind},
    store::{ColumnCodec, SelectSpec, Store, StoreError},
    types::Id,
    value::{Record, Value},
};
use std::collections::{BTreeMap, BTreeSet};

/// Fetch raw fields for a batch of ids in one store call.
///
/// Ids missing from the store are omitted from the result. Every returned
/// record carries every requested name. An empty id set returns without
/// touching the store.
pub fn fetch_fields(
    store: &dyn Store,
    entity: &EntityModel,
    ids: &BTreeSet<Id>,
    field_names: &[&str],
) -> Result<BTreeMap<Id, Record>, Error> {
    // resolve names to (name, column, codec) before any I/O
    let mut columns = Vec::with_capacity(field_names.len());
    for &name in field_names {
        match entity.get_field(name).map(|f| f.kind()) {
            Some(FieldKind::Raw { column, codec }) => {
                columns.push((name, column.as_str(), *codec));
            }
            _ => return Err(Error::unknown_field(entity.name(), name)),
        }
    }
    let Some(binding) = entity.table_binding() else {
        return Err(Error::invalid_selection(
            entity.name(),
            entity.name(),
            "entity embeds another entity and has no table of its own",
        ));
    };

    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut select_columns = vec![binding.key_column.as_str()];
    select_columns.extend(columns.iter().map(|(_, column, _)| *column));
    let select = SelectSpec::new(&binding.table, &select_columns)
        .with_filter(&binding.key_column, ids.clone());

    let rows = store.execute(&select)?;

    let mut records = BTreeMap::new();
    for row in rows {
        if row.len() != select_columns.len() {
            return Err(corrupt(&binding.table, &binding.key_column, "row arity mismatch").into());
        }

        let mut values = row.into_iter();
        let id = values
            .next()
            .and_then(|v| v.as_id())
            .ok_or_else(|| corrupt(&binding.table, &binding.key_column, "key is not an integer"))?;

        let mut record = Record::new();
        for (&(name, column, codec), value) in columns.iter().zip(values) {
            record.insert(name, decode(codec, value, &binding.table, column)?);
        }

        records.insert(id, record);
    }

    Ok(records)
}

// Apply the column codec; failures mean the stored representation is corrupt.
fn decode(codec: ColumnCodec, value: Value, table: &str, column: &str) -> Result<Value, StoreError> {
    codec
        .decode(value)
        .map_err(|message| corrupt(table, column, &message))
}

fn corrupt(table: &str, column: &str, message: &str) -> StoreError {
    StoreError::Corrupt {
        table: table.to_string(),
        column: column.to_string(),
        message: message.to_string(),
    }
}
