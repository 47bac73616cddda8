use crate::{
    store::{Row, SelectSpec, Store, StoreError},
    types::Id,
    value::Value,
};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;

///
/// MemTable
///

#[derive(Debug, Default)]
struct MemTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl MemTable {
    fn column_index(&self, table: &str, column: &str) -> Result<usize, StoreError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| StoreError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
    }
}

///
/// MemoryStore
///
/// In-process tables with insertion-ordered rows. Every `execute` call is
/// recorded so batching can be asserted by call counts.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, MemTable>>,
    calls: Mutex<Vec<SelectSpec>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a table with the given column layout.
    pub fn create_table(&self, name: &str, columns: &[&str]) {
        let table = MemTable {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        };
        self.tables.write().insert(name.to_string(), table);
    }

    pub fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        if row.len() != t.columns.len() {
            return Err(StoreError::Arity {
                table: table.to_string(),
                expected: t.columns.len(),
                found: row.len(),
            });
        }
        t.rows.push(row);

        Ok(())
    }

    /// Delete every row whose `column` equals `id`; returns the number removed.
    pub fn delete_where(&self, table: &str, column: &str, id: Id) -> Result<usize, StoreError> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let idx = t.column_index(table, column)?;

        let before = t.rows.len();
        t.rows.retain(|row| row[idx].as_id() != Some(id));

        Ok(before - t.rows.len())
    }

    /// Every select executed so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<SelectSpec> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    #[must_use]
    pub fn calls_for(&self, table: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.table == table).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }
}

impl Store for MemoryStore {
    fn execute(&self, select: &SelectSpec) -> Result<Vec<Row>, StoreError> {
        self.calls.lock().push(select.clone());

        let tables = self.tables.read();
        let table = tables
            .get(&select.table)
            .ok_or_else(|| StoreError::UnknownTable(select.table.clone()))?;

        let projection = select
            .columns
            .iter()
            .map(|c| table.column_index(&select.table, c))
            .collect::<Result<Vec<_>, _>>()?;
        let filter = match &select.filter {
            Some(f) => Some((table.column_index(&select.table, &f.column)?, &f.keys)),
            None => None,
        };

        let rows = table
            .rows
            .iter()
            .filter(|row| match filter {
                Some((idx, keys)) => row[idx].as_id().is_some_and(|id| keys.contains(&id)),
                None => true,
            })
            .map(|row| projection.iter().map(|&i| row[i].clone()).collect::<Vec<Value>>())
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn planets() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_table("planet", &["id", "name"]);
        for (id, name) in [(1, "Tatooine"), (2, "Alderaan"), (3, "Hoth")] {
            store
                .insert("planet", vec![Value::Int(id), Value::from(name)])
                .unwrap();
        }

        store
    }

    #[test]
    fn filter_and_projection() {
        let store = planets();
        let select = SelectSpec::new("planet", &["name", "id"])
            .with_filter("id", BTreeSet::from([Id(3), Id(1), Id(9)]));

        let rows = store.execute(&select).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Value::from("Tatooine"), Value::Int(1)],
                vec![Value::from("Hoth"), Value::Int(3)],
            ]
        );
        assert_eq!(store.call_count(), 1);
    }

    #[test]
    fn unknown_column_fails_whole_call() {
        let store = planets();
        let err = store
            .execute(&SelectSpec::new("planet", &["id", "mass"]))
            .unwrap_err();

        assert!(matches!(err, StoreError::UnknownColumn { .. }));
    }

    #[test]
    fn insert_checks_arity() {
        let store = planets();
        let err = store.insert("planet", vec![Value::Int(4)]).unwrap_err();

        assert!(matches!(err, StoreError::Arity { expected: 2, found: 1, .. }));
    }

    #[test]
    fn delete_where_removes_matching_rows() {
        let store = planets();

        assert_eq!(store.delete_where("planet", "id", Id(2)).unwrap(), 1);
        let rows = store.execute(&SelectSpec::new("planet", &["id"])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.calls_for("planet"), 1);
    }
}
