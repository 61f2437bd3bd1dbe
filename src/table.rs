//! Table metadata and its on-disk snapshot form.

use serde::{Deserialize, Serialize};

/// One stored row: a cell per column, in column order.
pub type Row = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column { name: name.into() }
    }
}

/// A named table and its ordered columns. Row data lives on disk and is
/// read through [`crate::Database::table_rows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Table {
            name: name.into(),
            columns,
        }
    }

    /// Position of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Serializable form of the metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaSnapshot {
    pub tables: Vec<TableMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    pub columns: Vec<Column>,
}

impl From<&Table> for TableMeta {
    fn from(table: &Table) -> Self {
        TableMeta {
            name: table.name.clone(),
            columns: table.columns.clone(),
        }
    }
}

impl From<TableMeta> for Table {
    fn from(meta: TableMeta) -> Self {
        Table::new(meta.name, meta.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let table = Table::new("foo", vec![Column::new("fname"), Column::new("lname")]);
        assert_eq!(table.column_index("lname"), Some(1));
        assert_eq!(table.column_index("LNAME"), None);
        assert_eq!(table.column_names(), vec!["fname", "lname"]);
    }

    #[test]
    fn test_snapshot_shape() {
        let snapshot = MetaSnapshot {
            tables: vec![TableMeta {
                name: "bar".into(),
                columns: vec![Column::new("age")],
            }],
        };
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"{"tables":[{"name":"bar","columns":[{"name":"age"}]}]}"#
        );
    }
}
