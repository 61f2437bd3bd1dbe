//! Persistent table store
//!
//! Table metadata is kept in memory and mirrored to `<root>/meta` on every
//! create or delete. Row data is never cached: each table's rows live in
//! `<root>/data/<name>` and are read and replaced wholesale. Files are
//! staged in `<root>/tmp`, out of reach of table names, then renamed.

use crate::error::{Error, Result};
use crate::pieql::{QueryExecutor, QueryResult, SelectStatement};
use crate::table::{Column, MetaSnapshot, Row, Table, TableMeta};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const META_FILE: &str = "meta";
const DATA_DIR: &str = "data";
const TMP_DIR: &str = "tmp";

/// A collection of tables, optionally backed by a directory on disk.
#[derive(Debug, Default)]
pub struct Database {
    path: Option<PathBuf>,
    tables: BTreeMap<String, Table>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) the store rooted at `path` and load its metadata.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(path.join(DATA_DIR))?;
        fs::create_dir_all(path.join(TMP_DIR))?;

        let meta_path = path.join(META_FILE);
        let tables = match fs::read(&meta_path) {
            Ok(data) => Self::decode_meta(&data)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?path, "no metadata found, starting fresh");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = ?path, tables = tables.len(), "opened database");
        self.tables = tables;
        self.path = Some(path);
        Ok(())
    }

    /// Forget the store path and all table metadata.
    pub fn close(&mut self) -> Result<()> {
        if let Some(path) = self.path.take() {
            info!(path = ?path, "closed database");
        }
        self.tables.clear();
        Ok(())
    }

    /// Root directory of the open store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.path.is_some()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// All known tables, ordered by name.
    pub fn tables(&self) -> Vec<&Table> {
        self.tables.values().collect()
    }

    /// Register a new table with no rows and persist the metadata and an
    /// empty row file.
    ///
    /// If persisting fails the table stays registered in memory; reopen the
    /// store to get back in sync with disk.
    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<()> {
        validate_name(name)?;
        if self.tables.contains_key(name) {
            return Err(Error::TableExists(name.to_string()));
        }

        self.tables
            .insert(name.to_string(), Table::new(name, columns));
        debug!(table = name, "created table");

        self.save_meta()?;
        if self.is_open() {
            self.set_table_rows(name, &[])?;
        }
        Ok(())
    }

    /// Remove a table, its persisted metadata and its row file.
    pub fn delete_table(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::TableNameRequired);
        }
        if self.tables.remove(name).is_none() {
            return Err(Error::TableNotFound(name.to_string()));
        }
        debug!(table = name, "deleted table");

        self.save_meta()?;

        if let Some(path) = &self.path {
            match fs::remove_file(path.join(DATA_DIR).join(name)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Read a table's rows from disk.
    pub fn table_rows(&self, name: &str) -> Result<Vec<Row>> {
        let path = self.row_path(name)?;
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Replace a table's rows on disk. Cell counts are not checked against
    /// the table's columns.
    pub fn set_table_rows(&self, name: &str, rows: &[Row]) -> Result<()> {
        let path = self.row_path(name)?;
        self.write_atomic(&path, &serde_json::to_vec(rows)?)?;
        debug!(table = name, rows = rows.len(), "wrote table rows");
        Ok(())
    }

    /// Run a parsed statement against this store.
    pub fn execute(&self, stmt: &SelectStatement) -> Result<QueryResult> {
        QueryExecutor::new(self).execute(stmt)
    }

    /// Encode the metadata of every table, in name order.
    pub fn encode_meta(&self) -> Result<Vec<u8>> {
        let snapshot = MetaSnapshot {
            tables: self.tables.values().map(TableMeta::from).collect(),
        };
        Ok(serde_json::to_vec_pretty(&snapshot)?)
    }

    /// Decode a metadata file into a table map keyed by name.
    pub fn decode_meta(data: &[u8]) -> Result<BTreeMap<String, Table>> {
        let snapshot: MetaSnapshot = serde_json::from_slice(data)?;
        Ok(snapshot
            .tables
            .into_iter()
            .map(|meta| (meta.name.clone(), Table::from(meta)))
            .collect())
    }

    fn save_meta(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.write_atomic(&path.join(META_FILE), &self.encode_meta()?)
    }

    /// Write to a temporary file under `<root>/tmp`, sync, then rename over
    /// the target.
    fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<()> {
        let root = self.path.as_ref().ok_or(Error::DatabaseNotOpen)?;

        let mut temp = NamedTempFile::new_in(root.join(TMP_DIR))?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(target).map_err(|e| e.error)?;
        Ok(())
    }

    fn row_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.path.as_ref().ok_or(Error::DatabaseNotOpen)?;
        validate_name(name)?;
        Ok(path.join(DATA_DIR).join(name))
    }
}

// Table names double as file names under the data directory
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::TableNameRequired);
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidTableName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn columns(names: &[&str]) -> Vec<Column> {
        names.iter().map(|name| Column::new(*name)).collect()
    }

    fn open_temp() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let mut db = Database::new();
        db.open(temp_dir.path()).unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_create_table() {
        let (_dir, mut db) = open_temp();
        db.create_table("foo", columns(&["first_name", "last_name"]))
            .unwrap();

        let table = db.table("foo").unwrap();
        assert_eq!(table.name, "foo");
        assert_eq!(table.column_names(), vec!["first_name", "last_name"]);
    }

    #[test]
    fn test_create_table_name_required() {
        let mut db = Database::new();
        assert!(matches!(
            db.create_table("", vec![]),
            Err(Error::TableNameRequired)
        ));
    }

    #[test]
    fn test_create_table_exists() {
        let mut db = Database::new();
        db.create_table("foo", columns(&["a"])).unwrap();
        assert!(matches!(
            db.create_table("foo", columns(&["b", "c"])),
            Err(Error::TableExists(name)) if name == "foo"
        ));
        assert_eq!(db.table("foo").unwrap().column_names(), vec!["a"]);
    }

    #[test]
    fn test_create_table_invalid_name() {
        let mut db = Database::new();
        for name in ["..", ".", "a/b", "a\\b"] {
            assert!(matches!(
                db.create_table(name, vec![]),
                Err(Error::InvalidTableName(_))
            ));
        }
        assert!(db.tables().is_empty());
    }

    #[test]
    fn test_delete_table() {
        let mut db = Database::new();
        db.create_table("foo", vec![]).unwrap();
        db.delete_table("foo").unwrap();
        assert!(db.table("foo").is_none());

        // The name is free again
        db.create_table("foo", vec![]).unwrap();
        assert!(db.table("foo").is_some());
    }

    #[test]
    fn test_delete_table_errors() {
        let mut db = Database::new();
        assert!(matches!(db.delete_table(""), Err(Error::TableNameRequired)));
        assert!(matches!(
            db.delete_table("no_such_table"),
            Err(Error::TableNotFound(name)) if name == "no_such_table"
        ));
    }

    #[test]
    fn test_delete_table_removes_rows() {
        let (_dir, mut db) = open_temp();
        db.create_table("foo", columns(&["a"])).unwrap();
        db.set_table_rows("foo", &[vec!["1".to_string()]]).unwrap();
        db.delete_table("foo").unwrap();

        db.create_table("foo", columns(&["a"])).unwrap();
        assert_eq!(db.table_rows("foo").unwrap(), Vec::<Row>::new());
    }

    #[test]
    fn test_new_table_has_no_rows() {
        let (dir, mut db) = open_temp();
        db.create_table("t", columns(&["a"])).unwrap();

        assert!(dir.path().join(DATA_DIR).join("t").is_file());
        assert!(db.table_rows("t").unwrap().is_empty());
    }

    #[test]
    fn test_rows_survive_neighbouring_table_writes() {
        let (dir, mut db) = open_temp();
        db.create_table("x.tmp", columns(&["a"])).unwrap();
        db.create_table("x", columns(&["a"])).unwrap();

        db.set_table_rows("x.tmp", &[vec!["keep".to_string()]]).unwrap();
        db.set_table_rows("x", &[vec!["other".to_string()]]).unwrap();

        assert_eq!(db.table_rows("x.tmp").unwrap(), vec![vec!["keep".to_string()]]);
        assert_eq!(db.table_rows("x").unwrap(), vec![vec!["other".to_string()]]);

        // Nothing is left behind in the staging directory
        assert_eq!(fs::read_dir(dir.path().join(TMP_DIR)).unwrap().count(), 0);
    }

    #[test]
    fn test_rows_require_open() {
        let mut db = Database::new();
        db.create_table("foo", vec![]).unwrap();
        assert!(matches!(
            db.set_table_rows("foo", &[]),
            Err(Error::DatabaseNotOpen)
        ));
        assert!(matches!(db.table_rows("foo"), Err(Error::DatabaseNotOpen)));
    }

    #[test]
    fn test_set_table_rows_replaces() {
        let (_dir, db) = open_temp();
        let first = vec![
            vec!["susy".to_string(), "que".to_string()],
            vec!["bob".to_string(), "smith".to_string()],
        ];
        let second = vec![vec!["amy".to_string(), "pond".to_string()]];

        db.set_table_rows("foo", &first).unwrap();
        assert_eq!(db.table_rows("foo").unwrap(), first);

        db.set_table_rows("foo", &second).unwrap();
        assert_eq!(db.table_rows("foo").unwrap(), second);
    }

    #[test]
    fn test_table_rows_missing_file() {
        let (_dir, db) = open_temp();
        assert!(matches!(db.table_rows("ghost"), Err(Error::Io(_))));
    }

    #[test]
    fn test_table_rows_malformed_file() {
        let (dir, db) = open_temp();
        fs::write(dir.path().join(DATA_DIR).join("bad"), b"[[\"a\"").unwrap();
        assert!(matches!(db.table_rows("bad"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_close_clears_tables() {
        let (dir, mut db) = open_temp();
        db.create_table("foo", vec![]).unwrap();
        db.close().unwrap();

        assert!(db.table("foo").is_none());
        assert!(db.path().is_none());

        db.open(dir.path()).unwrap();
        assert!(db.table("foo").is_some());
    }

    #[test]
    fn test_meta_round_trip() {
        let mut db = Database::new();
        db.create_table("foo", columns(&["fname", "lname"])).unwrap();
        db.create_table("bar", columns(&["age"])).unwrap();

        let data = db.encode_meta().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tables": [
                    {"name": "bar", "columns": [{"name": "age"}]},
                    {"name": "foo", "columns": [{"name": "fname"}, {"name": "lname"}]},
                ]
            })
        );

        let tables = Database::decode_meta(&data).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables["foo"].column_names(), vec!["fname", "lname"]);
    }

    #[test]
    fn test_open_corrupt_meta() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(META_FILE), b"{\"tables\":").unwrap();

        let mut db = Database::new();
        assert!(matches!(
            db.open(temp_dir.path()),
            Err(Error::Serialization(_))
        ));
        assert!(!db.is_open());
    }
}
