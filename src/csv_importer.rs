//! CSV bulk import

use crate::database::Database;
use crate::error::{Error, Result};
use crate::table::{Column, Row};
use std::io::Read;
use tracing::info;

/// Creates a table from CSV data: the header record names the columns and
/// every following record becomes a row.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvImporter;

impl CsvImporter {
    pub fn new() -> Self {
        CsvImporter
    }

    pub fn import<R: Read>(&self, db: &mut Database, name: &str, reader: R) -> Result<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Err(Error::MissingHeader),
        };
        let columns: Vec<Column> = header.iter().map(Column::new).collect();

        let rows = records
            .map(|record| -> Result<Row> { Ok(record?.iter().map(String::from).collect()) })
            .collect::<Result<Vec<Row>>>()?;

        db.create_table(name, columns)?;
        db.set_table_rows(name, &rows)?;

        info!(table = name, rows = rows.len(), "imported CSV");
        Ok(())
    }
}
