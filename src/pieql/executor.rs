// Query Executor - project stored rows through a parsed SELECT
use super::ast::{Field, SelectStatement};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::table::Row;
use serde::Serialize;

/// Rows produced by a query, with the resolved column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

pub struct QueryExecutor<'a> {
    db: &'a Database,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(db: &'a Database) -> Self {
        QueryExecutor { db }
    }

    pub fn execute(&self, stmt: &SelectStatement) -> Result<QueryResult> {
        let table = self
            .db
            .table(&stmt.source)
            .ok_or_else(|| Error::TableNotFound(stmt.source.clone()))?;

        // A leading wildcard stands for every column, in table order
        let fields: Vec<Field> = match stmt.fields.first() {
            Some(field) if field.is_wildcard() => {
                table.columns.iter().map(|c| Field::new(&c.name)).collect()
            }
            _ => stmt.fields.clone(),
        };

        let positions = fields
            .iter()
            .map(|field| {
                table
                    .column_index(&field.name)
                    .ok_or_else(|| Error::ColumnNotFound(field.name.clone()))
            })
            .collect::<Result<Vec<usize>>>()?;

        let input = self.db.table_rows(&table.name)?;

        let mut rows = Vec::with_capacity(input.len());
        for (row_index, row) in input.iter().enumerate() {
            let mut output = Vec::with_capacity(positions.len());
            for (field, &position) in fields.iter().zip(&positions) {
                let cell = row.get(position).ok_or_else(|| Error::MalformedRow {
                    table: table.name.clone(),
                    row: row_index,
                    cells: row.len(),
                    column: field.name.clone(),
                    position,
                })?;
                output.push(cell.clone());
            }
            rows.push(output);
        }

        Ok(QueryResult {
            columns: fields.into_iter().map(|f| f.name).collect(),
            rows,
        })
    }
}
