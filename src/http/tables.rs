//! Table management handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use super::{ApiError, AppState};
use crate::csv_importer::CsvImporter;
use crate::error::Error;
use crate::table::{Row, Table};

#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<String>,
}

impl From<&Table> for TableInfo {
    fn from(table: &Table) -> Self {
        TableInfo {
            name: table.name.clone(),
            columns: table.column_names(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

pub async fn list_tables(State(state): State<AppState>) -> Json<Vec<TableInfo>> {
    let db = state.db.read();
    Json(db.tables().into_iter().map(TableInfo::from).collect())
}

pub async fn get_table(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TableData>, ApiError> {
    let db = state.db.read();
    let table = db
        .table(&name)
        .ok_or_else(|| Error::TableNotFound(name.clone()))?;
    let rows = db.table_rows(&name)?;

    Ok(Json(TableData {
        columns: table.column_names(),
        name,
        rows,
    }))
}

/// Create a table from an uploaded CSV file. The table takes the file's
/// name without its extension.
pub async fn create_table(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let name = table_name(field.file_name().unwrap_or_default());
        let data = field.bytes().await?;
        import_csv(&state, &name, &data)?;
        return Ok(StatusCode::CREATED);
    }

    Err(ApiError::BadRequest("file required".to_string()))
}

pub async fn delete_table(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.write().delete_table(&name)?;
    Ok(StatusCode::NO_CONTENT)
}

fn import_csv(state: &AppState, name: &str, data: &[u8]) -> Result<(), Error> {
    let mut db = state.db.write();
    CsvImporter::new().import(&mut db, name, data)
}

fn table_name(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
