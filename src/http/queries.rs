//! Query execution handler

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::{ApiError, AppState};
use crate::error::Error;
use crate::pieql::{self, QueryResult};

/// Run the PieQL statement in the request body and answer with CSV: a
/// header of the resolved columns followed by the result rows.
pub async fn execute_query(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, ApiError> {
    let stmt = pieql::parse(&body)?;
    let result = state.db.read().execute(&stmt)?;
    let csv = render_csv(&result)?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

fn render_csv(result: &QueryResult) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(row)?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}
