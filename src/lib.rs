//! Pie: a small persistent table store queried with PieQL
//!
//! Tables are named lists of columns whose rows are string cells. The
//! store keeps table metadata and row data on disk; queries are single
//! `SELECT <fields> FROM <table>` statements.

pub mod config;
pub mod csv_importer;
pub mod database;
pub mod error;
pub mod http;
pub mod pieql;
pub mod table;

pub use config::ServerConfig;
pub use csv_importer::CsvImporter;
pub use database::Database;
pub use error::{Error, ErrorKind, Result};
pub use http::{build_router, AppState};
pub use pieql::{parse, Parser, QueryResult, SelectStatement};
pub use table::{Column, Row, Table};
