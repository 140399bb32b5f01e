use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gemp_stats_core::credentials::CredentialBundle;
use gemp_stats_core::document::Cell;
use gemp_stats_core::query::BoundQuery;
use sqlx::mysql::{MySqlColumn, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row, TypeInfo, ValueRef};

const SUPPORTED_ENGINES: [&str; 4] = ["mysql", "mariadb", "aurora", "aurora-mysql"];

/// An open database connection scoped to one invocation.
pub trait StatsDatabase {
    /// Runs `query` in a transaction, commits, and returns the rows in
    /// result order.
    fn fetch_rows(&mut self, query: &BoundQuery) -> Result<Vec<Vec<Cell>>, String>;
}

pub trait DatabaseConnector {
    fn connect(
        &self,
        credentials: &CredentialBundle,
        timeout: Duration,
    ) -> Result<Box<dyn StatsDatabase>, String>;
}

pub struct MySqlConnector;

pub struct MySqlStatsDatabase {
    connection: MySqlConnection,
}

impl DatabaseConnector for MySqlConnector {
    fn connect(
        &self,
        credentials: &CredentialBundle,
        timeout: Duration,
    ) -> Result<Box<dyn StatsDatabase>, String> {
        if !SUPPORTED_ENGINES.contains(&credentials.engine.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "unsupported database engine `{}`",
                credentials.engine
            ));
        }

        let options = MySqlConnectOptions::new()
            .host(&credentials.host)
            .port(credentials.port)
            .username(&credentials.username)
            .password(&credentials.password)
            .database(&credentials.dbname);

        let connection = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                tokio::time::timeout(timeout, MySqlConnection::connect_with(&options))
                    .await
                    .map_err(|_| {
                        format!(
                            "timed out after {}s connecting to mysql",
                            timeout.as_secs_f32()
                        )
                    })?
                    .map_err(|error| format!("failed to connect to mysql: {error}"))
            })
        })?;

        Ok(Box::new(MySqlStatsDatabase { connection }))
    }
}

impl StatsDatabase for MySqlStatsDatabase {
    fn fetch_rows(&mut self, query: &BoundQuery) -> Result<Vec<Vec<Cell>>, String> {
        let connection = &mut self.connection;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut transaction = connection
                    .begin()
                    .await
                    .map_err(|error| format!("failed to begin transaction: {error}"))?;

                let mut statement = sqlx::query(query.sql);
                for param in &query.params {
                    statement = statement.bind(param.as_str());
                }
                let rows = statement
                    .fetch_all(&mut *transaction)
                    .await
                    .map_err(|error| format!("failed to execute query: {error}"))?;

                transaction
                    .commit()
                    .await
                    .map_err(|error| format!("failed to commit transaction: {error}"))?;

                rows.iter()
                    .map(decode_row)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|error| format!("failed to decode row: {error}"))
            })
        })
    }
}

/// JSON shape a MySQL column type is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Signed,
    Unsigned,
    Float,
    Timestamp,
    Date,
    Time,
    Bytes,
    Text,
}

impl CellKind {
    /// Classifies a type name as reported by the driver, e.g. `BIGINT`,
    /// `INT UNSIGNED` or `DATETIME`. Anything unrecognised (DECIMAL, ENUM,
    /// JSON, character types) is exported as text.
    pub fn from_type_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        let (base, unsigned) = match upper.strip_suffix(" UNSIGNED") {
            Some(base) => (base, true),
            None => (upper.as_str(), false),
        };

        match base {
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                if unsigned {
                    Self::Unsigned
                } else {
                    Self::Signed
                }
            }
            "FLOAT" | "DOUBLE" => Self::Float,
            "DATETIME" | "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
            | "GEOMETRY" => Self::Bytes,
            _ => Self::Text,
        }
    }
}

fn decode_row(row: &MySqlRow) -> Result<Vec<Cell>, sqlx::Error> {
    row.columns()
        .iter()
        .map(|column| decode_cell(row, column))
        .collect()
}

// The column kind is chosen from the reported type name, so decoding skips
// sqlx's own compatibility check; binary widths are handled by the decoders.
fn decode_cell(row: &MySqlRow, column: &MySqlColumn) -> Result<Cell, sqlx::Error> {
    let index = column.ordinal();
    if row.try_get_raw(index)?.is_null() {
        return Ok(Cell::Null);
    }

    let cell = match CellKind::from_type_name(column.type_info().name()) {
        CellKind::Signed => Cell::Integer(row.try_get_unchecked::<i64, _>(index)?),
        CellKind::Unsigned => Cell::Unsigned(row.try_get_unchecked::<u64, _>(index)?),
        CellKind::Float => Cell::Float(row.try_get_unchecked::<f64, _>(index)?),
        CellKind::Timestamp => {
            Cell::Timestamp(row.try_get_unchecked::<NaiveDateTime, _>(index)?)
        }
        CellKind::Date => Cell::Date(row.try_get_unchecked::<NaiveDate, _>(index)?),
        CellKind::Time => Cell::Text(
            row.try_get_unchecked::<NaiveTime, _>(index)?
                .format("%H:%M:%S")
                .to_string(),
        ),
        CellKind::Bytes => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Cell::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        CellKind::Text => Cell::Text(row.try_get_unchecked::<String, _>(index)?),
    };

    Ok(cell)
}
