//! PostgreSQL store backed by a `sqlx` pool.
//!
//! Each lease is one pooled connection. Transaction control is issued as
//! plain `BEGIN` / `COMMIT` / `ROLLBACK` on that connection, and result rows
//! are decoded column by column into JSON objects.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{
    Column, Decode, Executor as _, PgPool, Postgres, Row as _, Type, TypeInfo,
    pool::PoolConnection, postgres::PgRow,
};
use uuid::Uuid;

use super::statement::{IsolationLevel, SqlParam, Statement};
use super::store::{Lease, Row, Store, StoreError};

impl StoreError {
    /// Keep the server's own message and SQLSTATE for database errors.
    pub fn from_sqlx(err: &sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) => Self {
                message: db.message().to_owned(),
                code: db.code().map(|code| code.into_owned()),
                constraint: db.constraint().map(str::to_owned),
            },
            None => Self::new(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx(&err)
    }
}

#[async_trait]
impl Store for PgPool {
    type Lease = PgLease;

    async fn acquire(&self) -> Result<PgLease, StoreError> {
        let conn = sqlx::Pool::acquire(self).await?;
        Ok(PgLease {
            conn,
            in_transaction: false,
        })
    }
}

/// A connection checked out of the pool for one unit of work.
pub struct PgLease {
    conn: PoolConnection<Postgres>,
    in_transaction: bool,
}

impl PgLease {
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

#[async_trait]
impl Lease for PgLease {
    async fn begin(&mut self, isolation: IsolationLevel) -> Result<(), StoreError> {
        // Set first: if this future is dropped mid-BEGIN the connection is closed.
        self.in_transaction = true;
        (&mut *self.conn).execute(isolation.begin_sql()).await?;
        Ok(())
    }

    async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        let mut query = sqlx::query(statement.sql());
        for param in statement.params() {
            query = match param {
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::BigInt(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.as_str()),
                SqlParam::Bool(value) => query.bind(*value),
                SqlParam::Double(value) => query.bind(*value),
                SqlParam::Date(value) => query.bind(*value),
            };
        }

        let rows = query.fetch_all(&mut *self.conn).await?;
        let rows = rows.iter().map(row_to_json).collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        (&mut *self.conn).execute("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        (&mut *self.conn).execute("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }
}

impl Drop for PgLease {
    fn drop(&mut self) {
        // The connection's state is unknown (cancelled mid-statement, or
        // COMMIT/ROLLBACK failed), so it must not go back to the pool.
        if self.in_transaction {
            tracing::warn!("lease dropped inside a transaction, closing its connection");
            self.conn.close_on_drop();
        }
    }
}

/// How a PostgreSQL column is turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    Date,
    Time,
    Timestamp,
    Timestamptz,
    Uuid,
    Json,
    Int4Array,
    Int8Array,
    TextArray,
    BoolArray,
}

impl ColumnKind {
    /// `None` for types with no lossless JSON decoding (e.g. `NUMERIC`).
    fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "BOOL" => ColumnKind::Bool,
            "INT2" => ColumnKind::Int2,
            "INT4" => ColumnKind::Int4,
            "INT8" => ColumnKind::Int8,
            "FLOAT4" => ColumnKind::Float4,
            "FLOAT8" => ColumnKind::Float8,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => ColumnKind::Text,
            "DATE" => ColumnKind::Date,
            "TIME" => ColumnKind::Time,
            "TIMESTAMP" => ColumnKind::Timestamp,
            "TIMESTAMPTZ" => ColumnKind::Timestamptz,
            "UUID" => ColumnKind::Uuid,
            "JSON" | "JSONB" => ColumnKind::Json,
            "INT4[]" => ColumnKind::Int4Array,
            "INT8[]" => ColumnKind::Int8Array,
            "TEXT[]" | "VARCHAR[]" => ColumnKind::TextArray,
            "BOOL[]" => ColumnKind::BoolArray,
            _ => return None,
        };
        Some(kind)
    }
}

/// Decode every column of `row` into a JSON value keyed by column name.
///
/// A column of an unsupported type is a decode error, never a guessed value.
pub fn row_to_json(row: &PgRow) -> Result<Row, sqlx::Error> {
    let mut object = Row::new();

    for column in row.columns() {
        let index = column.ordinal();
        let type_name = column.type_info().name();
        let kind = ColumnKind::from_type_name(type_name).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: format!("{:?}", column.name()),
            source: format!("unsupported column type {type_name}").into(),
        })?;

        let value = match kind {
            ColumnKind::Bool => cell::<bool>(row, index)?,
            ColumnKind::Int2 => cell::<i16>(row, index)?,
            ColumnKind::Int4 => cell::<i32>(row, index)?,
            ColumnKind::Int8 => cell::<i64>(row, index)?,
            ColumnKind::Float4 => cell::<f32>(row, index)?,
            ColumnKind::Float8 => cell::<f64>(row, index)?,
            ColumnKind::Text => cell::<String>(row, index)?,
            ColumnKind::Date => cell::<NaiveDate>(row, index)?,
            ColumnKind::Time => cell::<NaiveTime>(row, index)?,
            ColumnKind::Timestamp => cell::<NaiveDateTime>(row, index)?,
            ColumnKind::Timestamptz => cell::<DateTime<Utc>>(row, index)?,
            ColumnKind::Uuid => cell::<Uuid>(row, index)?,
            ColumnKind::Json => cell::<Value>(row, index)?,
            ColumnKind::Int4Array => cell::<Vec<i32>>(row, index)?,
            ColumnKind::Int8Array => cell::<Vec<i64>>(row, index)?,
            ColumnKind::TextArray => cell::<Vec<String>>(row, index)?,
            ColumnKind::BoolArray => cell::<Vec<bool>>(row, index)?,
        };
        object.insert(column.name().to_owned(), value);
    }

    Ok(object)
}

fn cell<'r, T>(row: &'r PgRow, index: usize) -> Result<Value, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres> + Serialize,
{
    let value: Option<T> = row.try_get(index)?;
    serde_json::to_value(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}
