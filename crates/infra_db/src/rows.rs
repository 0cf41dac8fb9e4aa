//! Record ⇄ row mapping
//!
//! A record is serialized with serde, each column's value is picked out of
//! the resulting JSON by its path and converted to a typed [`SqlValue`].
//! Reading reverses the walk: typed values are placed back at their paths
//! and the JSON is deserialized into the record.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder, Row};

use core_kernel::{Stored, SRID};

use crate::error::DatabaseError;
use crate::schema::{quote, Column, SqlType, TableDef};

/// PostgreSQL accepts at most this many bind parameters per statement
const MAX_BIND_PARAMETERS: usize = 65_535;

static NULL: Value = Value::Null;

/// A typed column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    SmallInt(Option<i16>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    Float(Option<f64>),
    Numeric(Option<Decimal>),
    Date(Option<NaiveDate>),
    Timestamp(Option<NaiveDateTime>),
    /// WKT
    Geometry(Option<String>),
}

impl SqlValue {
    /// The typed NULL for a column type
    pub fn null(sql_type: SqlType) -> Self {
        match sql_type {
            SqlType::Text(_) | SqlType::Category(_) => SqlValue::Text(None),
            SqlType::SmallInt => SqlValue::SmallInt(None),
            SqlType::Int => SqlValue::Int(None),
            SqlType::BigInt => SqlValue::BigInt(None),
            SqlType::Float => SqlValue::Float(None),
            SqlType::Money => SqlValue::Numeric(None),
            SqlType::Date => SqlValue::Date(None),
            SqlType::Timestamp => SqlValue::Timestamp(None),
            SqlType::Point | SqlType::Geometry => SqlValue::Geometry(None),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Text(v) | SqlValue::Geometry(v) => v.is_none(),
            SqlValue::SmallInt(v) => v.is_none(),
            SqlValue::Int(v) => v.is_none(),
            SqlValue::BigInt(v) => v.is_none(),
            SqlValue::Float(v) => v.is_none(),
            SqlValue::Numeric(v) => v.is_none(),
            SqlValue::Date(v) => v.is_none(),
            SqlValue::Timestamp(v) => v.is_none(),
        }
    }

    /// Converts a serialized field to the column's type
    fn from_json(sql_type: SqlType, value: &Value) -> Result<Self, String> {
        if value.is_null() {
            return Ok(SqlValue::null(sql_type));
        }
        let text = || {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("expected text, found {}", value))
        };
        let integer = || value.as_i64().ok_or_else(|| format!("expected an integer, found {}", value));

        Ok(match sql_type {
            SqlType::Text(_) | SqlType::Category(_) => SqlValue::Text(Some(text()?)),
            SqlType::SmallInt => SqlValue::SmallInt(Some(
                i16::try_from(integer()?).map_err(|e| e.to_string())?,
            )),
            SqlType::Int => SqlValue::Int(Some(i32::try_from(integer()?).map_err(|e| e.to_string())?)),
            SqlType::BigInt => SqlValue::BigInt(Some(integer()?)),
            SqlType::Float => SqlValue::Float(Some(
                value
                    .as_f64()
                    .ok_or_else(|| format!("expected a number, found {}", value))?,
            )),
            SqlType::Money => {
                let raw = match value {
                    Value::Number(n) => n.to_string(),
                    _ => text()?,
                };
                SqlValue::Numeric(Some(Decimal::from_str(&raw).map_err(|e| e.to_string())?))
            }
            SqlType::Date => SqlValue::Date(Some(
                NaiveDate::from_str(&text()?).map_err(|e| e.to_string())?,
            )),
            SqlType::Timestamp => SqlValue::Timestamp(Some(
                NaiveDateTime::from_str(&text()?).map_err(|e| e.to_string())?,
            )),
            SqlType::Point | SqlType::Geometry => SqlValue::Geometry(Some(text()?)),
        })
    }

    /// The value in the form the record's serde representation expects
    fn into_json(self) -> Value {
        match self {
            SqlValue::Text(v) | SqlValue::Geometry(v) => v.map_or(Value::Null, Value::String),
            SqlValue::SmallInt(v) => v.map_or(Value::Null, Value::from),
            SqlValue::Int(v) => v.map_or(Value::Null, Value::from),
            SqlValue::BigInt(v) => v.map_or(Value::Null, Value::from),
            SqlValue::Float(v) => v
                .and_then(serde_json::Number::from_f64)
                .map_or(Value::Null, Value::Number),
            SqlValue::Numeric(v) => v.map_or(Value::Null, |d| Value::String(d.to_string())),
            SqlValue::Date(v) => v.map_or(Value::Null, |d| Value::String(d.to_string())),
            SqlValue::Timestamp(v) => v.map_or(Value::Null, |t| {
                Value::String(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }),
        }
    }

    fn bind<'args>(self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        match self {
            SqlValue::Text(v) => {
                b.push_bind(v);
            }
            SqlValue::SmallInt(v) => {
                b.push_bind(v);
            }
            SqlValue::Int(v) => {
                b.push_bind(v);
            }
            SqlValue::BigInt(v) => {
                b.push_bind(v);
            }
            SqlValue::Float(v) => {
                b.push_bind(v);
            }
            SqlValue::Numeric(v) => {
                b.push_bind(v);
            }
            SqlValue::Date(v) => {
                b.push_bind(v);
            }
            SqlValue::Timestamp(v) => {
                b.push_bind(v);
            }
            SqlValue::Geometry(v) => {
                b.push("ST_GeomFromText(");
                b.push_bind_unseparated(v);
                b.push_unseparated(format!(", {})", SRID));
            }
        }
    }
}

/// Column values of one row, by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
    values: BTreeMap<String, SqlValue>,
}

impl RowValues {
    pub fn set(&mut self, column: &str, value: SqlValue) {
        self.values.insert(column.to_string(), value);
    }

    pub fn with(mut self, column: &str, value: SqlValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    fn value_or_null(&self, column: &Column) -> SqlValue {
        self.values
            .get(&column.name)
            .cloned()
            .unwrap_or_else(|| SqlValue::null(column.sql_type))
    }
}

fn lookup<'a>(value: &'a Value, path: &[String]) -> &'a Value {
    path.iter().fold(value, |node, segment| match node {
        Value::Object(map) => map.get(segment).unwrap_or(&NULL),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .unwrap_or(&NULL),
        _ => &NULL,
    })
}

/// Maps a record onto the table's path columns
///
/// Surrogate and parent-key columns are left for the caller to [`RowValues::set`].
pub fn encode<T: Serialize>(table: &TableDef, record: &T) -> Result<RowValues, DatabaseError> {
    let json = serde_json::to_value(record)
        .map_err(|e| DatabaseError::mapping(table.name, "*", e.to_string()))?;

    let mut row = RowValues::default();
    for column in &table.columns {
        let Some(path) = &column.path else { continue };
        let value = SqlValue::from_json(column.sql_type, lookup(&json, path))
            .map_err(|message| DatabaseError::mapping(table.name, &column.name, message))?;
        if value.is_null() && !column.nullable {
            return Err(DatabaseError::mapping(table.name, &column.name, "missing value for NOT NULL column"));
        }
        row.set(&column.name, value);
    }
    Ok(row)
}

fn insert_at(node: &mut Value, path: &[String], value: Value) {
    match path {
        [] => *node = value,
        [head, rest @ ..] => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                insert_at(map.entry(head.clone()).or_insert(Value::Null), rest, value);
            }
        }
    }
}

fn is_all_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.values().all(is_all_null),
        Value::Array(items) => items.iter().all(is_all_null),
        _ => false,
    }
}

/// Objects keyed `"0"`, `"1"`, ... are the columns of a fixed-size array
fn restore_arrays(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let indexed: Option<BTreeMap<usize, Value>> = if map.is_empty() {
                None
            } else {
                map.iter()
                    .map(|(key, item)| key.parse::<usize>().ok().map(|index| (index, item.clone())))
                    .collect()
            };
            match indexed {
                Some(items) => Value::Array(items.into_values().map(restore_arrays).collect()),
                None => Value::Object(
                    map.into_iter()
                        .map(|(key, item)| (key, restore_arrays(item)))
                        .collect(),
                ),
            }
        }
        other => other,
    }
}

/// Rebuilds a record from its column values
pub fn assemble<T: DeserializeOwned>(table: &TableDef, row: &RowValues) -> Result<T, DatabaseError> {
    let mut root = Value::Object(Map::new());
    for column in &table.columns {
        if let Some(path) = &column.path {
            insert_at(&mut root, path, row.value_or_null(column).into_json());
        }
    }

    for group in &table.optional_groups {
        let pointer = format!("/{}", group.join("/"));
        if let Some(node) = root.pointer_mut(&pointer) {
            if is_all_null(node) {
                *node = Value::Null;
            }
        }
    }

    serde_json::from_value(restore_arrays(root))
        .map_err(|e| DatabaseError::mapping(table.name, "*", e.to_string()))
}

/// Reads the table's columns from a row selected with [`TableDef::select_list`]
pub fn decode_row(table: &TableDef, row: &PgRow) -> Result<RowValues, DatabaseError> {
    let mut values = RowValues::default();
    for column in &table.columns {
        let name = column.name.as_str();
        let value = match column.sql_type {
            SqlType::Text(_) | SqlType::Category(_) => row.try_get(name).map(SqlValue::Text),
            SqlType::SmallInt => row.try_get(name).map(SqlValue::SmallInt),
            SqlType::Int => row.try_get(name).map(SqlValue::Int),
            SqlType::BigInt => row.try_get(name).map(SqlValue::BigInt),
            SqlType::Float => row.try_get(name).map(SqlValue::Float),
            SqlType::Money => row.try_get(name).map(SqlValue::Numeric),
            SqlType::Date => row.try_get(name).map(SqlValue::Date),
            SqlType::Timestamp => row.try_get(name).map(SqlValue::Timestamp),
            SqlType::Point | SqlType::Geometry => row.try_get(name).map(SqlValue::Geometry),
        }
        .map_err(|e| DatabaseError::mapping(table.name, name, e.to_string()))?;
        values.set(name, value);
    }
    Ok(values)
}

/// Decodes a row into a record
pub fn decode<T: DeserializeOwned>(table: &TableDef, row: &PgRow) -> Result<T, DatabaseError> {
    assemble(table, &decode_row(table, row)?)
}

/// Decodes a row keyed by a surrogate id
pub fn decode_stored<T: DeserializeOwned>(
    table: &TableDef,
    id_column: &str,
    row: &PgRow,
) -> Result<Stored<T>, DatabaseError> {
    let id: i64 = row
        .try_get(id_column)
        .map_err(|e| DatabaseError::mapping(table.name, id_column, e.to_string()))?;
    Ok(Stored::new(id, decode(table, row)?))
}

async fn insert_chunked(
    conn: &mut PgConnection,
    table: &TableDef,
    rows: &[RowValues],
    with_identity: bool,
    skip_conflicts: bool,
) -> Result<u64, DatabaseError> {
    let columns: Vec<&Column> = table.insert_columns(with_identity).collect();
    if rows.is_empty() || columns.is_empty() {
        return Ok(0);
    }
    let names = columns
        .iter()
        .map(|c| quote(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let chunk_size = (MAX_BIND_PARAMETERS / columns.len()).max(1);

    let mut inserted = 0;
    for chunk in rows.chunks(chunk_size) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} ({}) ", table.qualified(), names));
        builder.push_values(chunk, |mut b, row| {
            for column in &columns {
                row.value_or_null(column).bind(&mut b);
            }
        });
        if skip_conflicts {
            builder.push(" ON CONFLICT DO NOTHING");
        }
        inserted += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(inserted)
}

/// Bulk-inserts rows, letting the database allocate identity columns
pub async fn insert_rows(
    conn: &mut PgConnection,
    table: &TableDef,
    rows: &[RowValues],
) -> Result<u64, DatabaseError> {
    insert_chunked(conn, table, rows, false, false).await
}

/// Inserts a reference row with its fixed id; returns false if it was already there
pub async fn seed_row(conn: &mut PgConnection, table: &TableDef, row: RowValues) -> Result<bool, DatabaseError> {
    let inserted = insert_chunked(conn, table, std::slice::from_ref(&row), true, true).await?;
    Ok(inserted > 0)
}
