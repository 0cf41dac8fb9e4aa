//! Location trace repository
//!
//! A trace is one `location_lines` row plus its `location_points`; points
//! reference the line by `trip_id_location`, so lines are written first.

use std::collections::BTreeSet;

use serde::Deserialize;
use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use tracing::debug;

use core_kernel::TraceId;
use domain_travel::{LocationTrace, StoredTrace};

use crate::error::DatabaseError;
use crate::rows::{decode, decode_stored, encode, insert_rows, SqlValue};
use crate::schema::{LOCATION_LINES, LOCATION_POINTS};

#[derive(Debug, Deserialize)]
struct LineRow {
    trip_id_location: TraceId,
    shape: String,
}

#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts normalized traces; returns `(lines, points)` inserted
    pub async fn insert_all(
        &self,
        conn: &mut PgConnection,
        traces: &[LocationTrace],
    ) -> Result<(u64, u64), DatabaseError> {
        let lines = traces
            .iter()
            .map(|trace| encode(&LOCATION_LINES, trace))
            .collect::<Result<Vec<_>, _>>()?;

        let mut points = Vec::new();
        for trace in traces {
            for point in &trace.points {
                points.push(
                    encode(&LOCATION_POINTS, point)?
                        .with("trip_id_location", SqlValue::BigInt(Some(trace.trip_id_location.value()))),
                );
            }
        }

        let lines = insert_rows(conn, &LOCATION_LINES, &lines).await?;
        let points = insert_rows(conn, &LOCATION_POINTS, &points).await?;
        debug!(lines, points, "Inserted location traces");
        Ok((lines, points))
    }

    /// A trace with its points in collection-time order
    pub async fn get(&self, id: TraceId) -> Result<StoredTrace, DatabaseError> {
        let line = sqlx::query(&LOCATION_LINES.select_sql("WHERE \"trip_id_location\" = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("LocationTrace", id))?;
        let line: LineRow = decode(&LOCATION_LINES, &line)?;

        let rows = sqlx::query(&LOCATION_POINTS.select_sql(
            "WHERE \"trip_id_location\" = $1 ORDER BY \"collected_at\", \"point_id\"",
        ))
        .bind(id.value())
        .fetch_all(&self.pool)
        .await?;
        let points = rows
            .iter()
            .map(|row| decode_stored(&LOCATION_POINTS, "point_id", row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StoredTrace {
            trip_id_location: line.trip_id_location,
            shape: line.shape,
            points,
        })
    }

    pub async fn existing(&self, ids: &BTreeSet<TraceId>) -> Result<BTreeSet<TraceId>, DatabaseError> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let raw: Vec<i64> = ids.iter().map(TraceId::value).collect();
        let found = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT \"trip_id_location\" FROM {} WHERE \"trip_id_location\" = ANY($1)",
            LOCATION_LINES.qualified()
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().map(TraceId::new).collect())
    }
}
