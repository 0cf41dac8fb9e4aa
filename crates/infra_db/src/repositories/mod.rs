//! Repository implementations for the survey tables
//!
//! One repository per table family. Writes take the caller's connection so
//! that a whole batch shares one transaction; reads go through the pool.

pub mod household;
pub mod person;
pub mod day;
pub mod trip;
pub mod location;
pub mod vehicle;
pub mod intercept;
pub mod border_trip;

pub use household::HouseholdRepository;
pub use person::PersonRepository;
pub use day::DayRepository;
pub use trip::TripRepository;
pub use location::LocationRepository;
pub use vehicle::VehicleRepository;
pub use intercept::InterceptRepository;
pub use border_trip::BorderTripRepository;

use serde::Serialize;
use sqlx::postgres::PgConnection;

use crate::error::DatabaseError;
use crate::rows::{encode, insert_rows};
use crate::schema::TableDef;

/// Encodes and bulk-inserts records that map one-to-one onto table rows
pub(crate) async fn insert_records<T: Serialize>(
    conn: &mut PgConnection,
    table: &TableDef,
    records: &[T],
) -> Result<u64, DatabaseError> {
    let rows = records
        .iter()
        .map(|record| encode(table, record))
        .collect::<Result<Vec<_>, _>>()?;
    insert_rows(conn, table, &rows).await
}
