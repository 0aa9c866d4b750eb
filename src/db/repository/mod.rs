//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per entity; all public functions are re-exported here.
//! The planner only depends on four of these operations: find materials by
//! course, delete sessions by course, create session, and the transactional
//! replace that combines the last two.

mod course;
mod material;
mod session;

pub use course::*;
pub use material::*;
pub use session::*;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::DatabaseError;

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DatabaseError> {
    value.parse().map_err(|_| DatabaseError::InvalidUuid {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    value.parse().map_err(|_| DatabaseError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f").map_err(|_| {
        DatabaseError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    })
}
