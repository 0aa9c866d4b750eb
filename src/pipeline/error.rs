//! Plan-generation error taxonomy.
//!
//! Input errors reject the whole request with no partial writes. Degraded
//! extraction and enhancement failures are handled inside the pipeline
//! (warn + continue) and never surface here.

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Course not found: {0}")]
    CourseNotFound(String),
}
