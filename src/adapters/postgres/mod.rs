//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresProfileRepository` - The `profiles` table
//! - `PostgresExamRepository` - The `exams` table

mod exam_repository;
mod profile_repository;

pub use exam_repository::PostgresExamRepository;
pub use profile_repository::PostgresProfileRepository;

use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Row, Type};

use crate::domain::foundation::DomainError;

/// Reads one column, mapping decode failures to a database error.
fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}
