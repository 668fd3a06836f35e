//! Profile repository port.
//!
//! Reads and updates rows of the `profiles` table.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{ProfileRecord, ProfileUpdate};

/// Repository port for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile row for a user.
    ///
    /// Maybe-single semantics: zero rows is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - `DataIntegrity` if more than one row matches
    /// - `DatabaseError` on query failure
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ProfileRecord>, DomainError>;

    /// Apply an update and return the stored row.
    ///
    /// # Errors
    ///
    /// - `ProfileNotFound` if the row doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, id: &UserId, update: &ProfileUpdate)
        -> Result<ProfileRecord, DomainError>;
}
