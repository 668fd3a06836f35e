//! PostgreSQL implementation of ProfileRepository.
//!
//! Reads and updates the `profiles` table the auth backend populates on
//! sign-up.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::{ProfileRecord, ProfileUpdate};
use crate::ports::ProfileRepository;

use super::column;

/// PostgreSQL implementation of ProfileRepository.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ProfileRecord>, DomainError> {
        // Two rows are enough to tell "one" from "more than one".
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, username, role, avatar_url, is_verified
            FROM profiles
            WHERE id = $1::uuid
            LIMIT 2
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch profile: {}", e)))?;

        let mut rows = rows.into_iter();
        let Some(row) = rows.next() else {
            return Ok(None);
        };
        if rows.next().is_some() {
            return Err(DomainError::new(
                ErrorCode::DataIntegrity,
                format!("More than one profile for user {}", id),
            ));
        }
        row_to_profile(&row).map(Some)
    }

    async fn update(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<ProfileRecord, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE profiles SET
                username = COALESCE($2, username),
                avatar_url = COALESCE($3, avatar_url)
            WHERE id = $1::uuid
            RETURNING id::text AS id, username, role, avatar_url, is_verified
            "#,
        )
        .bind(id.as_str())
        .bind(update.username.as_deref())
        .bind(update.avatar_url.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update profile: {}", e)))?;

        match row {
            Some(row) => row_to_profile(&row),
            None => Err(DomainError::new(
                ErrorCode::ProfileNotFound,
                format!("Profile not found: {}", id),
            )),
        }
    }
}

fn row_to_profile(row: &PgRow) -> Result<ProfileRecord, DomainError> {
    let id: String = column(row, "id")?;
    let role: Option<String> = column(row, "role")?;
    let is_verified: Option<bool> = column(row, "is_verified")?;

    Ok(ProfileRecord {
        id: UserId::new(id)?,
        username: column::<Option<String>>(row, "username")?.unwrap_or_default(),
        role: role.unwrap_or_default(),
        avatar_url: column(row, "avatar_url")?,
        is_verified: is_verified.unwrap_or(false),
    })
}

