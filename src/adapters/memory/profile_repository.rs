//! In-memory profile repository for tests and local runs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::{ProfileRecord, ProfileUpdate};
use crate::ports::ProfileRepository;

/// Profile rows keyed by user id. A user may be seeded with several rows
/// to exercise the more-than-one case.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    rows: Mutex<HashMap<UserId, Vec<ProfileRecord>>>,
    force_error: Mutex<Option<DomainError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile row.
    pub fn with_profile(self, record: ProfileRecord) -> Self {
        self.insert(record);
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: DomainError) -> Self {
        *lock(&self.force_error) = Some(error);
        self
    }

    /// Adds a profile row, as the sign-up trigger would.
    pub fn insert(&self, record: ProfileRecord) {
        lock(&self.rows)
            .entry(record.id.clone())
            .or_default()
            .push(record);
    }

    fn check_error(&self) -> Result<(), DomainError> {
        match lock(&self.force_error).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<ProfileRecord>, DomainError> {
        self.check_error()?;
        match lock(&self.rows).get(id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([row]) => Ok(Some(row.clone())),
            Some(_) => Err(DomainError::new(
                ErrorCode::DataIntegrity,
                format!("More than one profile for user {}", id),
            )),
        }
    }

    async fn update(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<ProfileRecord, DomainError> {
        self.check_error()?;
        let mut rows = lock(&self.rows);
        let row = rows
            .get_mut(id)
            .and_then(|rows| rows.first_mut())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ProfileNotFound, format!("Profile not found: {}", id))
            })?;

        if let Some(username) = &update.username {
            row.username = username.clone();
        }
        if let Some(avatar_url) = &update.avatar_url {
            row.avatar_url = Some(avatar_url.clone());
        }
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> ProfileRecord {
        ProfileRecord {
            id: UserId::new(id).unwrap(),
            username: "sara".to_string(),
            role: "regular".to_string(),
            avatar_url: None,
            is_verified: false,
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_single_row() {
        let repo = InMemoryProfileRepository::new().with_profile(profile("u1"));
        let found = repo.find_by_id(&UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(found, Some(profile("u1")));
    }

    #[tokio::test]
    async fn find_by_id_missing_is_none() {
        let repo = InMemoryProfileRepository::new();
        assert_eq!(repo.find_by_id(&UserId::new("u1").unwrap()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_by_id_with_two_rows_is_integrity_error() {
        let repo = InMemoryProfileRepository::new()
            .with_profile(profile("u1"))
            .with_profile(profile("u1"));
        let err = repo
            .find_by_id(&UserId::new("u1").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DataIntegrity);
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let repo = InMemoryProfileRepository::new().with_profile(profile("u1"));
        let updated = repo
            .update(
                &UserId::new("u1").unwrap(),
                &ProfileUpdate {
                    username: None,
                    avatar_url: Some("https://cdn/a.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "sara");
        assert_eq!(updated.avatar_url.as_deref(), Some("https://cdn/a.png"));
    }

    #[tokio::test]
    async fn update_missing_profile_is_not_found() {
        let repo = InMemoryProfileRepository::new();
        let err = repo
            .update(&UserId::new("u1").unwrap(), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProfileNotFound);
    }
}
