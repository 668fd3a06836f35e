//! UpdateProfileHandler - edits the signed-in user's username and avatar.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::navigation::AppEvent;
use crate::domain::user::{ProfileUpdate, User};
use crate::ports::ProfileRepository;

/// Handler for profile edits.
pub struct UpdateProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl UpdateProfileHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        store: Arc<AppStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            profiles,
            store,
            call_timeout,
        }
    }

    /// Stores the update and replaces the in-memory user.
    ///
    /// An update that changes nothing returns the current user untouched.
    pub async fn handle(&self, update: ProfileUpdate) -> Result<User, FlowError> {
        let current = self.store.current_user().ok_or(FlowError::NotSignedIn)?;
        let update = update.normalized()?;
        if update.is_empty() {
            return Ok(current);
        }

        let record = timeout(self.call_timeout, self.profiles.update(&current.id, &update))
            .await
            .map_err(|_| FlowError::timeout("profile update"))??;

        let mut user = User::from_profile(record);
        user.joined_groups = current.joined_groups;
        tracing::info!(user_id = %user.id, "Profile updated");
        self.store.dispatch(AppEvent::ProfileUpdated(user.clone()));
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::{DomainError, UserId};
    use crate::domain::user::ProfileRecord;

    fn record() -> ProfileRecord {
        ProfileRecord {
            id: UserId::new("u1").unwrap(),
            username: "sara".to_string(),
            role: "regular".to_string(),
            avatar_url: None,
            is_verified: true,
        }
    }

    fn handler(repo: InMemoryProfileRepository) -> (UpdateProfileHandler, Arc<AppStore>) {
        let store = Arc::new(AppStore::new());
        store.dispatch(AppEvent::LoggedIn(User::from_profile(record())));
        let handler = UpdateProfileHandler::new(Arc::new(repo), store.clone(), Duration::from_secs(1));
        (handler, store)
    }

    #[tokio::test]
    async fn update_replaces_current_user() {
        let (handler, store) = handler(InMemoryProfileRepository::new().with_profile(record()));

        let user = handler
            .handle(ProfileUpdate {
                username: Some("  noor ".to_string()),
                avatar_url: Some("https://cdn/n.png".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(user.username, "noor");
        let current = store.current_user().unwrap();
        assert_eq!(current.username, "noor");
        assert_eq!(current.avatar.as_deref(), Some("https://cdn/n.png"));
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let (handler, store) = handler(InMemoryProfileRepository::new().with_profile(record()));

        let err = handler
            .handle(ProfileUpdate {
                username: Some(" ".to_string()),
                avatar_url: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::Validation(_)));
        assert_eq!(store.current_user().unwrap().username, "sara");
    }

    #[tokio::test]
    async fn backend_failure_keeps_user() {
        let (handler, store) = handler(
            InMemoryProfileRepository::new().with_error(DomainError::database("down")),
        );

        let result = handler
            .handle(ProfileUpdate {
                username: Some("noor".to_string()),
                avatar_url: None,
            })
            .await;

        assert!(matches!(result, Err(FlowError::Backend(_))));
        assert_eq!(store.current_user().unwrap().username, "sara");
    }

    #[tokio::test]
    async fn signed_out_update_is_rejected() {
        let handler = UpdateProfileHandler::new(
            Arc::new(InMemoryProfileRepository::new()),
            Arc::new(AppStore::new()),
            Duration::from_secs(1),
        );
        assert!(matches!(
            handler.handle(ProfileUpdate::default()).await,
            Err(FlowError::NotSignedIn)
        ));
    }
}
