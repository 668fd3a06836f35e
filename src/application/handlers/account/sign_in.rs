//! SignInHandler - email/password sign-in.
//!
//! The backend also emits `SIGNED_IN`, which makes the watcher bootstrap
//! again. Both paths end in the same state.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::foundation::ValidationError;
use crate::domain::navigation::AppEvent;
use crate::domain::user::User;
use crate::ports::{AuthBackend, ProfileRepository};

/// Command to sign in.
#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub email: String,
    pub password: String,
}

/// Handler for signing in.
pub struct SignInHandler {
    auth: Arc<dyn AuthBackend>,
    profiles: Arc<dyn ProfileRepository>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl SignInHandler {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        profiles: Arc<dyn ProfileRepository>,
        store: Arc<AppStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            auth,
            profiles,
            store,
            call_timeout,
        }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<User, FlowError> {
        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email").into());
        }
        if cmd.password.is_empty() {
            return Err(ValidationError::empty_field("password").into());
        }

        let session = timeout(
            self.call_timeout,
            self.auth.sign_in_with_password(email, &cmd.password),
        )
        .await
        .map_err(|_| FlowError::timeout("sign in"))??;

        let record = timeout(self.call_timeout, self.profiles.find_by_id(&session.user_id))
            .await
            .map_err(|_| FlowError::timeout("profile lookup"))??
            .ok_or(FlowError::ProfileMissing)?;

        let user = User::from_profile(record);
        tracing::info!(user_id = %user.id, "User signed in");
        self.store.dispatch(AppEvent::LoggedIn(user.clone()));
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::InMemoryAuthBackend;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::{AuthError, UserId};
    use crate::domain::navigation::View;
    use crate::domain::user::ProfileRecord;

    fn profile() -> ProfileRecord {
        ProfileRecord {
            id: UserId::new("u1").unwrap(),
            username: "sara".to_string(),
            role: "regular".to_string(),
            avatar_url: None,
            is_verified: false,
        }
    }

    fn handler(profiles: InMemoryProfileRepository) -> (SignInHandler, Arc<AppStore>) {
        let auth = InMemoryAuthBackend::new().with_account(
            "sara@example.com",
            "secret",
            UserId::new("u1").unwrap(),
        );
        let store = Arc::new(AppStore::new());
        let handler = SignInHandler::new(
            Arc::new(auth),
            Arc::new(profiles),
            store.clone(),
            Duration::from_secs(1),
        );
        (handler, store)
    }

    fn cmd(password: &str) -> SignInCommand {
        SignInCommand {
            email: " sara@example.com ".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_credentials_land_on_dashboard() {
        let (handler, store) = handler(InMemoryProfileRepository::new().with_profile(profile()));

        let user = handler.handle(cmd("secret")).await.unwrap();

        assert_eq!(user.username, "sara");
        assert_eq!(store.snapshot().view(), View::Dashboard);
    }

    #[tokio::test]
    async fn wrong_password_leaves_state_alone() {
        let (handler, store) = handler(InMemoryProfileRepository::new().with_profile(profile()));

        let err = handler.handle(cmd("wrong")).await.unwrap_err();

        assert!(matches!(err, FlowError::Auth(AuthError::InvalidCredentials)));
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn missing_profile_is_reported() {
        let (handler, store) = handler(InMemoryProfileRepository::new());

        let err = handler.handle(cmd("secret")).await.unwrap_err();

        assert!(matches!(err, FlowError::ProfileMissing));
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn blank_email_is_rejected_before_calling_backend() {
        let (handler, _) = handler(InMemoryProfileRepository::new());
        let err = handler
            .handle(SignInCommand {
                email: "  ".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
    }
}
