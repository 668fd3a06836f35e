//! RegisterHandler - account creation.
//!
//! The backend creates the profile row from the sign-up metadata. When the
//! row is not readable yet, the user is built from the submitted username.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::foundation::ValidationError;
use crate::domain::navigation::AppEvent;
use crate::domain::user::{ProfileRecord, User, UserRole};
use crate::ports::{AuthBackend, ProfileRepository, SignUpRequest};

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Handler for registration.
pub struct RegisterHandler {
    auth: Arc<dyn AuthBackend>,
    profiles: Arc<dyn ProfileRepository>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl RegisterHandler {
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

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<User, FlowError> {
        let email = cmd.email.trim().to_string();
        let username = cmd.username.trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email").into());
        }
        if username.is_empty() {
            return Err(ValidationError::empty_field("username").into());
        }
        if cmd.password.is_empty() {
            return Err(ValidationError::empty_field("password").into());
        }

        let request = SignUpRequest {
            email,
            password: cmd.password,
            username: username.clone(),
        };
        let session = timeout(self.call_timeout, self.auth.sign_up(request))
            .await
            .map_err(|_| FlowError::timeout("sign up"))??;

        let found = timeout(self.call_timeout, self.profiles.find_by_id(&session.user_id))
            .await
            .map_err(|_| FlowError::timeout("profile lookup"))??;

        let record = found.unwrap_or_else(|| {
            tracing::debug!(user_id = %session.user_id, "Profile row not visible yet");
            ProfileRecord {
                id: session.user_id.clone(),
                username,
                role: UserRole::Regular.as_str().to_string(),
                avatar_url: None,
                is_verified: false,
            }
        });

        let user = User::from_profile(record);
        tracing::info!(user_id = %user.id, "User registered");
        self.store.dispatch(AppEvent::Registered(user.clone()));
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

    fn handler(auth: InMemoryAuthBackend) -> (RegisterHandler, Arc<AppStore>) {
        let store = Arc::new(AppStore::new());
        let handler = RegisterHandler::new(
            Arc::new(auth),
            Arc::new(InMemoryProfileRepository::new()),
            store.clone(),
            Duration::from_secs(1),
        );
        (handler, store)
    }

    fn cmd(email: &str) -> RegisterCommand {
        RegisterCommand {
            email: email.to_string(),
            password: "secret".to_string(),
            username: " noor ".to_string(),
        }
    }

    #[tokio::test]
    async fn new_account_lands_on_dashboard_as_regular_user() {
        let (handler, store) = handler(InMemoryAuthBackend::new());

        let user = handler.handle(cmd("noor@example.com")).await.unwrap();

        assert_eq!(user.username, "noor");
        assert_eq!(user.role, UserRole::Regular);
        assert!(!user.is_verified);
        assert_eq!(store.snapshot().view(), View::Dashboard);
    }

    #[tokio::test]
    async fn existing_email_is_rejected() {
        let auth = InMemoryAuthBackend::new().with_account(
            "noor@example.com",
            "x",
            UserId::new("u2").unwrap(),
        );
        let (handler, store) = handler(auth);

        let err = handler.handle(cmd("noor@example.com")).await.unwrap_err();

        assert!(matches!(err, FlowError::Auth(AuthError::RegistrationRejected(_))));
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let (handler, _) = handler(InMemoryAuthBackend::new());
        let mut command = cmd("noor@example.com");
        command.username = "   ".to_string();
        assert!(matches!(
            handler.handle(command).await,
            Err(FlowError::Validation(_))
        ));
    }
}
