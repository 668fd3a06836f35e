//! SignOutHandler - ends the session.
//!
//! The local state is signed out whatever the backend answers; a backend
//! failure is still returned so the caller can report it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::navigation::AppEvent;
use crate::ports::AuthBackend;

/// Handler for signing out.
pub struct SignOutHandler {
    auth: Arc<dyn AuthBackend>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl SignOutHandler {
    pub fn new(auth: Arc<dyn AuthBackend>, store: Arc<AppStore>, call_timeout: Duration) -> Self {
        Self {
            auth,
            store,
            call_timeout,
        }
    }

    pub async fn handle(&self) -> Result<(), FlowError> {
        let result = match timeout(self.call_timeout, self.auth.sign_out()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(FlowError::from(err)),
            Err(_) => Err(FlowError::timeout("sign out")),
        };
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Sign-out failed at the auth backend");
        }

        self.store.dispatch(AppEvent::SignedOut);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::InMemoryAuthBackend;
    use crate::domain::foundation::{AuthError, UserId};
    use crate::domain::navigation::View;
    use crate::domain::user::{User, UserRole};

    fn signed_in_store() -> Arc<AppStore> {
        let store = Arc::new(AppStore::new());
        store.dispatch(AppEvent::LoggedIn(User {
            id: UserId::new("u1").unwrap(),
            username: "sara".to_string(),
            role: UserRole::Regular,
            avatar: None,
            is_verified: false,
            joined_groups: Vec::new(),
        }));
        store
    }

    #[tokio::test]
    async fn sign_out_returns_to_login() {
        let store = signed_in_store();
        let handler = SignOutHandler::new(
            Arc::new(InMemoryAuthBackend::new()),
            store.clone(),
            Duration::from_secs(1),
        );

        handler.handle().await.unwrap();

        assert_eq!(store.snapshot().view(), View::Login);
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn backend_failure_still_signs_out_locally() {
        let store = signed_in_store();
        let handler = SignOutHandler::new(
            Arc::new(InMemoryAuthBackend::new().with_error(AuthError::service_unavailable("down"))),
            store.clone(),
            Duration::from_secs(1),
        );

        assert!(handler.handle().await.is_err());
        assert!(store.current_user().is_none());
    }
}
