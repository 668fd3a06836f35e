//! SessionBootstrapHandler - resolves the signed-in user at startup.
//!
//! Runs once when the application starts and again on every `SIGNED_IN`
//! notification. Each run asks the auth backend for the current session,
//! loads the matching profile row and either restores the user or leaves
//! the application signed out. The loading flag is cleared on every path.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::store::AppStore;
use crate::domain::foundation::UserId;
use crate::domain::navigation::AppEvent;
use crate::domain::user::User;
use crate::ports::{AuthBackend, ProfileRepository};

/// What a bootstrap run found.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    /// Session and profile found; the user is on the dashboard.
    Authenticated(User),
    /// Nobody is signed in.
    Anonymous,
    /// A session exists but its profile row does not.
    ProfileMissing(UserId),
    /// The backend failed or timed out; the application stays signed out.
    Failed(String),
}

/// Handler for the session bootstrap.
pub struct SessionBootstrapHandler {
    auth: Arc<dyn AuthBackend>,
    profiles: Arc<dyn ProfileRepository>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl SessionBootstrapHandler {
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

    pub async fn handle(&self) -> BootstrapOutcome {
        let outcome = self.resolve().await;

        match &outcome {
            BootstrapOutcome::Authenticated(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.store.dispatch(AppEvent::SessionRestored(user.clone()));
            }
            BootstrapOutcome::Anonymous => {
                tracing::debug!("No session to restore");
                self.store.dispatch(AppEvent::SessionAbsent);
            }
            BootstrapOutcome::ProfileMissing(user_id) => {
                tracing::warn!(user_id = %user_id, "Session has no profile row");
                self.store.dispatch(AppEvent::SessionAbsent);
            }
            BootstrapOutcome::Failed(reason) => {
                tracing::warn!(reason = %reason, "Session bootstrap failed");
                self.store.dispatch(AppEvent::SessionAbsent);
            }
        }
        outcome
    }

    async fn resolve(&self) -> BootstrapOutcome {
        let session = match timeout(self.call_timeout, self.auth.get_session()).await {
            Ok(Ok(Some(session))) => session,
            Ok(Ok(None)) => return BootstrapOutcome::Anonymous,
            Ok(Err(err)) => return BootstrapOutcome::Failed(err.to_string()),
            Err(_) => return BootstrapOutcome::Failed("session lookup timed out".to_string()),
        };

        let found = timeout(self.call_timeout, self.profiles.find_by_id(&session.user_id)).await;
        match found {
            Ok(Ok(Some(record))) => BootstrapOutcome::Authenticated(User::from_profile(record)),
            Ok(Ok(None)) => BootstrapOutcome::ProfileMissing(session.user_id),
            Ok(Err(err)) => BootstrapOutcome::Failed(err.to_string()),
            Err(_) => BootstrapOutcome::Failed("profile lookup timed out".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::InMemoryAuthBackend;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::{AuthError, AuthSession, DomainError, ErrorCode};
    use crate::domain::navigation::View;
    use crate::domain::user::ProfileRecord;
    use async_trait::async_trait;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn user_id() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn profile() -> ProfileRecord {
        ProfileRecord {
            id: user_id(),
            username: "sara".to_string(),
            role: "admin".to_string(),
            avatar_url: None,
            is_verified: true,
        }
    }

    fn handler(
        auth: InMemoryAuthBackend,
        profiles: impl ProfileRepository + 'static,
    ) -> (SessionBootstrapHandler, Arc<AppStore>) {
        let store = Arc::new(AppStore::new());
        let handler =
            SessionBootstrapHandler::new(Arc::new(auth), Arc::new(profiles), store.clone(), TIMEOUT);
        (handler, store)
    }

    struct HangingProfiles;

    #[async_trait]
    impl ProfileRepository for HangingProfiles {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<ProfileRecord>, DomainError> {
            std::future::pending().await
        }

        async fn update(
            &self,
            _id: &UserId,
            _update: &crate::domain::user::ProfileUpdate,
        ) -> Result<ProfileRecord, DomainError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn session_with_profile_restores_user() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_session(AuthSession::new(user_id())),
            InMemoryProfileRepository::new().with_profile(profile()),
        );

        let outcome = handler.handle().await;

        assert!(matches!(outcome, BootstrapOutcome::Authenticated(ref u) if u.is_admin()));
        let state = store.snapshot();
        assert_eq!(state.view(), View::Dashboard);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn no_session_stays_on_login_and_clears_loading() {
        let (handler, store) = handler(InMemoryAuthBackend::new(), InMemoryProfileRepository::new());

        assert_eq!(handler.handle().await, BootstrapOutcome::Anonymous);
        let state = store.snapshot();
        assert_eq!(state.view(), View::Login);
        assert!(state.current_user().is_none());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn session_without_profile_stays_signed_out() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_session(AuthSession::new(user_id())),
            InMemoryProfileRepository::new(),
        );

        assert_eq!(handler.handle().await, BootstrapOutcome::ProfileMissing(user_id()));
        assert!(store.current_user().is_none());
        assert!(!store.snapshot().is_loading());
    }

    #[tokio::test]
    async fn duplicate_profiles_are_not_treated_as_found() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_session(AuthSession::new(user_id())),
            InMemoryProfileRepository::new()
                .with_profile(profile())
                .with_profile(profile()),
        );

        assert!(matches!(handler.handle().await, BootstrapOutcome::Failed(_)));
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn auth_failure_clears_loading() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_error(AuthError::service_unavailable("down")),
            InMemoryProfileRepository::new(),
        );

        assert!(matches!(handler.handle().await, BootstrapOutcome::Failed(_)));
        assert!(!store.snapshot().is_loading());
    }

    #[tokio::test]
    async fn profile_failure_clears_loading() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_session(AuthSession::new(user_id())),
            InMemoryProfileRepository::new()
                .with_error(DomainError::new(ErrorCode::DatabaseError, "boom")),
        );

        assert!(matches!(handler.handle().await, BootstrapOutcome::Failed(_)));
        assert!(!store.snapshot().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_profile_lookup_times_out() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_session(AuthSession::new(user_id())),
            HangingProfiles,
        );

        match handler.handle().await {
            BootstrapOutcome::Failed(reason) => assert!(reason.contains("timed out")),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!store.snapshot().is_loading());
    }

    #[tokio::test]
    async fn repeated_bootstrap_is_idempotent() {
        let (handler, store) = handler(
            InMemoryAuthBackend::new().with_session(AuthSession::new(user_id())),
            InMemoryProfileRepository::new().with_profile(profile()),
        );

        handler.handle().await;
        let first = store.snapshot();
        handler.handle().await;
        assert_eq!(store.snapshot(), first);
    }
}
