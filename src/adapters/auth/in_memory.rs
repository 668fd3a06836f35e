//! In-memory auth backend for tests and local development.
//!
//! Accounts live in a map keyed by email. Sign-in, sign-up and sign-out
//! publish the same notifications the hosted service would.
//!
//! # Example
//!
//! ```ignore
//! let backend = InMemoryAuthBackend::new()
//!     .with_account("sara@example.com", "secret", UserId::new("u1").unwrap());
//!
//! let session = backend.sign_in_with_password("sara@example.com", "secret").await?;
//! assert_eq!(session.user_id.as_str(), "u1");
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{AuthError, AuthSession, AuthStateChange, UserId};
use crate::ports::{AuthBackend, AuthStateStream, SignUpRequest};

use super::notifier::AuthStateNotifier;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user_id: UserId,
}

/// Auth backend holding accounts and the current session in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuthBackend {
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<AuthSession>>,
    force_error: Mutex<Option<AuthError>>,
    notifier: AuthStateNotifier,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can sign in.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        user_id: UserId,
    ) -> Self {
        lock(&self.accounts).insert(
            email.into(),
            Account {
                password: password.into(),
                user_id,
            },
        );
        self
    }

    /// Starts with a session already restored.
    pub fn with_session(self, session: AuthSession) -> Self {
        *lock(&self.session) = Some(session);
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *lock(&self.force_error) = Some(error);
        self
    }

    /// Pushes a notification to subscribers, as the hosted service would
    /// on token refresh or a sign-out from another tab.
    pub fn emit(&self, change: AuthStateChange) {
        *lock(&self.session) = change.session.clone();
        self.notifier.publish(change);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    fn check_error(&self) -> Result<(), AuthError> {
        match lock(&self.force_error).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start_session(&self, email: &str, user_id: UserId) -> AuthSession {
        let session = AuthSession::new(user_id).with_email(email);
        *lock(&self.session) = Some(session.clone());
        self.notifier
            .publish(AuthStateChange::signed_in(session.clone()));
        session
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuthBackend {
    async fn get_session(&self) -> Result<Option<AuthSession>, AuthError> {
        self.check_error()?;
        Ok(lock(&self.session).clone())
    }

    fn subscribe(&self) -> AuthStateStream {
        self.notifier.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.check_error()?;
        *lock(&self.session) = None;
        self.notifier.publish(AuthStateChange::signed_out());
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        self.check_error()?;
        let user_id = {
            let accounts = lock(&self.accounts);
            match accounts.get(email) {
                Some(account) if account.password == password => account.user_id.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        Ok(self.start_session(email, user_id))
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<AuthSession, AuthError> {
        self.check_error()?;
        let user_id = {
            let mut accounts = lock(&self.accounts);
            if accounts.contains_key(&request.email) {
                return Err(AuthError::RegistrationRejected(
                    "User already registered".to_string(),
                ));
            }
            let user_id = UserId::new(Uuid::new_v4().to_string())
                .map_err(|e| AuthError::service_unavailable(e.to_string()))?;
            accounts.insert(
                request.email.clone(),
                Account {
                    password: request.password,
                    user_id: user_id.clone(),
                },
            );
            user_id
        };
        Ok(self.start_session(&request.email, user_id))
    }
}
