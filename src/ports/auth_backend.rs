//! Auth backend port.
//!
//! The hosted auth service owns credentials and sessions. The core only
//! asks it for the current session, listens to its change notifications,
//! and forwards sign-in, sign-up and sign-out requests.
//!
//! # Subscription lifetime
//!
//! `subscribe` hands out a stream of change notifications. Dropping the
//! stream releases the subscription; implementations must not keep
//! delivering into a dropped stream.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::foundation::{AuthError, AuthSession, AuthStateChange};

/// Stream of session-change notifications.
pub type AuthStateStream = Pin<Box<dyn Stream<Item = AuthStateChange> + Send>>;

/// Sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Port for the hosted authentication service.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `get_session` when nobody is signed in
/// - Emit `SIGNED_IN` after a successful sign-in or sign-up that yields a
///   session, and `SIGNED_OUT` after sign-out
/// - Return `AuthError::ServiceUnavailable` for transport failures
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// The current session, if any.
    async fn get_session(&self) -> Result<Option<AuthSession>, AuthError>;

    /// Subscribe to session changes for as long as the stream is held.
    fn subscribe(&self) -> AuthStateStream;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if the pair is rejected
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    /// Create an account. The username is stored as user metadata, from
    /// which the backend creates the profile row.
    ///
    /// # Errors
    ///
    /// - `RegistrationRejected` if the backend refuses the account
    async fn sign_up(&self, request: SignUpRequest) -> Result<AuthSession, AuthError>;
}
