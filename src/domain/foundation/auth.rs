//! Authentication types for the domain layer.
//!
//! These types describe the auth backend's session as the core sees it:
//! presence or absence, and the user id it belongs to. Tokens stay inside
//! the adapter that obtained them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Timestamp, UserId};

/// An authenticated connection to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// The user this session belongs to.
    pub user_id: UserId,

    /// Email address the user signed in with, when the backend reports it.
    pub email: Option<String>,

    /// When the access token stops being accepted.
    pub expires_at: Option<Timestamp>,
}

impl AuthSession {
    /// Creates a session for a user with no further metadata.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            expires_at: None,
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the expiry.
    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Kind of session-change notification emitted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A session-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    /// The session after the change, absent once signed out.
    pub session: Option<AuthSession>,
}

impl AuthStateChange {
    pub fn signed_in(session: AuthSession) -> Self {
        Self {
            event: AuthChangeEvent::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            event: AuthChangeEvent::SignedOut,
            session: None,
        }
    }

    /// True when the notification means the user is no longer signed in.
    ///
    /// Any notification without a session counts, whatever its kind.
    pub fn ends_session(&self) -> bool {
        self.event == AuthChangeEvent::SignedOut || self.session.is_none()
    }
}

/// Errors reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email/password pair was rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Sign-up rejected, e.g. the email is already registered.
    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    /// Account created, but the backend wants the email confirmed before
    /// it issues a session.
    #[error("Email confirmation required")]
    ConfirmationRequired,

    /// The operation needs a signed-in session.
    #[error("Not signed in")]
    NotSignedIn,

    /// The backend did not answer in time.
    #[error("Auth service timed out")]
    Timeout,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_) | AuthError::Timeout)
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "بيانات الدخول غير صحيحة.".to_string(),
            AuthError::RegistrationRejected(reason) => format!("تعذر إنشاء الحساب: {}", reason),
            AuthError::ConfirmationRequired => {
                "تم إنشاء الحساب، يرجى تأكيد بريدك الإلكتروني ثم تسجيل الدخول.".to_string()
            }
            AuthError::NotSignedIn => "يرجى تسجيل الدخول أولاً.".to_string(),
            AuthError::Timeout | AuthError::ServiceUnavailable(_) => {
                "خدمة الدخول غير متاحة حالياً، حاول مرة أخرى.".to_string()
            }
        }
    }
}
