//! Errors surfaced by the application flows.

use thiserror::Error;

use crate::domain::exam::DraftError;
use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};
use crate::ports::ImageEditError;

const UNKNOWN_ERROR: &str = "خطأ غير معروف";

/// Failure of a user-triggered flow.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("No exam draft is open")]
    NoDraft,

    #[error("Signed in, but no profile exists for the account")]
    ProfileMissing,

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Backend(#[from] DomainError),

    #[error(transparent)]
    Image(#[from] ImageEditError),
}

impl FlowError {
    pub fn timeout(operation: &'static str) -> Self {
        Self::Timeout { operation }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FlowError::NotSignedIn => ErrorCode::Unauthorized,
            FlowError::NoDraft => ErrorCode::ValidationFailed,
            FlowError::ProfileMissing => ErrorCode::ProfileNotFound,
            FlowError::Timeout { .. } => ErrorCode::Timeout,
            FlowError::Draft(err) => err.code(),
            FlowError::Validation(_) => ErrorCode::ValidationFailed,
            FlowError::Auth(AuthError::InvalidCredentials | AuthError::NotSignedIn) => {
                ErrorCode::Unauthorized
            }
            FlowError::Auth(AuthError::RegistrationRejected(_)) => ErrorCode::ValidationFailed,
            FlowError::Auth(AuthError::Timeout) => ErrorCode::Timeout,
            FlowError::Auth(_) => ErrorCode::AuthServiceError,
            FlowError::Backend(err) => err.code,
            FlowError::Image(ImageEditError::InvalidRequest(_)) => ErrorCode::ValidationFailed,
            FlowError::Image(ImageEditError::Timeout { .. }) => ErrorCode::Timeout,
            FlowError::Image(_) => ErrorCode::ImageServiceError,
        }
    }

    /// True when trying again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FlowError::Timeout { .. } => true,
            FlowError::Auth(err) => err.is_transient(),
            FlowError::Backend(err) => {
                matches!(err.code, ErrorCode::DatabaseError | ErrorCode::Timeout)
            }
            FlowError::Image(err) => matches!(
                err,
                ImageEditError::Network(_) | ImageEditError::Timeout { .. }
            ),
            _ => false,
        }
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::NotSignedIn => AuthError::NotSignedIn.user_message(),
            FlowError::NoDraft => "لا يوجد اختبار قيد الإنشاء.".to_string(),
            FlowError::ProfileMissing => "لم يتم العثور على الملف الشخصي للحساب.".to_string(),
            FlowError::Timeout { .. } => "انتهت مهلة الاتصال، حاول مرة أخرى.".to_string(),
            FlowError::Draft(err) => err.user_message(),
            FlowError::Validation(err) => err.to_string(),
            FlowError::Auth(err) => err.user_message(),
            FlowError::Backend(err) if err.message.is_empty() => UNKNOWN_ERROR.to_string(),
            FlowError::Backend(err) => err.message.clone(),
            FlowError::Image(err) => err.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_errors_keep_their_message() {
        let err = FlowError::from(DraftError::EmptyTitle);
        assert_eq!(err.user_message(), DraftError::EmptyTitle.user_message());
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn timeouts_are_retryable() {
        let err = FlowError::timeout("publish");
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "publish timed out");
        assert!(!FlowError::NoDraft.is_retryable());
    }

    #[test]
    fn backend_error_without_message_falls_back_to_unknown() {
        let err = FlowError::from(DomainError::database(""));
        assert_eq!(err.user_message(), UNKNOWN_ERROR);
    }

    #[test]
    fn invalid_credentials_are_unauthorized() {
        let err = FlowError::from(AuthError::InvalidCredentials);
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
