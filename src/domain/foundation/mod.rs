//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, auth session types, error types and the
//! state machine trait that form the vocabulary of the StudyGenius domain.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthChangeEvent, AuthError, AuthSession, AuthStateChange};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ExamId, GroupId, QuestionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
