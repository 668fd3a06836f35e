//! Authoring errors.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Rejections from the exam draft.
///
/// Every variant leaves the draft exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Question text is empty")]
    EmptyQuestionText,

    #[error("At least two options are required, got {filled}")]
    TooFewOptions { filled: usize },

    #[error("Exam title is empty")]
    EmptyTitle,

    #[error("Exam has no questions")]
    NoQuestions,

    #[error("Exam is already being published")]
    PublishInProgress,
}

impl DraftError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DraftError::PublishInProgress => ErrorCode::InternalError,
            _ => ErrorCode::ValidationFailed,
        }
    }

    /// Message shown to the author.
    pub fn user_message(&self) -> String {
        match self {
            DraftError::EmptyQuestionText => "يرجى كتابة نص السؤال أولاً.".to_string(),
            DraftError::TooFewOptions { .. } => "يرجى كتابة خيارين على الأقل للسؤال.".to_string(),
            DraftError::EmptyTitle => "يرجى إدخال عنوان للاختبار.".to_string(),
            DraftError::NoQuestions => {
                "لا يمكن نشر اختبار بدون أسئلة. أضف سؤالاً واحداً على الأقل.".to_string()
            }
            DraftError::PublishInProgress => "جاري نشر الاختبار، يرجى الانتظار.".to_string(),
        }
    }
}
