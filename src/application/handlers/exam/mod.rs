//! Exam handlers: acquisition, authoring and publishing.

mod edit_draft;
mod open_group;
mod publish_exam;

pub use edit_draft::{AddQuestionCommand, EditDraftHandler};
pub use open_group::{
    AcquiredExam, ExamSource, FallbackReason, OpenGroupCommand, OpenGroupHandler, OpenGroupResult,
};
pub use publish_exam::PublishExamHandler;
