//! Exam module - questions, exams and the authoring draft.
//!
//! - `question` - tagged question union (multiple choice today)
//! - `aggregate` - the exam in view state, its stored row, fallback synthesis
//! - `draft` - the authoring state machine
//! - `errors` - draft rejections

mod aggregate;
mod draft;
mod errors;
mod question;

pub use aggregate::{Exam, ExamRecord, NewExam};
pub use draft::ExamDraft;
pub use errors::DraftError;
pub use question::{MultipleChoice, Question, QuestionBody, MAX_OPTIONS, MIN_OPTIONS};
