//! Exam questions.
//!
//! A question carries a common header (id, text) and a typed body. Only
//! multiple choice exists today; the body is a tagged union so stored rows
//! keep their `"type"` discriminator when more kinds are added.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{QuestionId, ValidationError};

/// Minimum number of answer options a multiple-choice question needs.
pub const MIN_OPTIONS: usize = 2;

/// Maximum number of answer options offered by the authoring form.
pub const MAX_OPTIONS: usize = 4;

/// A single exam question.
///
/// Serialized as stored in `exams.questions`:
/// `{"id","text","options","correctAnswer","type":"MCQ"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// Kind-specific part of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionBody {
    #[serde(rename = "MCQ")]
    MultipleChoice(MultipleChoice),
}

/// Options and answer key of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoice {
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
}

impl Question {
    /// Creates a multiple-choice question.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the text is blank
    /// - `InvalidFormat` if there are fewer than two options, a blank
    ///   option, or the answer index does not point at an option
    pub fn multiple_choice(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        if options.len() < MIN_OPTIONS || options.len() > MAX_OPTIONS {
            return Err(ValidationError::invalid_format(
                "options",
                format!(
                    "expected {} to {} options, got {}",
                    MIN_OPTIONS,
                    MAX_OPTIONS,
                    options.len()
                ),
            ));
        }
        if options.iter().any(|o| o.trim().is_empty()) {
            return Err(ValidationError::invalid_format("options", "blank option"));
        }
        if correct_answer >= options.len() {
            return Err(ValidationError::invalid_format(
                "correct_answer",
                format!("index {} is out of range", correct_answer),
            ));
        }

        Ok(Self {
            id,
            text,
            body: QuestionBody::MultipleChoice(MultipleChoice {
                options,
                correct_answer,
            }),
        })
    }

    /// The type tag stored alongside the question.
    pub fn kind(&self) -> &'static str {
        match self.body {
            QuestionBody::MultipleChoice(_) => "MCQ",
        }
    }

    pub fn options(&self) -> &[String] {
        match &self.body {
            QuestionBody::MultipleChoice(mcq) => &mcq.options,
        }
    }

    pub fn correct_answer(&self) -> usize {
        match &self.body {
            QuestionBody::MultipleChoice(mcq) => mcq.correct_answer,
        }
    }
}
