//! EditDraftHandler - authoring operations on the open exam draft.
//!
//! All operations are synchronous and run under the store lock. A rejected
//! operation leaves the draft unchanged.

use std::sync::Arc;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::exam::{ExamDraft, Question, MAX_OPTIONS};
use crate::domain::foundation::{QuestionId, ValidationError};

/// Command to add a question to the draft.
#[derive(Debug, Clone)]
pub struct AddQuestionCommand {
    pub text: String,
    /// Up to four option slots, blanks allowed.
    pub options: Vec<String>,
    /// Slot holding the correct answer.
    pub correct_option: usize,
}

impl AddQuestionCommand {
    fn slots(self) -> Result<(String, [String; MAX_OPTIONS], usize), ValidationError> {
        if self.options.len() > MAX_OPTIONS {
            return Err(ValidationError::invalid_format(
                "options",
                format!("at most {} options are allowed", MAX_OPTIONS),
            ));
        }
        let mut slots: [String; MAX_OPTIONS] = Default::default();
        for (slot, option) in slots.iter_mut().zip(self.options) {
            *slot = option;
        }
        Ok((self.text, slots, self.correct_option))
    }
}

/// Handler for draft edits.
pub struct EditDraftHandler {
    store: Arc<AppStore>,
}

impl EditDraftHandler {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self { store }
    }

    pub fn set_title(&self, title: impl Into<String>) -> Result<ExamDraft, FlowError> {
        let title = title.into();
        self.store
            .with_draft(|draft| {
                draft.set_title(title);
                draft.clone()
            })
            .ok_or(FlowError::NoDraft)
    }

    pub fn add_question(&self, cmd: AddQuestionCommand) -> Result<Question, FlowError> {
        let (text, options, correct_option) = cmd.slots()?;
        let question = self
            .store
            .with_draft(|draft| {
                draft
                    .add_question(text, options, correct_option)
                    .map(Question::clone)
            })
            .ok_or(FlowError::NoDraft)??;

        tracing::debug!(question_id = %question.id, "Question added to draft");
        Ok(question)
    }

    /// Returns whether a question was removed.
    pub fn remove_question(&self, id: &QuestionId) -> Result<bool, FlowError> {
        self.store
            .with_draft(|draft| draft.remove_question(id))
            .ok_or(FlowError::NoDraft)
    }

    pub fn current(&self) -> Result<ExamDraft, FlowError> {
        self.store
            .snapshot()
            .draft()
            .cloned()
            .ok_or(FlowError::NoDraft)
    }
}
