//! Exam draft - the not-yet-persisted exam under construction.
//!
//! The draft owns the title, the questions accepted so far and the saving
//! flag that disables publishing while an insert is in flight.
//!
//! # Invariants
//!
//! - Every accepted question has 2 to 4 non-empty options and an answer
//!   index pointing at one of them. A blank or missing selection falls back
//!   to the first remaining option.
//! - A rejected operation changes nothing.
//! - Publishing starts only with a non-blank title, at least one question
//!   and no other publish in flight.

use serde::Serialize;

use crate::domain::foundation::{GroupId, QuestionId, UserId};

use super::aggregate::NewExam;
use super::errors::DraftError;
use super::question::{Question, MAX_OPTIONS, MIN_OPTIONS};

/// Raw question input: text, four option slots and the selected slot.
struct QuestionForm {
    text: String,
    options: [String; MAX_OPTIONS],
    correct_option: usize,
}

impl QuestionForm {
    fn new(text: impl Into<String>, options: [String; MAX_OPTIONS], correct_option: usize) -> Self {
        Self {
            text: text.into(),
            options,
            correct_option,
        }
    }

    /// Validates the form and builds a fresh question from it.
    ///
    /// Blank slots are dropped; the answer index follows the selected
    /// option to its position among the remaining ones, or is 0 when the
    /// selected slot is blank or out of range.
    fn to_question(&self) -> Result<Question, DraftError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DraftError::EmptyQuestionText);
        }

        let trimmed: Vec<&str> = self.options.iter().map(|o| o.trim()).collect();
        let filled = trimmed.iter().filter(|o| !o.is_empty()).count();
        if filled < MIN_OPTIONS {
            return Err(DraftError::TooFewOptions { filled });
        }

        let correct_answer = match trimmed.get(self.correct_option) {
            Some(selected) if !selected.is_empty() => trimmed[..self.correct_option]
                .iter()
                .filter(|o| !o.is_empty())
                .count(),
            _ => 0,
        };

        let options = trimmed
            .into_iter()
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Question::multiple_choice(QuestionId::generate(), text, options, correct_answer)
            .map_err(|_| DraftError::TooFewOptions { filled })
    }
}

/// In-memory exam under construction for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDraft {
    group_id: GroupId,
    creator_id: UserId,
    title: String,
    questions: Vec<Question>,
    saving: bool,
}

impl ExamDraft {
    /// Starts an empty draft for a group, authored by `creator_id`.
    pub fn new(group_id: GroupId, creator_id: UserId) -> Self {
        Self {
            group_id,
            creator_id,
            title: String::new(),
            questions: Vec::new(),
            saving: false,
        }
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// True while an insert is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// True when the publish control should be enabled.
    pub fn can_publish(&self) -> bool {
        !self.saving && !self.questions.is_empty()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Validates the input and appends the resulting question.
    ///
    /// On rejection the question list does not change.
    pub fn add_question(
        &mut self,
        text: impl Into<String>,
        options: [String; MAX_OPTIONS],
        correct_option: usize,
    ) -> Result<&Question, DraftError> {
        let question = QuestionForm::new(text, options, correct_option).to_question()?;
        Ok(self.accept(question))
    }

    fn accept(&mut self, question: Question) -> &Question {
        self.questions.push(question);
        &self.questions[self.questions.len() - 1]
    }

    /// Drops the question with the given id. Returns whether one was removed.
    pub fn remove_question(&mut self, id: &QuestionId) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| &q.id != id);
        self.questions.len() != before
    }

    /// Validates the draft, raises the saving flag and returns the record to
    /// insert.
    ///
    /// The caller must call [`ExamDraft::finish_publish`] once the insert
    /// settles, whatever its outcome.
    pub fn begin_publish(&mut self) -> Result<NewExam, DraftError> {
        if self.saving {
            return Err(DraftError::PublishInProgress);
        }
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.questions.is_empty() {
            return Err(DraftError::NoQuestions);
        }

        let exam = NewExam {
            group_id: self.group_id.clone(),
            title: title.to_string(),
            questions: self.questions.clone(),
            creator_id: self.creator_id.clone(),
        };
        self.saving = true;
        Ok(exam)
    }

    /// Lowers the saving flag.
    pub fn finish_publish(&mut self) {
        self.saving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draft() -> ExamDraft {
        ExamDraft::new(GroupId::new("g1").unwrap(), UserId::new("u1").unwrap())
    }

    fn slots(a: &str, b: &str, c: &str, d: &str) -> [String; 4] {
        [a.to_string(), b.to_string(), c.to_string(), d.to_string()]
    }

    #[test]
    fn add_question_drops_empty_slots() {
        let mut draft = draft();
        let question = draft.add_question("t", slots("a", "b", "", "c"), 0).unwrap();

        assert_eq!(question.options(), &["a", "b", "c"]);
        assert_eq!(question.correct_answer(), 0);
        assert_eq!(question.kind(), "MCQ");
        assert_eq!(draft.questions().len(), 1);
    }

    #[test]
    fn add_question_keeps_answer_index_before_gap() {
        let mut draft = draft();
        let question = draft.add_question("t", slots("a", "b", "", "c"), 1).unwrap();
        assert_eq!(question.correct_answer(), 1);
    }

    #[test]
    fn add_question_remaps_answer_after_gap() {
        let mut draft = draft();
        let question = draft.add_question("t", slots("a", "", "b", "c"), 3).unwrap();
        assert_eq!(question.options()[question.correct_answer()], "c");
    }

    #[test]
    fn add_question_trims_options_and_text() {
        let mut draft = draft();
        let question = draft
            .add_question("  what?  ", slots(" a ", "b  ", "", ""), 0)
            .unwrap();
        assert_eq!(question.text, "what?");
        assert_eq!(question.options(), &["a", "b"]);
    }

    #[test]
    fn add_question_rejects_blank_text() {
        let mut draft = draft();
        let result = draft.add_question("   ", slots("a", "b", "", ""), 0);
        assert_eq!(result.unwrap_err(), DraftError::EmptyQuestionText);
        assert!(draft.questions().is_empty());
    }

    #[test]
    fn add_question_rejects_single_option() {
        let mut draft = draft();
        let result = draft.add_question("t", slots("a", " ", "", ""), 0);
        assert_eq!(result.unwrap_err(), DraftError::TooFewOptions { filled: 1 });
        assert!(draft.questions().is_empty());
    }

    #[test]
    fn add_question_with_blank_selected_slot_answers_first_option() {
        let mut draft = draft();
        let question = draft.add_question("t", slots("", "a", "b", ""), 0).unwrap();

        assert_eq!(question.options(), &["a", "b"]);
        assert_eq!(question.correct_answer(), 0);
        assert_eq!(draft.questions().len(), 1);
    }

    #[test]
    fn add_question_with_out_of_range_selection_answers_first_option() {
        let mut draft = draft();
        let question = draft.add_question("t", slots("a", "b", "c", ""), 7).unwrap();
        assert_eq!(question.correct_answer(), 0);
    }

    #[test]
    fn questions_get_distinct_ids() {
        let mut draft = draft();
        let first = draft.add_question("1", slots("a", "b", "", ""), 0).unwrap().id.clone();
        let second = draft.add_question("2", slots("a", "b", "", ""), 0).unwrap().id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn remove_question_filters_by_id() {
        let mut draft = draft();
        let id = draft.add_question("1", slots("a", "b", "", ""), 0).unwrap().id.clone();
        draft.add_question("2", slots("a", "b", "", ""), 0).unwrap();

        assert!(draft.remove_question(&id));
        assert_eq!(draft.questions().len(), 1);
        assert_eq!(draft.questions()[0].text, "2");
        assert!(!draft.remove_question(&id));
    }

    #[test]
    fn begin_publish_rejects_blank_title() {
        let mut draft = draft();
        draft.add_question("1", slots("a", "b", "", ""), 0).unwrap();
        draft.set_title("  ");
        assert_eq!(draft.begin_publish().unwrap_err(), DraftError::EmptyTitle);
        assert!(!draft.is_saving());
    }

    #[test]
    fn begin_publish_rejects_empty_question_list() {
        let mut draft = draft();
        draft.set_title("Quiz");
        assert_eq!(draft.begin_publish().unwrap_err(), DraftError::NoQuestions);
        assert!(!draft.can_publish());
    }

    #[test]
    fn begin_publish_builds_record_and_raises_flag() {
        let mut draft = draft();
        draft.set_title(" Weekly quiz ");
        draft.add_question("1", slots("a", "b", "", ""), 0).unwrap();

        let exam = draft.begin_publish().unwrap();

        assert_eq!(exam.title, "Weekly quiz");
        assert_eq!(exam.group_id.as_str(), "g1");
        assert_eq!(exam.creator_id.as_str(), "u1");
        assert_eq!(exam.questions.len(), 1);
        assert!(draft.is_saving());
        assert!(!draft.can_publish());
        assert_eq!(draft.begin_publish().unwrap_err(), DraftError::PublishInProgress);
    }

    #[test]
    fn finish_publish_keeps_draft_content() {
        let mut draft = draft();
        draft.set_title("Quiz");
        draft.add_question("1", slots("a", "b", "", ""), 0).unwrap();
        draft.begin_publish().unwrap();

        draft.finish_publish();

        assert!(!draft.is_saving());
        assert_eq!(draft.title(), "Quiz");
        assert_eq!(draft.questions().len(), 1);
    }

    fn slot_strategy() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,6}"]
    }

    proptest! {
        #[test]
        fn prop_accepted_questions_have_two_to_four_options(
            options in proptest::array::uniform4(slot_strategy()),
            correct in 0..4usize,
        ) {
            let mut draft = draft();
            let filled = options.iter().filter(|o| !o.trim().is_empty()).count();
            let selected = options[correct].trim().to_string();

            match draft.add_question("t", options, correct) {
                Ok(question) => {
                    prop_assert!(filled >= 2);
                    prop_assert_eq!(question.options().len(), filled);
                    if selected.is_empty() {
                        prop_assert_eq!(question.correct_answer(), 0);
                    } else {
                        prop_assert_eq!(&question.options()[question.correct_answer()], &selected);
                    }
                    prop_assert_eq!(draft.questions().len(), 1);
                }
                Err(_) => {
                    prop_assert!(filled < 2);
                    prop_assert!(draft.questions().is_empty());
                }
            }
        }
    }
}
