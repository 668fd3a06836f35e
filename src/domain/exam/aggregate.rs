//! The exam a user takes, and the rows it is read from and written to.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExamId, GroupId, QuestionId, Timestamp, UserId};
use crate::domain::group::Group;

use super::question::{MultipleChoice, Question, QuestionBody};

const FALLBACK_TITLE_SUFFIX: &str = " - اختبار افتراضي";
const FALLBACK_QUESTION_ID: &str = "q1";
const FALLBACK_QUESTION_TEXT: &str = "هل يدعم هذا النظام التشفير التام (E2EE)؟";
const FALLBACK_OPTIONS: [&str; 2] = ["نعم، جميع الرسائل مشفرة", "لا، الرسائل نصية عادية"];

/// An exam held in view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ExamId,
    pub group_id: GroupId,
    pub title: String,
    pub questions: Vec<Question>,
    pub creator_id: UserId,
}

impl Exam {
    /// Synthesizes the placeholder exam for a group with nothing to take.
    ///
    /// The id is derived from the group id, so repeated calls for the same
    /// group produce the same exam.
    pub fn fallback_for(group: &Group) -> Self {
        let question = Question {
            id: QuestionId::from_static(FALLBACK_QUESTION_ID),
            text: FALLBACK_QUESTION_TEXT.to_string(),
            body: QuestionBody::MultipleChoice(MultipleChoice {
                options: FALLBACK_OPTIONS.iter().map(|o| o.to_string()).collect(),
                correct_answer: 0,
            }),
        };

        Self {
            id: ExamId::fallback_for(&group.id),
            group_id: group.id.clone(),
            title: format!("{}{}", group.name, FALLBACK_TITLE_SUFFIX),
            questions: vec![question],
            creator_id: group.creator_id.clone(),
        }
    }

    /// True when this exam was synthesized rather than loaded.
    pub fn is_fallback(&self) -> bool {
        self.id.is_fallback()
    }
}

/// One row of the `exams` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: ExamId,
    pub group_id: GroupId,
    pub title: String,
    pub questions: Vec<Question>,
    pub creator_id: UserId,
    pub created_at: Timestamp,
}

impl From<ExamRecord> for Exam {
    fn from(record: ExamRecord) -> Self {
        Self {
            id: record.id,
            group_id: record.group_id,
            title: record.title,
            questions: record.questions,
            creator_id: record.creator_id,
        }
    }
}

/// An exam ready to be inserted; the backend assigns id and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExam {
    pub group_id: GroupId,
    pub title: String,
    pub questions: Vec<Question>,
    pub creator_id: UserId,
}
