//! Exam repository port.
//!
//! Reads and inserts rows of the `exams` table. Questions travel as one
//! JSON array column.

use async_trait::async_trait;

use crate::domain::exam::{ExamRecord, NewExam};
use crate::domain::foundation::{DomainError, GroupId};

/// Repository port for exams.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// The most recently created exam of a group.
    ///
    /// Returns `None` if the group has no exams.
    async fn latest_for_group(&self, group_id: &GroupId)
        -> Result<Option<ExamRecord>, DomainError>;

    /// Insert a new exam and return the stored row.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure, with the backend message
    async fn insert(&self, exam: &NewExam) -> Result<ExamRecord, DomainError>;
}
