//! In-memory exam repository for tests and local runs.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use uuid::Uuid;

use crate::domain::exam::{ExamRecord, NewExam};
use crate::domain::foundation::{DomainError, ExamId, GroupId, Timestamp};
use crate::ports::ExamRepository;

/// Exams kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryExamRepository {
    exams: Mutex<Vec<ExamRecord>>,
    force_error: Mutex<Option<DomainError>>,
    delay: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryExamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored exam.
    pub fn with_exam(self, exam: ExamRecord) -> Self {
        lock(&self.exams).push(exam);
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: DomainError) -> Self {
        *lock(&self.force_error) = Some(error);
        self
    }

    /// Simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every stored exam, oldest first.
    pub fn all(&self) -> Vec<ExamRecord> {
        lock(&self.exams).clone()
    }

    async fn settle(&self) -> Result<(), DomainError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match lock(&self.force_error).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExamRepository for InMemoryExamRepository {
    async fn latest_for_group(
        &self,
        group_id: &GroupId,
    ) -> Result<Option<ExamRecord>, DomainError> {
        self.settle().await?;
        let exams = lock(&self.exams);
        // max_by_key keeps the last of equal keys, so later inserts win ties.
        Ok(exams
            .iter()
            .filter(|exam| &exam.group_id == group_id)
            .max_by_key(|exam| exam.created_at)
            .cloned())
    }

    async fn insert(&self, exam: &NewExam) -> Result<ExamRecord, DomainError> {
        self.settle().await?;
        let record = ExamRecord {
            id: ExamId::new(Uuid::new_v4().to_string())?,
            group_id: exam.group_id.clone(),
            title: exam.title.clone(),
            questions: exam.questions.clone(),
            creator_id: exam.creator_id.clone(),
            created_at: Timestamp::now(),
        };
        lock(&self.exams).push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, UserId};

    fn record(id: &str, group: &str, created_at: i64) -> ExamRecord {
        ExamRecord {
            id: ExamId::new(id).unwrap(),
            group_id: GroupId::new(group).unwrap(),
            title: format!("Exam {}", id),
            questions: Vec::new(),
            creator_id: UserId::new("u1").unwrap(),
            created_at: Timestamp::from_unix_secs(created_at).unwrap(),
        }
    }

    #[tokio::test]
    async fn latest_for_group_picks_newest_of_that_group() {
        let repo = InMemoryExamRepository::new()
            .with_exam(record("old", "g1", 100))
            .with_exam(record("new", "g1", 200))
            .with_exam(record("other", "g2", 300));

        let latest = repo
            .latest_for_group(&GroupId::new("g1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id.as_str(), "new");
    }

    #[tokio::test]
    async fn latest_for_group_without_exams_is_none() {
        let repo = InMemoryExamRepository::new().with_exam(record("e", "g2", 1));
        let latest = repo
            .latest_for_group(&GroupId::new("g1").unwrap())
            .await
            .unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn insert_assigns_id_and_is_found_as_latest() {
        let repo = InMemoryExamRepository::new().with_exam(record("seed", "g1", 100));
        let stored = repo
            .insert(&NewExam {
                group_id: GroupId::new("g1").unwrap(),
                title: "Midterm".to_string(),
                questions: Vec::new(),
                creator_id: UserId::new("u1").unwrap(),
            })
            .await
            .unwrap();

        let latest = repo
            .latest_for_group(&GroupId::new("g1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, stored.id);
        assert_eq!(repo.all().len(), 2);
    }

    #[tokio::test]
    async fn forced_error_is_returned() {
        let repo = InMemoryExamRepository::new()
            .with_error(DomainError::database("connection refused"));
        let err = repo
            .latest_for_group(&GroupId::new("g1").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
