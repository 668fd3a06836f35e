//! PostgreSQL implementation of ExamRepository.
//!
//! Questions are stored as one `jsonb` array in `exams.questions`, in the
//! same shape the browser client reads.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::exam::{ExamRecord, NewExam, Question};
use crate::domain::foundation::{DomainError, ErrorCode, ExamId, GroupId, Timestamp, UserId};
use crate::ports::ExamRepository;

use super::column;

/// PostgreSQL implementation of ExamRepository.
#[derive(Clone)]
pub struct PostgresExamRepository {
    pool: PgPool,
}

impl PostgresExamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamRepository for PostgresExamRepository {
    async fn latest_for_group(
        &self,
        group_id: &GroupId,
    ) -> Result<Option<ExamRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id::text AS id, group_id::text AS group_id, title, questions,
                   creator_id::text AS creator_id, created_at
            FROM exams
            WHERE group_id = $1::uuid
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(group_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch exam: {}", e)))?;

        row.as_ref().map(row_to_exam).transpose()
    }

    async fn insert(&self, exam: &NewExam) -> Result<ExamRecord, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO exams (group_id, title, questions, creator_id)
            VALUES ($1::uuid, $2, $3, $4::uuid)
            RETURNING id::text AS id, group_id::text AS group_id, title, questions,
                      creator_id::text AS creator_id, created_at
            "#,
        )
        .bind(exam.group_id.as_str())
        .bind(&exam.title)
        .bind(Json(&exam.questions))
        .bind(exam.creator_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert exam: {}", e)))?;

        row_to_exam(&row)
    }
}

fn row_to_exam(row: &PgRow) -> Result<ExamRecord, DomainError> {
    let questions: Json<Vec<Question>> = column(row, "questions").map_err(|e| {
        DomainError::new(
            ErrorCode::DataIntegrity,
            format!("Stored questions are malformed: {}", e.message),
        )
    })?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;

    Ok(ExamRecord {
        id: ExamId::new(column::<String>(row, "id")?)?,
        group_id: GroupId::new(column::<String>(row, "group_id")?)?,
        title: column(row, "title")?,
        questions: questions.0,
        creator_id: UserId::new(column::<String>(row, "creator_id")?)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
