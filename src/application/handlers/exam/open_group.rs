//! OpenGroupHandler - entering a group to take or manage its exam.
//!
//! Taking a group's exam loads the group's most recent exam. A missing row,
//! a failed query and a timeout all fall back to the synthesized placeholder
//! exam; the reason is kept on the result and logged, never shown.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::exam::Exam;
use crate::domain::group::Group;
use crate::domain::navigation::AppEvent;
use crate::ports::ExamRepository;

/// Why the placeholder exam was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NoExam,
    LookupFailed,
    TimedOut,
}

/// Where an acquired exam came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ExamSource {
    Stored,
    Fallback(FallbackReason),
}

/// An exam ready to take.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredExam {
    pub exam: Exam,
    pub source: ExamSource,
}

/// Command to open a group.
#[derive(Debug, Clone)]
pub struct OpenGroupCommand {
    pub group: Group,
    /// Open the exam creator instead of taking the exam.
    pub manage: bool,
}

/// Result of opening a group.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenGroupResult {
    Managing,
    Taking(AcquiredExam),
}

/// Handler for opening groups.
pub struct OpenGroupHandler {
    exams: Arc<dyn ExamRepository>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl OpenGroupHandler {
    pub fn new(exams: Arc<dyn ExamRepository>, store: Arc<AppStore>, call_timeout: Duration) -> Self {
        Self {
            exams,
            store,
            call_timeout,
        }
    }

    pub async fn handle(&self, cmd: OpenGroupCommand) -> Result<OpenGroupResult, FlowError> {
        if self.store.current_user().is_none() {
            return Err(FlowError::NotSignedIn);
        }

        if cmd.manage {
            tracing::info!(group_id = %cmd.group.id, "Opening exam creator");
            self.store.dispatch(AppEvent::ManageGroup(cmd.group));
            return Ok(OpenGroupResult::Managing);
        }

        let acquired = self.acquire_exam(&cmd.group).await;
        self.store
            .dispatch(AppEvent::ExamReady(cmd.group, acquired.exam.clone()));
        Ok(OpenGroupResult::Taking(acquired))
    }

    /// Loads the group's latest exam, or the placeholder. Never fails.
    pub async fn acquire_exam(&self, group: &Group) -> AcquiredExam {
        let lookup = timeout(self.call_timeout, self.exams.latest_for_group(&group.id)).await;

        let reason = match lookup {
            Ok(Ok(Some(record))) => {
                tracing::debug!(group_id = %group.id, exam_id = %record.id, "Loaded stored exam");
                return AcquiredExam {
                    exam: record.into(),
                    source: ExamSource::Stored,
                };
            }
            Ok(Ok(None)) => FallbackReason::NoExam,
            Ok(Err(err)) => {
                tracing::warn!(group_id = %group.id, error = %err, "Exam lookup failed, using fallback");
                FallbackReason::LookupFailed
            }
            Err(_) => {
                tracing::warn!(
                    group_id = %group.id,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Exam lookup timed out, using fallback"
                );
                FallbackReason::TimedOut
            }
        };

        AcquiredExam {
            exam: Exam::fallback_for(group),
            source: ExamSource::Fallback(reason),
        }
    }
}
