//! PublishExamHandler - persists the open draft as one exam row.
//!
//! Single attempt. The draft's saving flag is raised before the insert and
//! lowered by `SavingGuard` on every exit path, including timeouts and a
//! cancelled request future.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::domain::exam::ExamRecord;
use crate::domain::foundation::GroupId;
use crate::domain::navigation::{AppEvent, Notice};
use crate::ports::ExamRepository;

const PUBLISHED: &str = "🎉 تم نشر الاختبار بنجاح في المجموعة!";
const PUBLISH_FAILED: &str = "فشل حفظ الاختبار: ";
const UNKNOWN_ERROR: &str = "خطأ غير معروف";

/// Lowers the saving flag of the draft for `group_id` when dropped.
struct SavingGuard<'a> {
    store: &'a AppStore,
    group_id: GroupId,
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.store.with_draft(|draft| {
            if draft.group_id() == &self.group_id {
                draft.finish_publish();
            }
        });
    }
}

/// Handler for publishing the open draft.
pub struct PublishExamHandler {
    store: Arc<AppStore>,
    exams: Arc<dyn ExamRepository>,
    call_timeout: Duration,
}

impl PublishExamHandler {
    pub fn new(
        exams: Arc<dyn ExamRepository>,
        store: Arc<AppStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            exams,
            call_timeout,
        }
    }

    pub async fn handle(&self) -> Result<ExamRecord, FlowError> {
        let new_exam = self
            .store
            .with_draft(|draft| draft.begin_publish())
            .ok_or(FlowError::NoDraft)??;
        let _saving = SavingGuard {
            store: self.store.as_ref(),
            group_id: new_exam.group_id.clone(),
        };

        let inserted = match timeout(self.call_timeout, self.exams.insert(&new_exam)).await {
            Ok(result) => result.map_err(FlowError::from),
            Err(_) => Err(FlowError::timeout("publish")),
        };

        match inserted {
            Ok(record) => {
                tracing::info!(
                    exam_id = %record.id,
                    group_id = %record.group_id,
                    questions = record.questions.len(),
                    "Exam published"
                );
                self.store.dispatch(AppEvent::Notify(Notice::success(PUBLISHED)));
                self.store.dispatch(AppEvent::ExamPublished);
                Ok(record)
            }
            Err(err) => {
                tracing::error!(group_id = %new_exam.group_id, error = %err, "Failed to publish exam");
                let reason = match &err {
                    FlowError::Backend(e) if !e.message.is_empty() => e.message.clone(),
                    FlowError::Backend(_) => UNKNOWN_ERROR.to_string(),
                    other => other.user_message(),
                };
                self.store.dispatch(AppEvent::Notify(Notice::error(format!(
                    "{}{}",
                    PUBLISH_FAILED, reason
                ))));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryExamRepository;
    use crate::domain::exam::{DraftError, NewExam};
    use crate::domain::foundation::{DomainError, ErrorCode, UserId};
    use crate::domain::group::Group;
    use crate::domain::navigation::{NoticeKind, View};
    use crate::domain::user::{User, UserRole};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn slots(a: &str, b: &str) -> [String; 4] {
        [a.to_string(), b.to_string(), String::new(), String::new()]
    }

    fn store_with_draft(title: &str, questions: usize) -> Arc<AppStore> {
        let store = Arc::new(AppStore::new());
        store.dispatch(AppEvent::LoggedIn(User {
            id: UserId::new("u1").unwrap(),
            username: "sara".to_string(),
            role: UserRole::Regular,
            avatar: None,
            is_verified: false,
            joined_groups: Vec::new(),
        }));
        store.dispatch(AppEvent::OpenGroups);
        store.dispatch(AppEvent::ManageGroup(Group::new(
            GroupId::new("g1").unwrap(),
            "Bio 101",
            UserId::new("u9").unwrap(),
        )));
        store
            .with_draft(|draft| {
                draft.set_title(title);
                for i in 0..questions {
                    draft
                        .add_question(format!("Q{}", i), slots("yes", "no"), 0)
                        .unwrap();
                }
            })
            .unwrap();
        store
    }

    /// Records the saving flag seen during the insert, then fails.
    struct ObservingRepository {
        store: Mutex<Option<Arc<AppStore>>>,
        saw_saving: Mutex<Option<bool>>,
    }

    #[async_trait]
    impl ExamRepository for ObservingRepository {
        async fn latest_for_group(
            &self,
            _group_id: &GroupId,
        ) -> Result<Option<ExamRecord>, DomainError> {
            Ok(None)
        }

        async fn insert(&self, _exam: &NewExam) -> Result<ExamRecord, DomainError> {
            let store = self.store.lock().unwrap().clone().unwrap();
            *self.saw_saving.lock().unwrap() = store.with_draft(|d| d.is_saving());
            Err(DomainError::new(ErrorCode::DatabaseError, "permission denied for table exams"))
        }
    }

    #[tokio::test]
    async fn successful_publish_clears_draft_and_returns_to_dashboard() {
        let store = store_with_draft("Midterm", 2);
        let repo = Arc::new(InMemoryExamRepository::new());
        let handler = PublishExamHandler::new(repo.clone(), store.clone(), Duration::from_secs(1));

        let record = handler.handle().await.unwrap();

        assert_eq!(record.title, "Midterm");
        assert_eq!(record.questions.len(), 2);
        assert_eq!(record.creator_id.as_str(), "u1");
        assert_eq!(repo.all().len(), 1);
        let state = store.snapshot();
        assert_eq!(state.view(), View::Dashboard);
        assert!(state.draft().is_none());
        assert_eq!(state.notice().unwrap().message, PUBLISHED);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_without_insert() {
        let store = store_with_draft("  ", 1);
        let repo = Arc::new(InMemoryExamRepository::new());
        let handler = PublishExamHandler::new(repo.clone(), store.clone(), Duration::from_secs(1));

        let err = handler.handle().await.unwrap_err();

        assert!(matches!(err, FlowError::Draft(DraftError::EmptyTitle)));
        assert!(repo.all().is_empty());
        assert!(!store.snapshot().draft().unwrap().is_saving());
    }

    #[tokio::test]
    async fn empty_draft_is_rejected_without_insert() {
        let store = store_with_draft("Midterm", 0);
        let repo = Arc::new(InMemoryExamRepository::new());
        let handler = PublishExamHandler::new(repo.clone(), store, Duration::from_secs(1));

        let err = handler.handle().await.unwrap_err();

        assert!(matches!(err, FlowError::Draft(DraftError::NoQuestions)));
        assert!(repo.all().is_empty());
    }

    #[tokio::test]
    async fn failed_insert_keeps_draft_and_clears_saving() {
        let store = store_with_draft("Midterm", 1);
        let repo = Arc::new(ObservingRepository {
            store: Mutex::new(Some(store.clone())),
            saw_saving: Mutex::new(None),
        });
        let handler = PublishExamHandler::new(repo.clone(), store.clone(), Duration::from_secs(1));

        let err = handler.handle().await.unwrap_err();

        assert!(matches!(err, FlowError::Backend(_)));
        assert_eq!(*repo.saw_saving.lock().unwrap(), Some(true));
        let state = store.snapshot();
        assert_eq!(state.view(), View::ExamCreator);
        let draft = state.draft().unwrap();
        assert!(!draft.is_saving());
        assert_eq!(draft.questions().len(), 1);
        let notice = state.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(
            notice.message,
            "فشل حفظ الاختبار: permission denied for table exams"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_insert_is_retryable_and_clears_saving() {
        let store = store_with_draft("Midterm", 1);
        let repo = Arc::new(InMemoryExamRepository::new().with_delay(Duration::from_secs(60)));
        let handler = PublishExamHandler::new(repo, store.clone(), Duration::from_secs(5));

        let err = handler.handle().await.unwrap_err();

        assert!(err.is_retryable());
        let draft = store.snapshot().draft().cloned().unwrap();
        assert!(!draft.is_saving());
        assert!(draft.can_publish());
    }

    #[tokio::test]
    async fn publish_without_draft_is_rejected() {
        let store = Arc::new(AppStore::new());
        let handler = PublishExamHandler::new(
            Arc::new(InMemoryExamRepository::new()),
            store,
            Duration::from_secs(1),
        );
        assert!(matches!(handler.handle().await, Err(FlowError::NoDraft)));
    }
}
