//! Application state and its transition function.
//!
//! `AppState::apply` is the only way the state changes: every event maps
//! the old state to a new one with no side effects. The render function
//! `AppState::screen` reads the state and decides what to show.
//!
//! # Invariants
//!
//! - Without a user the view is LOGIN or REGISTER.
//! - A draft exists only while the view is EXAM_CREATOR.
//! - An active exam exists only while the view is EXAM_TAKER.

use serde::Serialize;

use crate::domain::exam::{Exam, ExamDraft};
use crate::domain::group::Group;
use crate::domain::user::User;

use super::view::View;

const CREATOR_WITHOUT_GROUP: &str = "لم يتم اختيار مجموعة لإنشاء الاختبار.";
const TAKER_WITHOUT_EXAM: &str = "لا يوجد اختبار مفتوح حالياً.";
const ADMIN_ONLY: &str = "هذه الصفحة متاحة للمشرفين فقط.";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A dismissable message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Everything that can happen to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Bootstrap found a session and its profile.
    SessionRestored(User),
    /// Bootstrap finished without a usable session.
    SessionAbsent,
    LoggedIn(User),
    Registered(User),
    SignedOut,
    ShowRegister,
    ShowLogin,
    Navigate(View),
    OpenGroups,
    OpenProfile,
    Back,
    ManageGroup(Group),
    ExamReady(Group, Exam),
    ExamPublished,
    ProfileUpdated(User),
    Notify(Notice),
    DismissNotice,
}

impl AppEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::SessionRestored(_) => "session_restored",
            AppEvent::SessionAbsent => "session_absent",
            AppEvent::LoggedIn(_) => "logged_in",
            AppEvent::Registered(_) => "registered",
            AppEvent::SignedOut => "signed_out",
            AppEvent::ShowRegister => "show_register",
            AppEvent::ShowLogin => "show_login",
            AppEvent::Navigate(_) => "navigate",
            AppEvent::OpenGroups => "open_groups",
            AppEvent::OpenProfile => "open_profile",
            AppEvent::Back => "back",
            AppEvent::ManageGroup(_) => "manage_group",
            AppEvent::ExamReady(..) => "exam_ready",
            AppEvent::ExamPublished => "exam_published",
            AppEvent::ProfileUpdated(_) => "profile_updated",
            AppEvent::Notify(_) => "notify",
            AppEvent::DismissNotice => "dismiss_notice",
        }
    }
}

/// What the UI should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    Loading,
    Login,
    Register,
    Dashboard { user: User },
    Groups { user: User },
    AdminPanel { user: User },
    ExamCreator { group: Group, draft: ExamDraft },
    ExamTaker { exam: Exam, user: User },
    Profile { user: User },
    ImageEditor,
}

impl Screen {
    /// True for screens that can render without a user.
    pub fn is_public(&self) -> bool {
        matches!(self, Screen::Loading | Screen::Login | Screen::Register)
    }
}

/// The single process-wide application state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    view: View,
    current_user: Option<User>,
    selected_group: Option<Group>,
    active_exam: Option<Exam>,
    draft: Option<ExamDraft>,
    loading: bool,
    notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Initial state: LOGIN, no user, loading until bootstrap completes.
    pub fn new() -> Self {
        Self {
            view: View::Login,
            current_user: None,
            selected_group: None,
            active_exam: None,
            draft: None,
            loading: true,
            notice: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn selected_group(&self) -> Option<&Group> {
        self.selected_group.as_ref()
    }

    pub fn active_exam(&self) -> Option<&Exam> {
        self.active_exam.as_ref()
    }

    pub fn draft(&self) -> Option<&ExamDraft> {
        self.draft.as_ref()
    }

    /// Mutable access for authoring operations on the open draft.
    pub fn draft_mut(&mut self) -> Option<&mut ExamDraft> {
        self.draft.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Applies one event and returns the resulting state.
    pub fn apply(mut self, event: AppEvent) -> Self {
        match event {
            AppEvent::SessionRestored(user)
            | AppEvent::LoggedIn(user)
            | AppEvent::Registered(user) => {
                self.loading = false;
                self.sign_in(user);
            }
            AppEvent::SessionAbsent => {
                self.loading = false;
            }
            AppEvent::SignedOut => {
                self.current_user = None;
                self.leave_to(View::Login);
                self.selected_group = None;
            }
            AppEvent::ShowRegister if !self.is_authenticated() => self.view = View::Register,
            AppEvent::ShowLogin if !self.is_authenticated() => self.view = View::Login,
            AppEvent::ShowRegister | AppEvent::ShowLogin => {}
            AppEvent::Notify(notice) => self.notice = Some(notice),
            AppEvent::DismissNotice => self.notice = None,
            _ if !self.is_authenticated() => {}
            AppEvent::Navigate(target) => self.navigate(target),
            AppEvent::OpenGroups => self.navigate(View::Groups),
            AppEvent::OpenProfile => self.navigate(View::Profile),
            AppEvent::Back => self.leave_to(View::Dashboard),
            AppEvent::ManageGroup(group) => {
                self.leave_to(View::Groups);
                self.open_creator(group);
            }
            AppEvent::ExamReady(group, exam) => {
                self.leave_to(View::Groups);
                self.selected_group = Some(group);
                self.active_exam = Some(exam);
                self.view = View::ExamTaker;
            }
            AppEvent::ExamPublished => self.leave_to(View::Dashboard),
            AppEvent::ProfileUpdated(user) => {
                if self.current_user.as_ref().map(|u| &u.id) == Some(&user.id) {
                    self.current_user = Some(user);
                }
            }
        }
        self
    }

    /// Chooses the screen for the current state.
    ///
    /// Guards run here too, so a state that slipped past the reducer still
    /// never renders a screen whose data is missing.
    pub fn screen(&self) -> Screen {
        if self.loading {
            return Screen::Loading;
        }
        let user = match &self.current_user {
            Some(user) => user.clone(),
            None if self.view == View::Register => return Screen::Register,
            None => return Screen::Login,
        };

        match self.view {
            View::Login | View::Register | View::Dashboard => Screen::Dashboard { user },
            View::Groups => Screen::Groups { user },
            View::AdminPanel if user.is_admin() => Screen::AdminPanel { user },
            View::ExamCreator => match (&self.selected_group, &self.draft) {
                (Some(group), Some(draft)) => Screen::ExamCreator {
                    group: group.clone(),
                    draft: draft.clone(),
                },
                _ => Screen::Dashboard { user },
            },
            View::ExamTaker => match &self.active_exam {
                Some(exam) => Screen::ExamTaker {
                    exam: exam.clone(),
                    user,
                },
                None => Screen::Dashboard { user },
            },
            View::Profile => Screen::Profile { user },
            View::ImageEditor => Screen::ImageEditor,
            View::AdminPanel => Screen::Dashboard { user },
        }
    }

    fn sign_in(&mut self, user: User) {
        let same_user = self.current_user.as_ref().map(|u| &u.id) == Some(&user.id);
        self.current_user = Some(user);
        if !same_user || self.view.is_public() {
            self.leave_to(View::Dashboard);
        }
    }

    /// Navigation requested by the user. Exam views with an empty slot
    /// redirect from anywhere; everything else is checked against the view
    /// graph first.
    fn navigate(&mut self, target: View) {
        use crate::domain::foundation::StateMachine;

        if target.is_public() || self.current_user.is_none() {
            return;
        }
        match target {
            View::ExamCreator if self.selected_group.is_none() => {
                return self.redirect(CREATOR_WITHOUT_GROUP)
            }
            View::ExamTaker if self.active_exam.is_none() => {
                return self.redirect(TAKER_WITHOUT_EXAM)
            }
            _ => {}
        }
        if !self.view.can_transition_to(&target) {
            return;
        }
        match target {
            View::ExamCreator => {
                if let Some(group) = self.selected_group.clone() {
                    self.open_creator(group);
                }
            }
            View::ExamTaker => self.view = View::ExamTaker,
            View::AdminPanel if !self.current_user.as_ref().is_some_and(User::is_admin) => {
                self.redirect(ADMIN_ONLY)
            }
            other => self.leave_to(other),
        }
    }

    fn open_creator(&mut self, group: Group) {
        let Some(user) = &self.current_user else {
            return;
        };
        let keep_draft = self.view == View::ExamCreator
            && self.draft.as_ref().map(ExamDraft::group_id) == Some(&group.id);
        if !keep_draft {
            self.draft = Some(ExamDraft::new(group.id.clone(), user.id.clone()));
        }
        self.selected_group = Some(group);
        self.view = View::ExamCreator;
    }

    fn redirect(&mut self, message: &str) {
        self.leave_to(View::Dashboard);
        self.notice = Some(Notice::error(message));
    }

    /// Moves to `target`, dropping per-view state of the view being left.
    fn leave_to(&mut self, target: View) {
        if self.view == View::ExamCreator && target != View::ExamCreator {
            self.draft = None;
        }
        if self.view == View::ExamTaker && target != View::ExamTaker {
            self.active_exam = None;
        }
        self.view = target;
    }
}
