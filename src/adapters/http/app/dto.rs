//! HTTP DTOs for the application endpoints.
//!
//! Requests are parsed into these types and turned into application
//! commands; every state-changing endpoint answers with a fresh
//! [`AppSnapshotResponse`] so the browser can re-render.

use serde::{Deserialize, Serialize};

use crate::application::{AcquiredExam, AddQuestionCommand, ExamSource, FlowError};
use crate::domain::exam::ExamRecord;
use crate::domain::foundation::{ErrorCode, StateMachine};
use crate::domain::group::Group;
use crate::domain::navigation::{AppState, Notice, Screen, View};
use crate::domain::user::{ProfileUpdate, User};
use crate::ports::ImageEditRequest;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Router events a browser may trigger directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", content = "view", rename_all = "snake_case")]
pub enum NavigateRequest {
    Back,
    Groups,
    Profile,
    Register,
    Login,
    DismissNotice,
    Navigate(View),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenGroupRequest {
    pub group: Group,
    #[serde(default)]
    pub manage: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetTitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionRequest {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

impl From<AddQuestionRequest> for AddQuestionCommand {
    fn from(req: AddQuestionRequest) -> Self {
        Self {
            text: req.text,
            options: req.options,
            correct_option: req.correct_option,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username,
            avatar_url: req.avatar_url,
        }
    }
}

/// Image to edit. `image` is raw base64 or a `data:<mime>;base64,` URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    pub image: String,
    pub mime_type: Option<String>,
    pub prompt: String,
}

impl From<EditImageRequest> for ImageEditRequest {
    fn from(req: EditImageRequest) -> Self {
        let (mime_from_url, payload) = split_data_url(&req.image);
        let mime_type = req
            .mime_type
            .or(mime_from_url)
            .unwrap_or_else(|| "image/png".to_string());
        ImageEditRequest::new(payload, mime_type, req.prompt)
    }
}

fn split_data_url(image: &str) -> (Option<String>, String) {
    let Some(rest) = image.strip_prefix("data:") else {
        return (None, image.to_string());
    };
    match rest.split_once(";base64,") {
        Some((mime, payload)) => (Some(mime.to_string()), payload.to_string()),
        None => (None, image.to_string()),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Header bar shown on every signed-in screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavBarResponse {
    pub username: String,
    pub avatar: String,
    pub is_admin: bool,
    pub is_verified: bool,
}

impl From<&User> for NavBarResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            avatar: user.avatar_or_default(),
            is_admin: user.is_admin(),
            is_verified: user.is_verified,
        }
    }
}

/// Everything the browser needs to render the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshotResponse {
    pub view: View,
    pub screen: Screen,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_bar: Option<NavBarResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub available_views: Vec<View>,
}

impl From<&AppState> for AppSnapshotResponse {
    fn from(state: &AppState) -> Self {
        let screen = state.screen();
        let available_views = if screen.is_public() {
            Vec::new()
        } else {
            state.view().valid_transitions()
        };
        Self {
            view: state.view(),
            nav_bar: state.current_user().map(NavBarResponse::from),
            notice: state.notice().cloned(),
            available_views,
            screen,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGroupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_source: Option<ExamSource>,
    pub app: AppSnapshotResponse,
}

impl OpenGroupResponse {
    pub fn managing(app: AppSnapshotResponse) -> Self {
        Self {
            exam_source: None,
            app,
        }
    }

    pub fn taking(acquired: &AcquiredExam, app: AppSnapshotResponse) -> Self {
        Self {
            exam_source: Some(acquired.source),
            app,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub exam_id: String,
    pub app: AppSnapshotResponse,
}

impl PublishResponse {
    pub fn new(record: &ExamRecord, app: AppSnapshotResponse) -> Self {
        Self {
            exam_id: record.id.to_string(),
            app,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveQuestionResponse {
    pub removed: bool,
    pub app: AppSnapshotResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditImageResponse {
    /// Base64 of the edited image, absent when the model returned none.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn from_flow(error: &FlowError) -> Self {
        let details = error
            .is_retryable()
            .then(|| serde_json::json!({ "retryable": true }));
        Self {
            code: error.code().to_string(),
            message: error.user_message(),
            details,
        }
    }

    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exam::DraftError;
    use crate::domain::foundation::{GroupId, UserId};
    use crate::domain::navigation::AppEvent;
    use crate::domain::user::UserRole;

    fn admin() -> User {
        User {
            id: UserId::new("u1").unwrap(),
            username: "sara".to_string(),
            role: UserRole::Admin,
            avatar: None,
            is_verified: true,
            joined_groups: Vec::new(),
        }
    }

    #[test]
    fn navigate_request_parses_actions() {
        let back: NavigateRequest = serde_json::from_str(r#"{"action":"back"}"#).unwrap();
        assert_eq!(back, NavigateRequest::Back);

        let nav: NavigateRequest =
            serde_json::from_str(r#"{"action":"navigate","view":"ADMIN_PANEL"}"#).unwrap();
        assert_eq!(nav, NavigateRequest::Navigate(View::AdminPanel));
    }

    #[test]
    fn data_url_supplies_mime_type() {
        let req: ImageEditRequest = EditImageRequest {
            image: "data:image/jpeg;base64,QUJD".to_string(),
            mime_type: None,
            prompt: "add a hat".to_string(),
        }
        .into();
        assert_eq!(req.image_base64, "QUJD");
        assert_eq!(req.mime_type, "image/jpeg");
    }

    #[test]
    fn raw_base64_defaults_to_png() {
        let req: ImageEditRequest = EditImageRequest {
            image: "QUJD".to_string(),
            mime_type: None,
            prompt: "p".to_string(),
        }
        .into();
        assert_eq!(req.image_base64, "QUJD");
        assert_eq!(req.mime_type, "image/png");
    }

    #[test]
    fn anonymous_snapshot_has_no_nav_bar() {
        let state = AppState::new().apply(AppEvent::SessionAbsent);
        let snapshot = AppSnapshotResponse::from(&state);
        assert_eq!(snapshot.screen, Screen::Login);
        assert!(snapshot.nav_bar.is_none());
        assert!(snapshot.available_views.is_empty());
    }

    #[test]
    fn signed_in_snapshot_lists_nav_bar_and_targets() {
        let state = AppState::new().apply(AppEvent::LoggedIn(admin()));
        let snapshot = AppSnapshotResponse::from(&state);
        let nav_bar = snapshot.nav_bar.unwrap();
        assert!(nav_bar.is_admin);
        assert!(nav_bar.avatar.ends_with("seed=sara"));
        assert!(snapshot.available_views.contains(&View::AdminPanel));

        let json = serde_json::to_value(AppSnapshotResponse::from(&state)).unwrap();
        assert_eq!(json["view"], "DASHBOARD");
        assert_eq!(json["screen"]["screen"], "DASHBOARD");
        assert_eq!(json["navBar"]["username"], "sara");
    }

    #[test]
    fn flow_error_body_uses_code_and_user_message() {
        let body = ErrorResponse::from_flow(&FlowError::from(DraftError::NoQuestions));
        assert_eq!(body.code, "VALIDATION_FAILED");
        assert_eq!(body.message, DraftError::NoQuestions.user_message());
        assert!(body.details.is_none());

        let retryable = ErrorResponse::from_flow(&FlowError::timeout("publish"));
        assert_eq!(retryable.details.unwrap()["retryable"], true);
    }

    #[test]
    fn open_group_request_defaults_to_taking() {
        let req: OpenGroupRequest = serde_json::from_str(
            r#"{"group":{"id":"g1","name":"Bio","creatorId":"u2"}}"#,
        )
        .unwrap();
        assert!(!req.manage);
        assert_eq!(req.group.id, GroupId::new("g1").unwrap());
    }
}
