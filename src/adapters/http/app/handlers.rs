//! HTTP handlers for the application endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AppStore, EditDraftHandler, EditImageHandler, FlowError, OpenGroupCommand, OpenGroupHandler,
    OpenGroupResult, PublishExamHandler, RegisterCommand, RegisterHandler, SignInCommand,
    SignInHandler, SignOutHandler, UpdateProfileHandler,
};
use crate::domain::exam::DraftError;
use crate::domain::foundation::{AuthError, ErrorCode, QuestionId};
use crate::domain::navigation::AppEvent;

use super::dto::{
    AddQuestionRequest, AppSnapshotResponse, EditImageRequest, EditImageResponse, ErrorResponse,
    HealthResponse, LoginRequest, MessageResponse, NavigateRequest, OpenGroupRequest,
    OpenGroupResponse, PublishResponse, RegisterRequest, RemoveQuestionResponse, SetTitleRequest,
    UpdateProfileRequest,
};

const IMAGE_EDITOR_DISABLED: &str = "خدمة تعديل الصور غير متاحة حالياً.";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AppHandlers {
    store: Arc<AppStore>,
    sign_in: Arc<SignInHandler>,
    register: Arc<RegisterHandler>,
    sign_out: Arc<SignOutHandler>,
    open_group: Arc<OpenGroupHandler>,
    edit_draft: Arc<EditDraftHandler>,
    publish: Arc<PublishExamHandler>,
    update_profile: Arc<UpdateProfileHandler>,
    edit_image: Option<Arc<EditImageHandler>>,
}

impl AppHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<AppStore>,
        sign_in: Arc<SignInHandler>,
        register: Arc<RegisterHandler>,
        sign_out: Arc<SignOutHandler>,
        open_group: Arc<OpenGroupHandler>,
        edit_draft: Arc<EditDraftHandler>,
        publish: Arc<PublishExamHandler>,
        update_profile: Arc<UpdateProfileHandler>,
    ) -> Self {
        Self {
            store,
            sign_in,
            register,
            sign_out,
            open_group,
            edit_draft,
            publish,
            update_profile,
            edit_image: None,
        }
    }

    /// Enables `POST /api/images/edit`.
    pub fn with_image_editor(mut self, handler: Arc<EditImageHandler>) -> Self {
        self.edit_image = Some(handler);
        self
    }

    fn snapshot(&self) -> AppSnapshotResponse {
        AppSnapshotResponse::from(&self.store.snapshot())
    }

    fn snapshot_response(&self, status: StatusCode) -> Response {
        (status, Json(self.snapshot())).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Response {
    (StatusCode::OK, Json(HealthResponse::default())).into_response()
}

/// GET /api/app - Current screen
pub async fn get_app(State(handlers): State<AppHandlers>) -> Response {
    handlers.snapshot_response(StatusCode::OK)
}

/// POST /api/app/navigate - Apply a router event
pub async fn navigate(
    State(handlers): State<AppHandlers>,
    Json(req): Json<NavigateRequest>,
) -> Response {
    let event = match req {
        NavigateRequest::Back => AppEvent::Back,
        NavigateRequest::Groups => AppEvent::OpenGroups,
        NavigateRequest::Profile => AppEvent::OpenProfile,
        NavigateRequest::Register => AppEvent::ShowRegister,
        NavigateRequest::Login => AppEvent::ShowLogin,
        NavigateRequest::DismissNotice => AppEvent::DismissNotice,
        NavigateRequest::Navigate(view) => AppEvent::Navigate(view),
    };
    handlers.store.dispatch(event);
    handlers.snapshot_response(StatusCode::OK)
}

/// POST /api/auth/login
pub async fn login(State(handlers): State<AppHandlers>, Json(req): Json<LoginRequest>) -> Response {
    let cmd = SignInCommand {
        email: req.email,
        password: req.password,
    };

    match handlers.sign_in.handle(cmd).await {
        Ok(_) => handlers.snapshot_response(StatusCode::OK),
        Err(e) => handle_flow_error(e),
    }
}

/// POST /api/auth/register
pub async fn register(
    State(handlers): State<AppHandlers>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let cmd = RegisterCommand {
        email: req.email,
        password: req.password,
        username: req.username,
    };

    match handlers.register.handle(cmd).await {
        Ok(_) => handlers.snapshot_response(StatusCode::CREATED),
        Err(FlowError::Auth(AuthError::ConfirmationRequired)) => {
            let response = MessageResponse {
                message: AuthError::ConfirmationRequired.user_message(),
            };
            (StatusCode::ACCEPTED, Json(response)).into_response()
        }
        Err(e) => handle_flow_error(e),
    }
}

/// POST /api/auth/logout
///
/// Local state is cleared even when the backend call fails.
pub async fn logout(State(handlers): State<AppHandlers>) -> Response {
    if let Err(e) = handlers.sign_out.handle().await {
        tracing::warn!(error = %e, "Backend sign-out failed; signed out locally");
    }
    handlers.snapshot_response(StatusCode::OK)
}

/// POST /api/groups/open - Take or manage a group's exam
pub async fn open_group(
    State(handlers): State<AppHandlers>,
    Json(req): Json<OpenGroupRequest>,
) -> Response {
    let cmd = OpenGroupCommand {
        group: req.group,
        manage: req.manage,
    };

    match handlers.open_group.handle(cmd).await {
        Ok(OpenGroupResult::Managing) => {
            let response = OpenGroupResponse::managing(handlers.snapshot());
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(OpenGroupResult::Taking(acquired)) => {
            let response = OpenGroupResponse::taking(&acquired, handlers.snapshot());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_flow_error(e),
    }
}

/// PUT /api/draft/title
pub async fn set_draft_title(
    State(handlers): State<AppHandlers>,
    Json(req): Json<SetTitleRequest>,
) -> Response {
    match handlers.edit_draft.set_title(req.title) {
        Ok(_) => handlers.snapshot_response(StatusCode::OK),
        Err(e) => handle_flow_error(e),
    }
}

/// POST /api/draft/questions
pub async fn add_question(
    State(handlers): State<AppHandlers>,
    Json(req): Json<AddQuestionRequest>,
) -> Response {
    match handlers.edit_draft.add_question(req.into()) {
        Ok(_) => handlers.snapshot_response(StatusCode::CREATED),
        Err(e) => handle_flow_error(e),
    }
}

/// DELETE /api/draft/questions/:id
pub async fn remove_question(
    State(handlers): State<AppHandlers>,
    Path(question_id): Path<String>,
) -> Response {
    let question_id = match QuestionId::new(question_id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid question ID")),
            )
                .into_response()
        }
    };

    match handlers.edit_draft.remove_question(&question_id) {
        Ok(removed) => {
            let response = RemoveQuestionResponse {
                removed,
                app: handlers.snapshot(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_flow_error(e),
    }
}

/// POST /api/draft/publish
pub async fn publish_draft(State(handlers): State<AppHandlers>) -> Response {
    match handlers.publish.handle().await {
        Ok(record) => {
            let response = PublishResponse::new(&record, handlers.snapshot());
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_flow_error(e),
    }
}

/// PATCH /api/profile
pub async fn update_profile(
    State(handlers): State<AppHandlers>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    match handlers.update_profile.handle(req.into()).await {
        Ok(_) => handlers.snapshot_response(StatusCode::OK),
        Err(e) => handle_flow_error(e),
    }
}

/// POST /api/images/edit
pub async fn edit_image(
    State(handlers): State<AppHandlers>,
    Json(req): Json<EditImageRequest>,
) -> Response {
    let Some(editor) = handlers.edit_image.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::unavailable(IMAGE_EDITOR_DISABLED)),
        )
            .into_response();
    };

    match editor.handle(req.into()).await {
        Ok(image) => (StatusCode::OK, Json(EditImageResponse { image })).into_response(),
        Err(e) => handle_flow_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn status_for(error: &FlowError) -> StatusCode {
    if let FlowError::Draft(DraftError::PublishInProgress) = error {
        return StatusCode::CONFLICT;
    }
    match error.code() {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::ProfileNotFound | ErrorCode::ExamNotFound => StatusCode::NOT_FOUND,
        ErrorCode::AuthServiceError | ErrorCode::ImageServiceError => StatusCode::BAD_GATEWAY,
        ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::DatabaseError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::DataIntegrity | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_flow_error(error: FlowError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "Request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Request rejected");
    }
    (status, Json(ErrorResponse::from_flow(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ValidationError};
    use crate::ports::ImageEditError;

    #[test]
    fn validation_errors_map_to_400() {
        let response = handle_flow_error(FlowError::from(DraftError::EmptyTitle));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = handle_flow_error(FlowError::from(ValidationError::empty_field("email")));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn signed_out_maps_to_401() {
        assert_eq!(
            handle_flow_error(FlowError::NotSignedIn).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            handle_flow_error(FlowError::from(AuthError::InvalidCredentials)).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn concurrent_publish_maps_to_409() {
        let response = handle_flow_error(FlowError::from(DraftError::PublishInProgress));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        assert_eq!(
            status_for(&FlowError::timeout("publish")),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&FlowError::from(ImageEditError::AuthenticationFailed)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&FlowError::from(DomainError::database("connection reset"))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
