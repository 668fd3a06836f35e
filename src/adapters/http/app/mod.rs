//! HTTP adapter for the application state machine.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddQuestionRequest, AppSnapshotResponse, EditImageRequest, EditImageResponse, ErrorResponse,
    HealthResponse, LoginRequest, MessageResponse, NavBarResponse, NavigateRequest,
    OpenGroupRequest, OpenGroupResponse, PublishResponse, RegisterRequest, RemoveQuestionResponse,
    SetTitleRequest, UpdateProfileRequest,
};
pub use handlers::{health, AppHandlers};
pub use routes::app_routes;
