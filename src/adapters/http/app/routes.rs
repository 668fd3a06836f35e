//! HTTP routes for the application endpoints.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use super::handlers::{
    add_question, edit_image, get_app, login, logout, navigate, open_group, publish_draft,
    register, remove_question, set_draft_title, update_profile, AppHandlers,
};

/// Routes mounted under `/api`.
pub fn app_routes(handlers: AppHandlers) -> Router {
    Router::new()
        .route("/app", get(get_app))
        .route("/app/navigate", post(navigate))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/groups/open", post(open_group))
        .route("/draft/title", put(set_draft_title))
        .route("/draft/questions", post(add_question))
        .route("/draft/questions/:id", delete(remove_question))
        .route("/draft/publish", post(publish_draft))
        .route("/profile", patch(update_profile))
        .route("/images/edit", post(edit_image))
        .with_state(handlers)
}
