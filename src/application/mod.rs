//! Application layer - the state store, flow errors and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod errors;
pub mod handlers;
pub mod store;

pub use errors::FlowError;
pub use handlers::account::{
    RegisterCommand, RegisterHandler, SignInCommand, SignInHandler, SignOutHandler,
};
pub use handlers::exam::{
    AcquiredExam, AddQuestionCommand, EditDraftHandler, ExamSource, FallbackReason,
    OpenGroupCommand, OpenGroupHandler, OpenGroupResult, PublishExamHandler,
};
pub use handlers::image::EditImageHandler;
pub use handlers::profile::UpdateProfileHandler;
pub use handlers::session::{BootstrapOutcome, SessionBootstrapHandler, SessionWatcher};
pub use store::AppStore;
