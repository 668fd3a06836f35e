//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AuthBackend` - Hosted auth: sessions, change notifications, sign-in
//! - `ProfileRepository` - The `profiles` table
//! - `ExamRepository` - The `exams` table
//! - `ImageEditor` - Generative image editing

mod auth_backend;
mod exam_repository;
mod image_editor;
mod profile_repository;

pub use auth_backend::{AuthBackend, AuthStateStream, SignUpRequest};
pub use exam_repository::ExamRepository;
pub use image_editor::{ImageEditError, ImageEditRequest, ImageEditor};
pub use profile_repository::ProfileRepository;
