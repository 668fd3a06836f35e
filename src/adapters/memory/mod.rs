//! In-memory repositories for tests and running without a database.

mod exam_repository;
mod profile_repository;

pub use exam_repository::InMemoryExamRepository;
pub use profile_repository::InMemoryProfileRepository;
