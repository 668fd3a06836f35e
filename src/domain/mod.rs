//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, errors, timestamps, auth session)
//! - `user` - The signed-in user and their profile row
//! - `group` - Study groups, read-only to the exam flows
//! - `exam` - Questions, exams, fallback synthesis and the authoring draft
//! - `navigation` - Views, application state and its transitions

pub mod exam;
pub mod foundation;
pub mod group;
pub mod navigation;
pub mod user;
