//! Adapters - implementations of the ports plus the HTTP surface.
//!
//! - `auth` - Supabase GoTrue client and an in-memory backend
//! - `postgres` - `profiles` and `exams` tables over sqlx
//! - `memory` - in-memory repositories for tests and local runs
//! - `ai` - Gemini image editing and its mock
//! - `http` - axum router exposing the application flows

pub mod ai;
pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
