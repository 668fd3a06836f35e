//! StudyGenius - study groups with multiple-choice exams
//!
//! Backend-for-frontend for the study-group platform: the application state
//! machine and its flows (session bootstrap, exam acquisition with fallback,
//! exam authoring, profile and image editing), the ports they call, adapters
//! for Supabase, Postgres and Gemini, and the axum API the browser drives.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
