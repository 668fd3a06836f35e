//! Application handlers.
//!
//! Each handler takes its collaborators as `Arc<dyn Port>`, reads what it
//! needs from the store, calls adapters under a timeout and dispatches the
//! outcome back to the store.

pub mod account;
pub mod exam;
pub mod image;
pub mod profile;
pub mod session;
