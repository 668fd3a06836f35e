//! Profile handlers.

mod update_profile;

pub use update_profile::UpdateProfileHandler;
