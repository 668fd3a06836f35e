//! Session handlers: startup bootstrap and the notification watcher.

mod bootstrap;
mod watcher;

pub use bootstrap::{BootstrapOutcome, SessionBootstrapHandler};
pub use watcher::SessionWatcher;
