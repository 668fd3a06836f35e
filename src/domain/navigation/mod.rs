//! Navigation module - views, application state and the router.
//!
//! - `view` - the nine views and the user-triggered edges between them
//! - `app_state` - state container, events, reducer and screen rendering

mod app_state;
mod view;

pub use app_state::{AppEvent, AppState, Notice, NoticeKind, Screen};
pub use view::View;
