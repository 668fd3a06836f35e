//! AppStore - the process-wide home of `AppState`.
//!
//! Every change goes through `dispatch`, which applies one event under the
//! lock. The lock is never held across an `.await`: handlers read what they
//! need, release it, call adapters, then dispatch the outcome.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::exam::ExamDraft;
use crate::domain::navigation::{AppEvent, AppState, Screen, View};
use crate::domain::user::User;

/// Mutex-guarded application state.
#[derive(Debug, Default)]
pub struct AppStore {
    state: Mutex<AppState>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one event atomically and returns the view it left the
    /// application on.
    pub fn dispatch(&self, event: AppEvent) -> View {
        let name = event.name();
        let mut state = self.lock();
        let before = state.view();
        *state = std::mem::take(&mut *state).apply(event);
        let after = state.view();

        if before != after {
            tracing::info!(event = name, from = %before, to = %after, "View changed");
        } else {
            tracing::debug!(event = name, view = %after, "Event applied");
        }
        after
    }

    /// A copy of the whole state.
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    /// Renders the current screen.
    pub fn screen(&self) -> Screen {
        self.lock().screen()
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().current_user().cloned()
    }

    /// Runs `f` on the open draft. Returns `None` when no draft is open.
    pub fn with_draft<R>(&self, f: impl FnOnce(&mut ExamDraft) -> R) -> Option<R> {
        self.lock().draft_mut().map(f)
    }
}
