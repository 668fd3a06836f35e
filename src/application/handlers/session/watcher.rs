//! SessionWatcher - follows the auth backend's session notifications.
//!
//! The watcher owns the only background task in the application. It holds
//! one subscription for as long as it lives:
//!
//! - `SIGNED_OUT`, or any notification without a session, signs the user
//!   out and forces LOGIN
//! - `SIGNED_IN` re-runs the full bootstrap
//! - anything else is logged and ignored
//!
//! `shutdown` stops the task and releases the subscription. Dropping the
//! watcher aborts the task, which releases it as well.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::application::store::AppStore;
use crate::domain::foundation::{AuthChangeEvent, AuthStateChange};
use crate::domain::navigation::AppEvent;
use crate::ports::{AuthBackend, AuthStateStream};

use super::bootstrap::SessionBootstrapHandler;

/// Handle to the running watcher task.
pub struct SessionWatcher {
    task: Option<JoinHandle<()>>,
    stop: Option<oneshot::Sender<()>>,
}

impl SessionWatcher {
    /// Subscribes immediately and starts following notifications.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        auth: &dyn AuthBackend,
        bootstrap: Arc<SessionBootstrapHandler>,
        store: Arc<AppStore>,
    ) -> Self {
        let changes = auth.subscribe();
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(watch(changes, stopped, bootstrap, store));

        Self {
            task: Some(task),
            stop: Some(stop),
        }
    }

    /// True while the task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the task and waits for it to release the subscription.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Session watcher ended abnormally");
            }
        }
        tracing::debug!("Session watcher stopped");
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn watch(
    mut changes: AuthStateStream,
    mut stopped: oneshot::Receiver<()>,
    bootstrap: Arc<SessionBootstrapHandler>,
    store: Arc<AppStore>,
) {
    loop {
        tokio::select! {
            _ = &mut stopped => break,
            change = changes.next() => match change {
                Some(change) => on_change(change, &bootstrap, &store).await,
                None => {
                    tracing::warn!("Auth notification stream closed");
                    break;
                }
            },
        }
    }
}

async fn on_change(change: AuthStateChange, bootstrap: &SessionBootstrapHandler, store: &AppStore) {
    if change.ends_session() {
        tracing::info!(event = ?change.event, "Session ended");
        store.dispatch(AppEvent::SignedOut);
        return;
    }
    match change.event {
        AuthChangeEvent::SignedIn => {
            bootstrap.handle().await;
        }
        other => tracing::debug!(event = ?other, "Ignoring auth notification"),
    }
}
