//! Fan-out of session-change notifications.
//!
//! Each `subscribe` call gets its own broadcast receiver wrapped as a
//! stream. Dropping the stream drops the receiver, which is how a
//! subscription is released.

use futures::stream;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::domain::foundation::AuthStateChange;
use crate::ports::AuthStateStream;

const DEFAULT_CAPACITY: usize = 16;

/// Broadcasts auth state changes to every live subscription.
#[derive(Debug, Clone)]
pub struct AuthStateNotifier {
    sender: broadcast::Sender<AuthStateChange>,
}

impl Default for AuthStateNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AuthStateNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Delivers a change to all current subscribers.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, change: AuthStateChange) {
        let delivered = self.sender.send(change).unwrap_or(0);
        tracing::debug!(subscribers = delivered, "Auth state change published");
    }

    /// Opens a new subscription.
    pub fn subscribe(&self) -> AuthStateStream {
        let receiver = self.sender.subscribe();
        Box::pin(stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(change) => return Some((change, receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth subscriber lagged, dropping old changes");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        }))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
