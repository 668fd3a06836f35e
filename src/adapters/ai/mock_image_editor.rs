//! Mock image editor for testing.
//!
//! Returns pre-configured results in order, records every request, and can
//! simulate latency for timeout tests.
//!
//! # Example
//!
//! ```ignore
//! let editor = MockImageEditor::new().with_image("ZWRpdGVk");
//! let edited = editor.edit_image(&request).await?;
//! assert_eq!(edited.as_deref(), Some("ZWRpdGVk"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ImageEditError, ImageEditRequest, ImageEditor};

type EditResult = Result<Option<String>, ImageEditError>;

/// Mock image editor.
#[derive(Debug, Clone, Default)]
pub struct MockImageEditor {
    results: Arc<Mutex<VecDeque<EditResult>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<ImageEditRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockImageEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an edited image.
    pub fn with_image(self, base64: impl Into<String>) -> Self {
        lock(&self.results).push_back(Ok(Some(base64.into())));
        self
    }

    /// Queues a response without an image part.
    pub fn with_no_image(self) -> Self {
        lock(&self.results).push_back(Ok(None));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ImageEditError) -> Self {
        lock(&self.results).push_back(Err(error));
        self
    }

    /// Simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<ImageEditRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl ImageEditor for MockImageEditor {
    async fn edit_image(&self, request: &ImageEditRequest) -> EditResult {
        lock(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        lock(&self.results).pop_front().unwrap_or(Ok(None))
    }
}
