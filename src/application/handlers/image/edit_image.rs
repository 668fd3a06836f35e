//! EditImageHandler - forwards an image edit to the generative model.
//!
//! Single attempt; model errors are returned as they are. `Ok(None)` means
//! the model answered without an image.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::application::errors::FlowError;
use crate::application::store::AppStore;
use crate::ports::{ImageEditError, ImageEditRequest, ImageEditor};

/// Handler for image edits.
pub struct EditImageHandler {
    editor: Arc<dyn ImageEditor>,
    store: Arc<AppStore>,
    call_timeout: Duration,
}

impl EditImageHandler {
    pub fn new(editor: Arc<dyn ImageEditor>, store: Arc<AppStore>, call_timeout: Duration) -> Self {
        Self {
            editor,
            store,
            call_timeout,
        }
    }

    pub async fn handle(&self, request: ImageEditRequest) -> Result<Option<String>, FlowError> {
        if self.store.current_user().is_none() {
            return Err(FlowError::NotSignedIn);
        }
        request.validate()?;

        let edited = timeout(self.call_timeout, self.editor.edit_image(&request))
            .await
            .map_err(|_| ImageEditError::Timeout {
                timeout_secs: self.call_timeout.as_secs(),
            })??;

        if edited.is_none() {
            tracing::warn!("Image edit returned no image");
        }
        Ok(edited)
    }
}
