//! Image editing adapters.
//!
//! Implementations of the ImageEditor port:
//!
//! - `GeminiImageEditor` - Gemini `generateContent` over REST
//! - `MockImageEditor` - Configurable mock for testing

mod gemini_image_editor;
mod mock_image_editor;

pub use gemini_image_editor::{GeminiConfig, GeminiImageEditor};
pub use mock_image_editor::MockImageEditor;
