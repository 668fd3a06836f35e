//! Image handlers.

mod edit_image;

pub use edit_image::EditImageHandler;
