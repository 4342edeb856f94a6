//! Image validation and inline encoding.
//!
//! Uploaded bytes are checked against the formats the upstream API accepts,
//! then base64-encoded into an inline `data:` reference so the image can travel
//! inside the JSON chat-completion request.
//!
//! # Submodules
//!
//! - `models`: Supported formats and size limits.
//! - `inline`: MIME resolution and data URL construction.

pub mod inline;
pub mod models;

pub use inline::InlineImage;
pub use models::{ImageFormat, MAX_IMAGE_SIZE_BYTES};
