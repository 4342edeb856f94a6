//! Translation between the relay's domain types and the chat-completion API.
//!
//! - `prompt`: the fixed instructions and the strict output schema.
//! - `request`: builds the upstream request around an inline image.
//! - `response`: extracts, defaults and clamps the structured payload.

pub mod prompt;
pub mod request;
pub mod response;

pub use request::build_request;
pub use response::{parse_analysis, parse_payload};
