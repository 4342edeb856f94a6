//! Data models for the relay.
//!
//! - `analysis`: the domain types returned to callers (`Emotion`, `AnalysisResult`).
//! - `openai`: wire types for the upstream chat-completion API.

pub mod analysis;
pub mod openai;

pub use analysis::{AnalysisRequest, AnalysisResult, Emotion, DEFAULT_CONFIDENCE};
