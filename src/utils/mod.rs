//! Utility functions and helpers for the relay.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and credential scrubbing.
//! - `retry`: Opt-in retry with backoff for transient upstream failures.

pub mod logging;
pub mod retry;
