// emopoem - image-to-poem relay over a multimodal completion API

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod openai;
pub mod relay;
pub mod server;
pub mod translation;
pub mod utils;
pub mod vision;
