// Chat-completion API client module

mod client;

pub use client::OpenAiClient;
