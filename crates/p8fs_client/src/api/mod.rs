pub mod client;
pub mod models;
pub mod stream;

pub use client::ChatClient;
pub use models::{ChatCompletionRequest, ChatDelta, ChatMessage};
