mod http;
mod provider;
mod service;
mod types;

pub use http::HttpCompletionProvider;
pub use provider::CompletionProvider;
pub use service::CompletionService;
pub use types::{ChatMessage, CompletionConfig};
