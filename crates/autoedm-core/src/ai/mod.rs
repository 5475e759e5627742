pub mod openai;

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::state::ChatMessage;

pub use openai::OpenAIClient;

/// One chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A text-generation backend. Returns the raw completion text, which may be
/// empty when the service produced no content.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
