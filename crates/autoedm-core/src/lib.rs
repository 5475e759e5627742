pub mod ai;
pub mod category;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod generation;
pub mod preview;
pub mod state;

// Re-export main types for convenience
pub use ai::{CompletionRequest, CompletionService, OpenAIClient};
pub use category::{CategoryDescriptor, CategoryId, CATEGORIES};
pub use config::Config;
pub use error::{CompletionError, ConfigError, GenerateError, ValidationError};
pub use form::FormInput;
pub use generation::{
    EmailGenerator, GenerationResult, GenerationSession, GenerationSettings, GenerationUpdate,
    RequestState,
};
pub use preview::EmailPreview;
pub use state::{ChatMessage, ChatRole};
