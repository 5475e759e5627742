use thiserror::Error;

/// Message shown for any failed completion call. The cause goes to the log.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate email copy. Please check your API key and try again.";

/// Input problems caught before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a favorite category")]
    MissingCategory,

    #[error("Email copy is already being generated")]
    AlreadyGenerating,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No API key configured")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Failed(#[source] CompletionError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}
