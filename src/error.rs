use thiserror::Error;

/// Optimizer error types
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("Tokio runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("iteration count must be a positive integer (got {0})")]
    InvalidIterations(u32),

    #[error("No API key found. Set GEMINI_API_KEY environment variable.")]
    MissingApiKey,
}

/// Result type alias for optimizer operations
pub type Result<T> = std::result::Result<T, OptimizerError>;
