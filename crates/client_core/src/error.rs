use shared::error::{ApiError, ParseDomainError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,
    #[error("Prompt must not exceed {max} characters (got {actual})")]
    PromptTooLong { max: usize, actual: usize },
    #[error("Image count must be between {min} and {max} (got {count})")]
    CountOutOfRange { count: u8, min: u8, max: u8 },
    #[error(
        "Invalid {field} setting for {model}: {value}, supported options: {}",
        .allowed.join(", ")
    )]
    NotAllowed {
        field: &'static str,
        model: String,
        value: String,
        allowed: Vec<String>,
    },
    #[error("Search query must not be empty")]
    EmptyQuery,
    #[error(transparent)]
    Unparsable(#[from] ParseDomainError),
}

impl ValidationError {
    pub fn not_allowed<T: ToString>(
        field: &'static str,
        model: impl ToString,
        value: impl ToString,
        allowed: &[T],
    ) -> Self {
        Self::NotAllowed {
            field,
            model: model.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to write download: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not available")]
    Missing(&'static str),
}

impl ClientError {
    /// Text suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}
