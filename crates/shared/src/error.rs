use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported {field}: {value}")]
pub struct ParseDomainError {
    pub field: &'static str,
    pub value: String,
}

impl ParseDomainError {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        let message = body
            .error
            .filter(|error| !error.trim().is_empty())
            .or_else(|| body.message.filter(|message| !message.trim().is_empty()))
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        Self {
            status: Some(status),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_prefer_backend_message() {
        let err = ApiError::from_status(
            403,
            ErrorBody {
                error: Some("admin permission required".into()),
                message: None,
            },
        );
        assert_eq!(err.to_string(), "admin permission required");
        assert_eq!(err.status, Some(403));

        let err = ApiError::from_status(
            429,
            ErrorBody {
                error: Some(" ".into()),
                message: Some("rate limited".into()),
            },
        );
        assert_eq!(err.to_string(), "rate limited");

        let err = ApiError::from_status(502, ErrorBody::default());
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }
}
