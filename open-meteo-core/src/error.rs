use thiserror::Error;

/// Every failure a fetch can end in.
///
/// The variants keep transport failures, API-level failures and
/// response-shape failures apart so callers can react to each differently.
#[derive(Debug, Error)]
pub enum OpenMeteoError {
    /// The request never produced an HTTP response (DNS, TLS, refused
    /// connection, timeout).
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The API answered, but with an error status or a payload that is not a
    /// JSON object.
    #[error("API error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
        body: String,
    },

    /// The JSON object does not have the shape of the expected response.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The client configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl OpenMeteoError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status of an [`OpenMeteoError::Api`] failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body of an [`OpenMeteoError::Api`] failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OpenMeteoError>;
