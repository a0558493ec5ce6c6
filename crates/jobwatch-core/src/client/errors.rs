use crate::errors::JobwatchError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base URL '{url}'")]
    InvalidBaseUrl { url: String },

    #[error("Failed to build HTTP client: {message}")]
    BuildFailed { message: String },

    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("{path} returned HTTP {status}")]
    HttpStatus { path: String, status: u16 },

    #[error("Malformed response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl JobwatchError for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            ClientError::InvalidBaseUrl { .. } => "CLIENT_INVALID_BASE_URL",
            ClientError::BuildFailed { .. } => "CLIENT_BUILD_FAILED",
            ClientError::Transport { .. } => "CLIENT_TRANSPORT_ERROR",
            ClientError::HttpStatus { .. } => "CLIENT_HTTP_STATUS",
            ClientError::Decode { .. } => "CLIENT_DECODE_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ClientError::InvalidBaseUrl { .. })
    }
}
