use crate::client::ClientError;
use crate::errors::JobwatchError;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{message}")]
    Rejected { message: String },

    #[error("Request failed: {source}")]
    Client {
        #[from]
        source: ClientError,
    },
}

impl JobwatchError for ActionError {
    fn error_code(&self) -> &'static str {
        match self {
            ActionError::Rejected { .. } => "ACTION_REJECTED",
            ActionError::Client { .. } => "ACTION_CLIENT_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ActionError::Rejected { .. })
    }
}
