use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The remote record service rejected the call.
    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ListError {
    /// Returns true when the failure came from the remote service rather than from
    /// a misuse of the manager.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Convenience constructor for service implementations.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ListError>;

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
