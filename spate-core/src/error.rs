use std::fmt;

/// Result type alias for spate core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for spate core operations
#[derive(Debug)]
pub enum Error {
    /// Invalid profile or plan parameters, detected at construction
    Config(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
