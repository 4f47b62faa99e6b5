//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// No factory registered under this backend name
    #[error("unknown backend kind '{0}' (forgotten register?)")]
    UnknownBackend(String),

    /// No active writer under this name
    #[error("writer '{0}' not found")]
    WriterNotFound(String),

    /// Backend rejected its configuration
    #[error("backend '{backend}' failed to initialize: {message}")]
    BackendInit { backend: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn unknown_backend(name: impl Into<String>) -> Self {
        LoggerError::UnknownBackend(name.into())
    }

    pub fn writer_not_found(name: impl Into<String>) -> Self {
        LoggerError::WriterNotFound(name.into())
    }

    /// Create a backend initialization error
    pub fn backend_init(backend: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::BackendInit {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
