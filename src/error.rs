// file: src/error.rs
// version: 2.2.0
// guid: 57b83a63-07b6-4534-aa6c-51e8797254e0

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, WelcomeError>;

/// Error types for the AMD-R welcome flow
#[derive(Error, Debug)]
pub enum WelcomeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed server address: {0}")]
    MalformedTarget(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Key generation error: {0}")]
    Key(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("System error: {0}")]
    System(String),
}

/// Coarse classification used by the registration workflow to pick a
/// recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Transport,
    MalformedTarget,
    VerificationPending,
    UnexpectedResponse,
    Io,
    Config,
    Key,
    Serialization,
    System,
}

impl WelcomeError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new malformed target error
    pub fn malformed_target(msg: impl Into<String>) -> Self {
        Self::MalformedTarget(msg.into())
    }

    /// Create a new unexpected response error
    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// Create a new key generation error
    pub fn key(msg: impl Into<String>) -> Self {
        Self::Key(msg.into())
    }

    /// Create a new system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::MalformedTarget(_) => ErrorKind::MalformedTarget,
            Self::UnexpectedResponse(_) => ErrorKind::UnexpectedResponse,
            Self::Key(_) => ErrorKind::Key,
            Self::Serialization(_) | Self::Yaml(_) | Self::Toml(_) => ErrorKind::Serialization,
            Self::System(_) => ErrorKind::System,
        }
    }

    /// Whether the bounded retry policy applies to this error
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl From<reqwest::Error> for WelcomeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::MalformedTarget(err.to_string())
        } else if err.is_decode() {
            Self::UnexpectedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for WelcomeError {
    fn from(err: url::ParseError) -> Self {
        Self::MalformedTarget(err.to_string())
    }
}
