use thiserror::Error;

/// Unified error type for ci-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Version file update failed: {0}")]
    Update(String),

    #[error("Coverage check failed: {0}")]
    Coverage(String),

    #[error("Version resolution failed: {0}")]
    Resolve(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML edit error: {0}")]
    TomlEdit(#[from] toml_edit::TomlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in ci-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create a version file update error with context
    pub fn update(msg: impl Into<String>) -> Self {
        ReleaseError::Update(msg.into())
    }

    /// Create a coverage error with context
    pub fn coverage(msg: impl Into<String>) -> Self {
        ReleaseError::Coverage(msg.into())
    }

    /// Create a version resolution error with context
    pub fn resolve(msg: impl Into<String>) -> Self {
        ReleaseError::Resolve(msg.into())
    }
}
