//! Configuration loading errors.

/// Errors that can occur while loading compiler configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}
