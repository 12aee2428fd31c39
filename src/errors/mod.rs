//! Error handling for the route calldata compiler.
//!
//! Errors are organised per component, with a single top-level enum that
//! every domain error converts into:
//!
//! - **`EncodingError`**: primitive-level violations in the byte encoder
//!   (out-of-range integers, malformed addresses)
//! - **`RouteError`**: route-level refusals (no viable path, leg/pool mismatch,
//!   pool family unsupported under the requested revision)
//! - **`RegistryError`**: configuration gaps in the pool encoder registry
//! - **`UtilityError`**: conversions and parsing helpers
//! - **`ConfigError`**: environment-driven configuration problems
//!
//! Every error is terminal for the compilation that raised it. Compilation is
//! a pure function of its inputs, so nothing is retried internally and no
//! partial payload is ever returned alongside an error.

pub mod config;
pub mod encoding;
pub mod registry;
pub mod route;
pub mod utility;

pub use config::ConfigError;
pub use encoding::EncodingError;
pub use registry::RegistryError;
pub use route::RouteError;
pub use utility::UtilityError;

/// Main result type for the library
pub type Result<T> = std::result::Result<T, CompilerError>;

/// Top-level error enum that encompasses all possible errors in the compiler.
///
/// Callers submitting transactions should treat any variant as "do not
/// submit". A different outcome requires a materially different route.
#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    /// Primitive encoding violation.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The route cannot be encoded as given.
    ///
    /// This includes NoWay routes, legs whose tokens are not traded by their
    /// pool, and pool families with no layout under the requested revision.
    #[error("Route compilation failed: {0}")]
    Route(#[from] RouteError),

    /// Registry wiring or resolution failure.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error in utility functions or type conversions.
    #[error("Utility error: {0}")]
    Utility(#[from] UtilityError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
