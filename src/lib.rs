//! Route Calldata Compiler
//!
//! Turns finished multi-hop swap routes into the compact byte payload executed
//! by an on-chain route-processor contract. A route optimizer decides *where*
//! to trade; this library decides *how to say it* to the executor, byte for
//! byte.
//!
//! # Architecture Overview
//!
//! - **`route`**: Tokens, pools, legs and routes as handed over by the optimizer,
//!   plus their JSON wire form
//! - **`encoding`**: Big-endian byte encoder used for every instruction
//! - **`pools`**: Per-family pool encoders and the revision layouts they emit
//! - **`registry`**: Family-to-encoder registry shared by all compilations
//! - **`compiler`**: Route compiler producing the final payload
//! - **`config`**: Environment-based configuration
//! - **`builders`**: Builder patterns for registries and routes
//! - **`errors`**: Error hierarchy
//! - **`utils`**: Address, amount and chain conversions
//!
//! # Core Concepts
//!
//! - **Pool Family**: A class of pools sharing one instruction layout,
//!   identified on the wire by a one-byte tag
//! - **Revision**: Version of the route-processor instruction layout. Not every
//!   family has a layout under every revision
//! - **Entry Point**: The route-processor contract. The first leg's input is
//!   sent there, and so is every intermediate output consumed by a later leg
//!
//! # Thread Safety
//!
//! Compilation is synchronous and pure. `PoolEncoderRegistry` is immutable once
//! built and `RouteCompiler` can be cloned into any number of threads.

pub mod builders;
pub mod compiler;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod pools;
pub mod registry;
pub mod route;
pub mod utils;

// Re-export the main Result type and error enum for convenience
pub use errors::{CompilerError, Result};

pub use compiler::{CompiledRoute, EncodedLeg, RouteCompiler};
pub use config::CompilerConfig;
pub use pools::Revision;
pub use registry::PoolEncoderRegistry;

// Re-export builder patterns for convenience
pub use builders::{MultiRouteBuilder, RegistryBuilder};

// Module-specific result types for better ergonomics
pub type EncodingResult<T> = std::result::Result<T, errors::EncodingError>;
pub type RouteResult<T> = std::result::Result<T, errors::RouteError>;
pub type RegistryResult<T> = std::result::Result<T, errors::RegistryError>;
