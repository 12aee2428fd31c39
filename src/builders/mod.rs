//! Builder patterns for complex object construction.
//!
//! - **`RegistryBuilder`**: wires a `PoolEncoderRegistry` family by family
//! - **`MultiRouteBuilder`**: assembles a `MultiRoute` leg by leg, mostly for
//!   tests and demos that do not go through the JSON wire form
//!
//! Builders consume themselves and validate in `build`, returning `Result<T>`.

pub mod registry;
pub mod route;

pub use registry::RegistryBuilder;
pub use route::MultiRouteBuilder;
