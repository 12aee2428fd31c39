//! Pool encoder registry errors.

use crate::route::PoolFamily;
use alloy::primitives::Address;

/// Errors that can occur while wiring or resolving pool encoders
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Pool family {family} is already registered")]
    DuplicateFamily { family: PoolFamily },

    #[error("No encoder registered for pool family {family} (pool {pool})")]
    UnknownPoolFamily { family: PoolFamily, pool: Address },

    #[error("Pool {pool} appears with conflicting metadata in one route")]
    ConflictingPool { pool: Address },

    #[error("Pool {pool} has an invalid shape for family {family}: {reason}")]
    InvalidPoolShape {
        family: PoolFamily,
        pool: Address,
        reason: String,
    },
}
