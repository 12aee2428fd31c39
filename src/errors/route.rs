//! Route compilation errors.

use crate::pools::Revision;
use crate::route::PoolFamily;
use alloy::primitives::Address;

/// Errors that can occur while compiling a route into calldata
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Route has no viable path")]
    NoViableRoute,

    #[error("Route has no legs to encode")]
    EmptyRoute,

    #[error("Leg token {token} is not traded by pool {pool}")]
    LegPoolMismatch { pool: Address, token: Address },

    #[error("Leg trades through pool {leg_pool}, not pool {pool}")]
    ForeignLegPool { pool: Address, leg_pool: Address },

    #[error("Pool family {family} (pool {pool}) is not supported under revision {revision}")]
    UnsupportedPoolForRevision {
        family: PoolFamily,
        pool: Address,
        revision: Revision,
    },

    #[error("Flow fraction must be in (0, 1], got {fraction}")]
    InvalidFlowFraction { fraction: f64 },

    #[error("Slippage must be at most 10000 bps, got {bps}")]
    InvalidSlippage { bps: u64 },
}
