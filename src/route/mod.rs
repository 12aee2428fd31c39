//! Finished routes handed over by the route optimizer.
//!
//! A `MultiRoute` is an ordered list of `RouteLeg`s in execution order. The
//! optimizer guarantees that legs chain economically from the route's input
//! token to its output token; the compiler only checks what it needs to
//! encode each leg correctly.
//!
//! # Swap Direction
//!
//! Every leg has an orientation (`zero_for_one`):
//! - `true`: the leg sells the pool's canonical `token0`
//! - `false`: the leg sells any other pool token
//!
//! Orientation is derived from token addresses, never stored, so it cannot
//! drift from the leg's declared tokens.

pub mod pool;
pub mod wire;

pub use pool::{Pool, PoolFamily, PoolKind};
pub use wire::{CompiledRouteDto, EncodedLegDto, LegDto, PoolDto, RouteDto, TokenDto};

use crate::errors::RouteError;
use crate::RouteResult;
use alloy::primitives::Address;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Basis-point denominator for slippage calculations.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// An asset identified by its chain address.
///
/// Equality and hashing use the address only.
#[derive(Debug, Clone)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub symbol: Option<String>,
}

impl Token {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{} ({})", symbol, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Outcome of route optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteStatus {
    Success,
    Partial,
    /// No viable path exists. Such routes are never encoded.
    NoWay,
}

/// One hop of a route, trading `token_from` for `token_to` through one pool.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    token_from: Token,
    token_to: Token,
    pool: Arc<Pool>,
    flow_fraction: f64,
}

impl RouteLeg {
    /// Create a leg.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::InvalidFlowFraction` unless `0 < flow_fraction <= 1`.
    pub fn new(
        token_from: Token,
        token_to: Token,
        pool: Arc<Pool>,
        flow_fraction: f64,
    ) -> RouteResult<Self> {
        if !(flow_fraction > 0.0 && flow_fraction <= 1.0) {
            return Err(RouteError::InvalidFlowFraction {
                fraction: flow_fraction,
            });
        }

        Ok(Self {
            token_from,
            token_to,
            pool,
            flow_fraction,
        })
    }

    pub fn token_from(&self) -> &Token {
        &self.token_from
    }

    pub fn token_to(&self) -> &Token {
        &self.token_to
    }

    pub fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    /// Portion of the incoming amount at this leg routed through this pool.
    pub fn flow_fraction(&self) -> f64 {
        self.flow_fraction
    }

    /// Whether the leg splits its input with sibling legs.
    pub fn is_partial_flow(&self) -> bool {
        self.flow_fraction < 1.0
    }

    /// Positions of the leg's source and destination tokens in its own pool.
    pub fn token_indices(&self) -> RouteResult<(usize, usize)> {
        self.token_indices_in(&self.pool)
    }

    /// Positions of the leg's source and destination tokens in `pool`.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::LegPoolMismatch` if either token is not traded by
    /// `pool`, or if both resolve to the same pool token.
    pub fn token_indices_in(&self, pool: &Pool) -> RouteResult<(usize, usize)> {
        let mismatch = |token: &Token| RouteError::LegPoolMismatch {
            pool: pool.address,
            token: token.address,
        };

        let from = pool
            .token_index(&self.token_from.address)
            .ok_or_else(|| mismatch(&self.token_from))?;
        let to = pool
            .token_index(&self.token_to.address)
            .ok_or_else(|| mismatch(&self.token_to))?;

        if from == to {
            return Err(mismatch(&self.token_to));
        }

        Ok((from, to))
    }

    /// Orientation flag: true when the leg sells the pool's `token0`.
    pub fn zero_for_one(&self) -> RouteResult<bool> {
        let (from, _) = self.token_indices()?;
        Ok(from == 0)
    }
}

/// A finished route as produced by the route optimizer.
#[derive(Debug, Clone)]
pub struct MultiRoute {
    pub status: RouteStatus,
    /// Legs in execution order
    pub legs: Vec<RouteLeg>,
    pub token_in: Token,
    pub token_out: Token,
    pub amount_in: BigUint,
    pub amount_out: BigUint,
}

impl MultiRoute {
    pub fn new(
        status: RouteStatus,
        legs: Vec<RouteLeg>,
        token_in: Token,
        token_out: Token,
        amount_in: BigUint,
        amount_out: BigUint,
    ) -> Self {
        Self {
            status,
            legs,
            token_in,
            token_out,
            amount_in,
            amount_out,
        }
    }

    /// A route for which the optimizer found no path.
    pub fn no_way(token_in: Token, token_out: Token, amount_in: BigUint) -> Self {
        Self::new(
            RouteStatus::NoWay,
            Vec::new(),
            token_in,
            token_out,
            amount_in,
            BigUint::zero(),
        )
    }

    pub fn is_viable(&self) -> bool {
        self.status != RouteStatus::NoWay
    }

    /// Whether the output of the leg at `index` is consumed by a later leg.
    pub fn feeds_later_leg(&self, index: usize) -> bool {
        let Some(leg) = self.legs.get(index) else {
            return false;
        };

        self.legs
            .iter()
            .skip(index + 1)
            .any(|later| later.token_from == leg.token_to)
    }

    /// Minimum acceptable output after applying `slippage_bps`.
    ///
    /// `min_out = amount_out - amount_out * slippage_bps / 10000`, floored at 1
    /// when the subtraction would not leave a positive amount.
    pub fn min_amount_out(&self, slippage_bps: u64) -> RouteResult<BigUint> {
        if slippage_bps > BPS_DENOMINATOR {
            return Err(RouteError::InvalidSlippage { bps: slippage_bps });
        }

        let slippage_amount = &self.amount_out * slippage_bps / BPS_DENOMINATOR;
        let min_out = if self.amount_out > slippage_amount {
            &self.amount_out - &slippage_amount
        } else {
            BigUint::from(1_u32)
        };

        tracing::debug!(
            amount_out = %self.amount_out,
            slippage_bps = slippage_bps,
            slippage_amount = %slippage_amount,
            min_out = %min_out,
            "Calculated slippage-adjusted minimum output"
        );

        Ok(min_out)
    }
}
