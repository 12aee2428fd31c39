//! Liquidity pool metadata consumed by the compiler.
//!
//! Pools arrive from the pool-metadata provider with a stable address, a
//! canonical token ordering and a family. The compiler never refreshes them;
//! a metadata change upstream produces a new `Pool` value.

use super::Token;
use crate::errors::UtilityError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A class of pool implementations sharing one calldata layout.
///
/// The discriminant is the on-wire family tag and is part of the published
/// layout contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolFamily {
    ConstantProduct = 0,
    ConcentratedLiquidity = 1,
    Stable = 2,
    Bridge = 3,
}

impl PoolFamily {
    /// Every family known to this build, in tag order.
    pub const ALL: [PoolFamily; 4] = [
        PoolFamily::ConstantProduct,
        PoolFamily::ConcentratedLiquidity,
        PoolFamily::Stable,
        PoolFamily::Bridge,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoolFamily::ConstantProduct => "constant-product",
            PoolFamily::ConcentratedLiquidity => "concentrated-liquidity",
            PoolFamily::Stable => "stable",
            PoolFamily::Bridge => "bridge",
        }
    }
}

impl fmt::Display for PoolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolFamily {
    type Err = UtilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PoolFamily::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UtilityError::UnknownVariant {
                kind: "pool family",
                input: s.to_string(),
            })
    }
}

/// Family-specific pool parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolKind {
    /// `fee` is a fraction of the input amount, e.g. `0.003`.
    ConstantProduct { fee: f64 },
    ConcentratedLiquidity { fee: f64 },
    Stable { fee: f64 },
    /// Wrap or bridge step delivering the output on `destination_chain_id`.
    Bridge { destination_chain_id: u64 },
}

impl PoolKind {
    pub fn family(&self) -> PoolFamily {
        match self {
            PoolKind::ConstantProduct { .. } => PoolFamily::ConstantProduct,
            PoolKind::ConcentratedLiquidity { .. } => PoolFamily::ConcentratedLiquidity,
            PoolKind::Stable { .. } => PoolFamily::Stable,
            PoolKind::Bridge { .. } => PoolFamily::Bridge,
        }
    }

    pub fn fee(&self) -> Option<f64> {
        match self {
            PoolKind::ConstantProduct { fee }
            | PoolKind::ConcentratedLiquidity { fee }
            | PoolKind::Stable { fee } => Some(*fee),
            PoolKind::Bridge { .. } => None,
        }
    }
}

/// One liquidity pool instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    /// On-chain pool address
    pub address: Address,
    /// Tokens in the pool's canonical order
    pub tokens: Vec<Token>,
    /// Provider label, used only for display
    pub provider: String,
    /// Family and family-specific parameters
    pub kind: PoolKind,
}

impl Pool {
    pub fn new(
        address: Address,
        tokens: Vec<Token>,
        provider: impl Into<String>,
        kind: PoolKind,
    ) -> Self {
        Self {
            address,
            tokens,
            provider: provider.into(),
            kind,
        }
    }

    pub fn family(&self) -> PoolFamily {
        self.kind.family()
    }

    pub fn fee(&self) -> Option<f64> {
        self.kind.fee()
    }

    pub fn token0(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn token1(&self) -> Option<&Token> {
        self.tokens.get(1)
    }

    /// Position of `address` in the canonical token ordering.
    pub fn token_index(&self, address: &Address) -> Option<usize> {
        self.tokens.iter().position(|token| &token.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_family_tags_are_stable() {
        let tags: Vec<u8> = PoolFamily::ALL.iter().map(|family| family.tag()).collect();
        assert_eq!(tags, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_family_parsing() {
        assert_eq!("stable".parse::<PoolFamily>().unwrap(), PoolFamily::Stable);
        assert_eq!(
            "Concentrated-Liquidity".parse::<PoolFamily>().unwrap(),
            PoolFamily::ConcentratedLiquidity
        );
        assert!("curve".parse::<PoolFamily>().is_err());
        assert_eq!(PoolFamily::Bridge.to_string(), "bridge");
    }

    #[test]
    fn test_token_index() {
        let a = Token::new(address!("000000000000000000000000000000000000000a"), 18);
        let b = Token::new(address!("000000000000000000000000000000000000000b"), 6);
        let pool = Pool::new(
            address!("1111111111111111111111111111111111111111"),
            vec![a.clone(), b.clone()],
            "SushiSwap",
            PoolKind::ConstantProduct { fee: 0.003 },
        );

        assert_eq!(pool.token_index(&a.address), Some(0));
        assert_eq!(pool.token_index(&b.address), Some(1));
        assert_eq!(pool.token_index(&Address::ZERO), None);
        assert_eq!(pool.family(), PoolFamily::ConstantProduct);
        assert_eq!(pool.fee(), Some(0.003));
    }
}
