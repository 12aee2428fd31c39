//! Per-family pool encoders.
//!
//! Each pool instance used in a route gets one `PoolEncoder`, built around a
//! shared `PoolDescriptor` (the pool plus the execution engine's entry point).
//! An encoder turns a leg through its pool into instruction bytes for a given
//! contract revision, or reports that its family has no layout under that
//! revision.
//!
//! # Revision V2 Layout
//!
//! Every family starts with the same 42-byte header:
//!
//! | bytes   | field                                   |
//! |---------|-----------------------------------------|
//! | 0       | family tag                              |
//! | 1..=20  | pool address                            |
//! | 21      | orientation (`0x01` if selling token0)  |
//! | 22..=41 | recipient of the leg's output           |
//!
//! followed by family-specific trailing fields. Revision V1 predates most
//! families; only constant-product pools have a V1 layout.
//!
//! Byte layouts are a published contract with the on-chain executor. A layout
//! change requires a new `Revision`, never a reinterpretation of an existing one.

pub mod bridge;
pub mod concentrated;
pub mod constant_product;
pub mod stable;

pub use bridge::BridgeEncoder;
pub use concentrated::ConcentratedLiquidityEncoder;
pub use constant_product::ConstantProductEncoder;
pub use stable::StableEncoder;

use crate::encoding::ByteEncoder;
use crate::errors::{RegistryError, Result, RouteError, UtilityError};
use crate::route::{MultiRoute, Pool, PoolFamily, RouteLeg};
use crate::{RegistryResult, RouteResult};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// Length of the V2 header shared by every family.
pub const V2_HEADER_LEN: usize = 1 + 20 + 1 + 20;

/// Revision of the route-processor instruction layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Legacy layout
    V1,
    /// Current layout
    V2,
}

impl Default for Revision {
    fn default() -> Self {
        Revision::V2
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::V1 => f.write_str("v1"),
            Revision::V2 => f.write_str("v2"),
        }
    }
}

impl FromStr for Revision {
    type Err = UtilityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Revision::V1),
            "v2" | "2" => Ok(Revision::V2),
            _ => Err(UtilityError::UnknownVariant {
                kind: "revision",
                input: s.to_string(),
            }),
        }
    }
}

/// Result of asking an encoder for a leg's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegEncoding {
    Supported(Vec<u8>),
    /// The family has no layout under the requested revision. The optimizer
    /// must not select such pools when targeting that revision.
    Unsupported,
}

impl LegEncoding {
    pub fn is_supported(&self) -> bool {
        matches!(self, LegEncoding::Supported(_))
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            LegEncoding::Supported(bytes) => Some(bytes),
            LegEncoding::Unsupported => None,
        }
    }
}

/// State shared by every family encoder: the pool, the entry point and,
/// when known, the chain the route executes on.
#[derive(Debug, Clone)]
pub struct PoolDescriptor {
    pool: Arc<Pool>,
    entry_point: Address,
    chain_id: Option<u64>,
}

impl PoolDescriptor {
    pub fn new(pool: Arc<Pool>, entry_point: Address) -> Self {
        Self {
            pool,
            entry_point,
            chain_id: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Chain the route executes on, if the registry was configured with one.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    /// Fail with `InvalidPoolShape` unless the pool belongs to `family`.
    pub(crate) fn expect_family(&self, family: PoolFamily) -> RegistryResult<()> {
        if self.pool.family() == family {
            Ok(())
        } else {
            Err(self.invalid_shape(format!("pool is a {} pool", self.pool.family())))
        }
    }

    /// Fail with `InvalidPoolShape` unless the pool token count is within `range`.
    pub(crate) fn expect_token_count(
        &self,
        range: std::ops::RangeInclusive<usize>,
    ) -> RegistryResult<()> {
        let count = self.pool.tokens.len();
        if range.contains(&count) {
            Ok(())
        } else {
            Err(self.invalid_shape(format!(
                "expected {}..={} tokens, got {}",
                range.start(),
                range.end(),
                count
            )))
        }
    }

    pub(crate) fn invalid_shape(&self, reason: String) -> RegistryError {
        RegistryError::InvalidPoolShape {
            family: self.pool.family(),
            pool: self.pool.address,
            reason,
        }
    }
}

/// Encodes legs through one pool instance.
///
/// Encoding is pure: identical `(leg, route, recipient, revision)` always
/// produce identical bytes.
pub trait PoolEncoder: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &PoolDescriptor;

    fn pool(&self) -> &Pool {
        self.descriptor().pool()
    }

    fn family(&self) -> PoolFamily {
        self.pool().family()
    }

    /// Address the first leg of any route transfers input funds to.
    fn entry_point(&self) -> Address {
        self.descriptor().entry_point()
    }

    /// Display name, e.g. `"SushiSwap 0.3%"`. Not used in encoding.
    fn name(&self) -> String {
        match self.pool().fee() {
            Some(fee) => fee_label(&self.pool().provider, fee),
            None => format!("{} {}", self.pool().provider, self.family()),
        }
    }

    /// Source and destination token positions of `leg` in this encoder's pool.
    fn token_indices(&self, leg: &RouteLeg) -> Result<(usize, usize)> {
        Ok(leg_token_indices(self.pool(), leg)?)
    }

    /// Orientation flag of `leg` against this encoder's pool.
    fn zero_for_one(&self, leg: &RouteLeg) -> Result<bool> {
        let (from, _) = self.token_indices(leg)?;
        Ok(from == 0)
    }

    fn encode_v1(
        &self,
        leg: &RouteLeg,
        route: &MultiRoute,
        recipient: Address,
    ) -> Result<LegEncoding>;

    fn encode_v2(
        &self,
        leg: &RouteLeg,
        route: &MultiRoute,
        recipient: Address,
    ) -> Result<LegEncoding>;

    fn encode(
        &self,
        revision: Revision,
        leg: &RouteLeg,
        route: &MultiRoute,
        recipient: Address,
    ) -> Result<LegEncoding> {
        match revision {
            Revision::V1 => self.encode_v1(leg, route, recipient),
            Revision::V2 => self.encode_v2(leg, route, recipient),
        }
    }
}

/// Token positions of `leg` in `pool`.
///
/// A leg routed through a different pool is rejected with
/// `RouteError::ForeignLegPool`, even when it shares an address with `pool`.
pub(crate) fn leg_token_indices(pool: &Pool, leg: &RouteLeg) -> RouteResult<(usize, usize)> {
    if leg.pool().as_ref() != pool {
        return Err(RouteError::ForeignLegPool {
            pool: pool.address,
            leg_pool: leg.pool().address,
        });
    }
    leg.token_indices_in(pool)
}

/// Write the V2 header: family tag, pool, orientation, recipient.
pub(crate) fn encode_v2_header(
    encoder: &mut ByteEncoder,
    pool: &Pool,
    zero_for_one: bool,
    recipient: Address,
) -> Result<()> {
    encoder
        .append_uint8(pool.family().tag())?
        .append_address(pool.address.as_slice())?
        .append_bool(zero_for_one)
        .append_address(recipient.as_slice())?;
    Ok(())
}

/// `"{provider} {fee * 100}%"`, with float noise rounded away.
fn fee_label(provider: &str, fee: f64) -> String {
    let percent = (fee * 100.0 * 10_000.0).round() / 10_000.0;
    format!("{} {}%", provider, percent)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::route::PoolKind;

    #[test]
    fn test_revision_parsing() {
        assert_eq!("v1".parse::<Revision>().unwrap(), Revision::V1);
        assert_eq!("V2".parse::<Revision>().unwrap(), Revision::V2);
        assert_eq!("2".parse::<Revision>().unwrap(), Revision::V2);
        assert!("v3".parse::<Revision>().is_err());
        assert_eq!(Revision::default(), Revision::V2);
        assert_eq!(serde_json::to_string(&Revision::V1).unwrap(), "\"v1\"");
    }

    #[test]
    fn test_leg_encoding_accessors() {
        assert!(LegEncoding::Supported(vec![1]).is_supported());
        assert_eq!(LegEncoding::Supported(vec![1]).into_bytes(), Some(vec![1]));
        assert!(!LegEncoding::Unsupported.is_supported());
        assert_eq!(LegEncoding::Unsupported.into_bytes(), None);
    }

    #[test]
    fn test_fee_label() {
        assert_eq!(fee_label("SushiSwap", 0.003), "SushiSwap 0.3%");
        assert_eq!(fee_label("UniswapV3", 0.0005), "UniswapV3 0.05%");
        assert_eq!(fee_label("UniswapV3", 0.01), "UniswapV3 1%");
    }

    #[test]
    fn test_descriptor_shape_checks() {
        let p = pool(POOL, vec![token_a()], PoolKind::ConstantProduct { fee: 0.003 });
        let descriptor = PoolDescriptor::new(p, ENTRY_POINT);
        assert!(descriptor.expect_family(PoolFamily::ConstantProduct).is_ok());
        assert!(descriptor.expect_family(PoolFamily::Stable).is_err());
        assert!(matches!(
            descriptor.expect_token_count(2..=2),
            Err(RegistryError::InvalidPoolShape { .. })
        ));
    }

    #[test]
    fn test_leg_token_indices_use_encoder_pool() {
        let ab = pool(POOL, vec![token_a(), token_b()], PoolKind::Stable { fee: 0.0004 });
        let same_address = pool(
            POOL,
            vec![token_a(), token_b(), token_c()],
            PoolKind::Stable { fee: 0.0004 },
        );

        let own = leg(token_b(), token_a(), &ab);
        assert_eq!(leg_token_indices(&ab, &own).unwrap(), (1, 0));

        let lookalike = leg(token_c(), token_a(), &same_address);
        assert!(matches!(
            leg_token_indices(&ab, &lookalike),
            Err(RouteError::ForeignLegPool { .. })
        ));
    }

    #[test]
    fn test_v2_header_layout() {
        let p = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::ConcentratedLiquidity { fee: 0.0005 },
        );
        let mut encoder = ByteEncoder::new();
        encode_v2_header(&mut encoder, &p, true, RECIPIENT).unwrap();

        let bytes = encoder.finalize();
        assert_eq!(bytes.len(), V2_HEADER_LEN);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..21], POOL.as_slice());
        assert_eq!(bytes[21], 1);
        assert_eq!(&bytes[22..42], RECIPIENT.as_slice());
    }
}
