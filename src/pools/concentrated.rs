//! Concentrated-liquidity pools.
//!
//! No V1 layout exists; the V2 instruction is the bare 42-byte header.

use super::{encode_v2_header, LegEncoding, PoolDescriptor, PoolEncoder, V2_HEADER_LEN};
use crate::encoding::ByteEncoder;
use crate::errors::Result;
use crate::route::{MultiRoute, PoolFamily, RouteLeg};
use crate::RegistryResult;
use alloy::primitives::Address;

#[derive(Debug, Clone)]
pub struct ConcentratedLiquidityEncoder {
    descriptor: PoolDescriptor,
}

impl ConcentratedLiquidityEncoder {
    pub fn new(descriptor: PoolDescriptor) -> RegistryResult<Self> {
        descriptor.expect_family(PoolFamily::ConcentratedLiquidity)?;
        descriptor.expect_token_count(2..=2)?;
        Ok(Self { descriptor })
    }

    /// Registry constructor.
    pub fn construct(descriptor: PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> {
        Ok(Box::new(Self::new(descriptor)?))
    }
}

impl PoolEncoder for ConcentratedLiquidityEncoder {
    fn descriptor(&self) -> &PoolDescriptor {
        &self.descriptor
    }

    fn encode_v1(
        &self,
        _leg: &RouteLeg,
        _route: &MultiRoute,
        _recipient: Address,
    ) -> Result<LegEncoding> {
        Ok(LegEncoding::Unsupported)
    }

    fn encode_v2(
        &self,
        leg: &RouteLeg,
        _route: &MultiRoute,
        recipient: Address,
    ) -> Result<LegEncoding> {
        let zero_for_one = self.zero_for_one(leg)?;

        let mut encoder = ByteEncoder::with_capacity(V2_HEADER_LEN);
        encode_v2_header(&mut encoder, self.pool(), zero_for_one, recipient)?;

        Ok(LegEncoding::Supported(encoder.into_bytes()))
    }
}
