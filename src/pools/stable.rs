//! Stable-swap pools.
//!
//! Stable pools can hold more than two tokens, so the V2 header is followed
//! by an index-pair selector: one byte, source index in the high nibble and
//! destination index in the low nibble. This caps pools at 16 tokens.

use super::{encode_v2_header, LegEncoding, PoolDescriptor, PoolEncoder, V2_HEADER_LEN};
use crate::encoding::ByteEncoder;
use crate::errors::Result;
use crate::route::{MultiRoute, PoolFamily, RouteLeg};
use crate::RegistryResult;
use alloy::primitives::Address;

/// Largest token count addressable by a 4-bit index.
pub const MAX_STABLE_TOKENS: usize = 16;

/// Length of a V2 stable instruction.
pub const V2_LEN: usize = V2_HEADER_LEN + 1;

#[derive(Debug, Clone)]
pub struct StableEncoder {
    descriptor: PoolDescriptor,
}

impl StableEncoder {
    pub fn new(descriptor: PoolDescriptor) -> RegistryResult<Self> {
        descriptor.expect_family(PoolFamily::Stable)?;
        descriptor.expect_token_count(2..=MAX_STABLE_TOKENS)?;
        Ok(Self { descriptor })
    }

    /// Registry constructor.
    pub fn construct(descriptor: PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> {
        Ok(Box::new(Self::new(descriptor)?))
    }

    /// Pack a token index pair into one selector byte.
    pub fn index_pair(from: usize, to: usize) -> u8 {
        // Both indices are < MAX_STABLE_TOKENS, enforced at construction.
        ((from as u8) << 4) | ((to as u8) & 0x0f)
    }
}

impl PoolEncoder for StableEncoder {
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
        let (from, to) = self.token_indices(leg)?;

        let mut encoder = ByteEncoder::with_capacity(V2_LEN);
        encode_v2_header(&mut encoder, self.pool(), from == 0, recipient)?;
        encoder.append_uint8(Self::index_pair(from, to))?;

        Ok(LegEncoding::Supported(encoder.into_bytes()))
    }
}
