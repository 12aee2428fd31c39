//! Constant-product (x * y = k) pools.
//!
//! The only family with a layout under both revisions. V1 predates the
//! family-tag header and carries the source token explicitly:
//!
//! | revision | layout                                                          |
//! |----------|-----------------------------------------------------------------|
//! | V1       | `10` · pool(20) · token_from(20) · orientation(1) · recipient(20) |
//! | V2       | V2 header only                                                  |

use super::{encode_v2_header, LegEncoding, PoolDescriptor, PoolEncoder, V2_HEADER_LEN};
use crate::encoding::ByteEncoder;
use crate::errors::Result;
use crate::route::{MultiRoute, PoolFamily, RouteLeg};
use crate::RegistryResult;
use alloy::primitives::Address;

/// V1 command byte for a constant-product swap.
pub const V1_SWAP_COMMAND: u8 = 10;

/// Length of a V1 constant-product instruction.
pub const V1_LEN: usize = 1 + 20 + 20 + 1 + 20;

#[derive(Debug, Clone)]
pub struct ConstantProductEncoder {
    descriptor: PoolDescriptor,
}

impl ConstantProductEncoder {
    pub fn new(descriptor: PoolDescriptor) -> RegistryResult<Self> {
        descriptor.expect_family(PoolFamily::ConstantProduct)?;
        descriptor.expect_token_count(2..=2)?;
        Ok(Self { descriptor })
    }

    /// Registry constructor.
    pub fn construct(descriptor: PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> {
        Ok(Box::new(Self::new(descriptor)?))
    }
}

impl PoolEncoder for ConstantProductEncoder {
    fn descriptor(&self) -> &PoolDescriptor {
        &self.descriptor
    }

    fn encode_v1(
        &self,
        leg: &RouteLeg,
        _route: &MultiRoute,
        recipient: Address,
    ) -> Result<LegEncoding> {
        let zero_for_one = self.zero_for_one(leg)?;

        let mut encoder = ByteEncoder::with_capacity(V1_LEN);
        encoder
            .append_uint8(V1_SWAP_COMMAND)?
            .append_address(self.pool().address.as_slice())?
            .append_address(leg.token_from().address.as_slice())?
            .append_bool(zero_for_one)
            .append_address(recipient.as_slice())?;

        Ok(LegEncoding::Supported(encoder.into_bytes()))
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
