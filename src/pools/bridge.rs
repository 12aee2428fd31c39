//! Wrap and bridge steps.
//!
//! A bridge "pool" pairs an asset with its wrapped or remote counterpart.
//! The V2 header is followed by the destination chain selector as a `uint32`.
//! Orientation selects wrap (selling token0) versus unwrap.

use super::{encode_v2_header, LegEncoding, PoolDescriptor, PoolEncoder, V2_HEADER_LEN};
use crate::encoding::ByteEncoder;
use crate::errors::Result;
use crate::route::{MultiRoute, PoolFamily, PoolKind, RouteLeg};
use crate::RegistryResult;
use alloy::primitives::Address;

/// Length of a V2 bridge instruction.
pub const V2_LEN: usize = V2_HEADER_LEN + 4;

#[derive(Debug, Clone)]
pub struct BridgeEncoder {
    descriptor: PoolDescriptor,
    destination_chain_id: u32,
}

impl BridgeEncoder {
    pub fn new(descriptor: PoolDescriptor) -> RegistryResult<Self> {
        descriptor.expect_family(PoolFamily::Bridge)?;
        descriptor.expect_token_count(2..=2)?;

        let PoolKind::Bridge { destination_chain_id } = descriptor.pool().kind else {
            return Err(descriptor.invalid_shape("missing destination chain".to_string()));
        };
        if descriptor.chain_id() == Some(destination_chain_id) {
            return Err(descriptor.invalid_shape(format!(
                "destination chain {} is the source chain",
                destination_chain_id
            )));
        }
        let destination_chain_id = u32::try_from(destination_chain_id).map_err(|_| {
            descriptor.invalid_shape(format!(
                "destination chain {} does not fit uint32",
                destination_chain_id
            ))
        })?;

        Ok(Self {
            descriptor,
            destination_chain_id,
        })
    }

    /// Registry constructor.
    pub fn construct(descriptor: PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> {
        Ok(Box::new(Self::new(descriptor)?))
    }

    pub fn destination_chain_id(&self) -> u32 {
        self.destination_chain_id
    }
}

impl PoolEncoder for BridgeEncoder {
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

        let mut encoder = ByteEncoder::with_capacity(V2_LEN);
        encode_v2_header(&mut encoder, self.pool(), zero_for_one, recipient)?;
        encoder.append_uint32(self.destination_chain_id)?;

        Ok(LegEncoding::Supported(encoder.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegistryError;
    use crate::pools::test_support::*;

    #[test]
    fn test_v2_layout() {
        let p = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::Bridge { destination_chain_id: 8453 },
        );
        let encoder = BridgeEncoder::new(PoolDescriptor::new(p.clone(), ENTRY_POINT)).unwrap();
        let leg = leg(token_a(), token_b(), &p);
        let route = single_leg_route(leg.clone());

        let bytes = encoder.encode_v2(&leg, &route, RECIPIENT).unwrap().into_bytes().unwrap();
        let expected = packed(&[
            &[3],
            POOL.as_slice(),
            &[0x01],
            RECIPIENT.as_slice(),
            &8453u32.to_be_bytes(),
        ]);
        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), V2_LEN);
    }

    #[test]
    fn test_name_without_fee() {
        let p = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::Bridge { destination_chain_id: 1 },
        );
        let encoder = BridgeEncoder::new(PoolDescriptor::new(p, ENTRY_POINT)).unwrap();
        assert_eq!(encoder.name(), "TestSwap bridge");
    }

    #[test]
    fn test_oversized_chain_id_is_rejected() {
        let p = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::Bridge { destination_chain_id: u64::from(u32::MAX) + 1 },
        );
        assert!(matches!(
            BridgeEncoder::new(PoolDescriptor::new(p, ENTRY_POINT)),
            Err(RegistryError::InvalidPoolShape { .. })
        ));
    }

    #[test]
    fn test_bridge_to_source_chain_is_rejected() {
        let p = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::Bridge { destination_chain_id: 8453 },
        );
        let on_base = PoolDescriptor::new(p.clone(), ENTRY_POINT).with_chain_id(8453);
        assert!(matches!(
            BridgeEncoder::new(on_base),
            Err(RegistryError::InvalidPoolShape { .. })
        ));

        let on_ethereum = PoolDescriptor::new(p, ENTRY_POINT).with_chain_id(1);
        assert_eq!(BridgeEncoder::new(on_ethereum).unwrap().destination_chain_id(), 8453);
    }

    #[test]
    fn test_v1_is_unsupported() {
        let p = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::Bridge { destination_chain_id: 1 },
        );
        let encoder = BridgeEncoder::new(PoolDescriptor::new(p.clone(), ENTRY_POINT)).unwrap();
        let leg = leg(token_b(), token_a(), &p);
        let route = single_leg_route(leg.clone());
        assert_eq!(encoder.encode_v1(&leg, &route, RECIPIENT).unwrap(), LegEncoding::Unsupported);
    }
}
