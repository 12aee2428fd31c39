//! Route compiler.
//!
//! Turns a finished `MultiRoute` into the byte payload consumed by the
//! on-chain route processor. For each leg, in execution order:
//!
//! 1. Resolve the pool's encoder (once per pool per compilation)
//! 2. Pick the leg recipient: the entry point when a later leg consumes this
//!    leg's output token, the caller's recipient otherwise
//! 3. Encode the leg under the requested revision
//! 4. Append the leg bytes to the payload
//!
//! Any failure aborts the whole compilation. A caller either gets the
//! complete payload or an error, never a truncated payload.

use crate::config::CompilerConfig;
use crate::encoding::ByteEncoder;
use crate::errors::{Result, RouteError};
use crate::pools::{LegEncoding, Revision};
use crate::registry::PoolEncoderRegistry;
use crate::route::{MultiRoute, PoolFamily, BPS_DENOMINATOR};
use crate::utils::fraction_to_share;
use alloy::primitives::Address;
use num_bigint::BigUint;
use std::sync::Arc;

/// Slippage applied to `amount_out_min` when none is configured.
pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;

/// Where one leg's instruction lives inside the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLeg {
    /// Position of the leg in the route
    pub index: usize,
    pub family: PoolFamily,
    pub pool: Address,
    /// Receiver of the leg's output
    pub recipient: Address,
    /// Byte offset of the instruction in the payload
    pub offset: usize,
    pub len: usize,
    /// Flow fraction as a proportional-input share out of `u16::MAX`
    pub share: u16,
}

/// A compiled route, ready for transaction submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRoute {
    pub payload: Vec<u8>,
    /// Contract that receives the input funds and executes the payload
    pub entry_point: Address,
    pub revision: Revision,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: BigUint,
    pub amount_out_min: BigUint,
    pub legs: Vec<EncodedLeg>,
}

impl CompiledRoute {
    /// Canonical `0x`-prefixed lowercase hex form of the payload.
    pub fn payload_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.payload))
    }

    /// Instruction bytes of the leg at `index`.
    pub fn leg_bytes(&self, index: usize) -> Option<&[u8]> {
        let leg = self.legs.get(index)?;
        self.payload.get(leg.offset..leg.offset + leg.len)
    }
}

/// Compiles routes against a shared, immutable pool encoder registry.
///
/// `RouteCompiler` is cheap to clone and safe to use from many threads at
/// once; every `compile` call owns its own descriptor cache.
#[derive(Debug, Clone)]
pub struct RouteCompiler {
    registry: Arc<PoolEncoderRegistry>,
    slippage_bps: u64,
}

impl RouteCompiler {
    pub fn new(registry: Arc<PoolEncoderRegistry>) -> Self {
        Self {
            registry,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }

    /// Override the slippage used for `amount_out_min`.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::InvalidSlippage` above 10000 bps.
    pub fn with_slippage_bps(mut self, slippage_bps: u64) -> Result<Self> {
        if slippage_bps > BPS_DENOMINATOR {
            return Err(RouteError::InvalidSlippage { bps: slippage_bps }.into());
        }
        self.slippage_bps = slippage_bps;
        Ok(self)
    }

    /// Compiler over the default families, using the configured entry point,
    /// chain and slippage.
    pub fn from_config(config: &CompilerConfig) -> Result<Self> {
        let registry = PoolEncoderRegistry::with_default_families(config.entry_point)
            .with_chain_id(config.chain_id);
        Self::new(Arc::new(registry)).with_slippage_bps(config.slippage_bps)
    }

    pub fn entry_point(&self) -> Address {
        self.registry.entry_point()
    }

    pub fn registry(&self) -> &Arc<PoolEncoderRegistry> {
        &self.registry
    }

    pub fn slippage_bps(&self) -> u64 {
        self.slippage_bps
    }

    /// Compile `route` for the route processor at `revision`, delivering the
    /// final output to `recipient`.
    ///
    /// # Errors
    ///
    /// - `RouteError::NoViableRoute` for a `NoWay` route
    /// - `RouteError::EmptyRoute` for a route without legs
    /// - `RouteError::UnsupportedPoolForRevision` when a leg's family has no
    ///   layout under `revision`
    /// - `RouteError::LegPoolMismatch` when a leg's tokens are not in its pool
    /// - `RegistryError` when a pool cannot be resolved to an encoder
    pub fn compile(
        &self,
        route: &MultiRoute,
        revision: Revision,
        recipient: Address,
    ) -> Result<CompiledRoute> {
        if !route.is_viable() {
            tracing::warn!(
                token_in = %route.token_in,
                token_out = %route.token_out,
                "Refusing to compile route with no viable path"
            );
            return Err(RouteError::NoViableRoute.into());
        }
        if route.legs.is_empty() {
            tracing::warn!(status = ?route.status, "Refusing to compile route without legs");
            return Err(RouteError::EmptyRoute.into());
        }

        let entry_point = self.registry.entry_point();
        let mut cache = self.registry.cache();
        let mut payload = ByteEncoder::new();
        let mut legs = Vec::with_capacity(route.legs.len());

        for (index, leg) in route.legs.iter().enumerate() {
            let encoder = cache.resolve(leg.pool())?;
            let leg_recipient = if route.feeds_later_leg(index) {
                entry_point
            } else {
                recipient
            };

            let bytes = match encoder.encode(revision, leg, route, leg_recipient)? {
                LegEncoding::Supported(bytes) => bytes,
                LegEncoding::Unsupported => {
                    tracing::warn!(
                        leg = index,
                        family = %encoder.family(),
                        pool = %leg.pool().address,
                        revision = %revision,
                        "Pool family has no layout under requested revision"
                    );
                    return Err(RouteError::UnsupportedPoolForRevision {
                        family: encoder.family(),
                        pool: leg.pool().address,
                        revision,
                    }
                    .into());
                }
            };

            let encoded = EncodedLeg {
                index,
                family: encoder.family(),
                pool: leg.pool().address,
                recipient: leg_recipient,
                offset: payload.len(),
                len: bytes.len(),
                share: fraction_to_share(leg.flow_fraction()),
            };

            tracing::debug!(
                leg = index,
                pool = %encoded.pool,
                name = %encoder.name(),
                token_from = %leg.token_from(),
                token_to = %leg.token_to(),
                recipient = %encoded.recipient,
                share = encoded.share,
                bytes = encoded.len,
                "Encoded route leg"
            );

            payload.append_bytes(&bytes);
            legs.push(encoded);
        }

        let amount_out_min = route.min_amount_out(self.slippage_bps)?;
        let compiled = CompiledRoute {
            payload: payload.into_bytes(),
            entry_point,
            revision,
            token_in: route.token_in.address,
            token_out: route.token_out.address,
            amount_in: route.amount_in.clone(),
            amount_out_min,
            legs,
        };

        tracing::info!(
            revision = %revision,
            legs = compiled.legs.len(),
            pools = cache.len(),
            payload_len = compiled.payload.len(),
            amount_in = %compiled.amount_in,
            amount_out_min = %compiled.amount_out_min,
            "Compiled route"
        );

        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CompilerError, RegistryError};
    use crate::pools::test_support::*;
    use crate::pools::ConstantProductEncoder;
    use crate::route::{Pool, PoolKind, RouteLeg, RouteStatus, Token};
    use alloy::primitives::address;
    use std::thread;

    const POOL_BC: Address = address!("2222222222222222222222222222222222222222");
    const POOL_AC: Address = address!("3333333333333333333333333333333333333333");

    fn compiler() -> RouteCompiler {
        RouteCompiler::new(Arc::new(PoolEncoderRegistry::with_default_families(
            ENTRY_POINT,
        )))
    }

    fn route(legs: Vec<RouteLeg>, token_in: Token, token_out: Token) -> MultiRoute {
        MultiRoute::new(
            RouteStatus::Success,
            legs,
            token_in,
            token_out,
            BigUint::from(1_000_000u32),
            BigUint::from(2_000_000u32),
        )
    }

    fn concentrated_ab() -> Arc<Pool> {
        pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::ConcentratedLiquidity { fee: 0.0005 },
        )
    }

    fn constant_product_bc() -> Arc<Pool> {
        pool(
            POOL_BC,
            vec![token_b(), token_c()],
            PoolKind::ConstantProduct { fee: 0.003 },
        )
    }

    #[test]
    fn test_single_concentrated_leg_v2() {
        let p = concentrated_ab();
        let r = route(vec![leg(token_a(), token_b(), &p)], token_a(), token_c());

        let compiled = compiler().compile(&r, Revision::V2, RECIPIENT).unwrap();
        let expected = packed(&[&[1], POOL.as_slice(), &[0x01], RECIPIENT.as_slice()]);
        assert_eq!(compiled.payload, expected);
        assert_eq!(compiled.payload.len(), 42);
        assert_eq!(compiled.entry_point, ENTRY_POINT);
        assert_eq!(compiled.legs[0].share, u16::MAX);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let r = route(
            vec![
                leg(token_a(), token_b(), &concentrated_ab()),
                leg(token_b(), token_c(), &constant_product_bc()),
            ],
            token_a(),
            token_c(),
        );

        let first = compiler().compile(&r, Revision::V2, RECIPIENT).unwrap();
        let second = compiler().compile(&r, Revision::V2, RECIPIENT).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.payload_hex(), second.payload_hex());
    }

    #[test]
    fn test_two_leg_route_chains_through_entry_point() {
        let ab = concentrated_ab();
        let bc = constant_product_bc();
        let r = route(
            vec![leg(token_a(), token_b(), &ab), leg(token_b(), token_c(), &bc)],
            token_a(),
            token_c(),
        );

        let compiled = compiler().compile(&r, Revision::V2, RECIPIENT).unwrap();
        let expected = [
            packed(&[&[1], POOL.as_slice(), &[0x01], ENTRY_POINT.as_slice()]),
            packed(&[&[0], POOL_BC.as_slice(), &[0x01], RECIPIENT.as_slice()]),
        ]
        .concat();

        assert_eq!(compiled.payload, expected);
        assert_eq!(compiled.legs[0].recipient, ENTRY_POINT);
        assert_eq!(compiled.legs[1].recipient, RECIPIENT);
        assert_eq!(compiled.legs[1].offset, 42);
        assert_eq!(compiled.leg_bytes(1).unwrap(), &expected[42..]);
        assert_eq!(compiled.leg_bytes(2), None);
    }

    #[test]
    fn test_v1_refuses_concentrated_pool() {
        let p = concentrated_ab();
        let r = route(vec![leg(token_a(), token_b(), &p)], token_a(), token_b());

        let err = compiler().compile(&r, Revision::V1, RECIPIENT).unwrap_err();
        assert!(matches!(
            err,
            CompilerError::Route(RouteError::UnsupportedPoolForRevision {
                family: PoolFamily::ConcentratedLiquidity,
                pool,
                revision: Revision::V1,
            }) if pool == POOL
        ));
    }

    #[test]
    fn test_v1_constant_product_route() {
        let bc = constant_product_bc();
        let r = route(vec![leg(token_c(), token_b(), &bc)], token_c(), token_b());

        let compiled = compiler().compile(&r, Revision::V1, RECIPIENT).unwrap();
        let expected = packed(&[
            &[10],
            POOL_BC.as_slice(),
            token_c().address.as_slice(),
            &[0x00],
            RECIPIENT.as_slice(),
        ]);
        assert_eq!(compiled.payload, expected);
        assert_eq!(compiled.revision, Revision::V1);
    }

    #[test]
    fn test_no_way_route_is_refused() {
        let r = MultiRoute::no_way(token_a(), token_b(), BigUint::from(1u8));
        assert!(matches!(
            compiler().compile(&r, Revision::V2, RECIPIENT),
            Err(CompilerError::Route(RouteError::NoViableRoute))
        ));
    }

    #[test]
    fn test_route_without_legs_is_refused() {
        let r = route(Vec::new(), token_a(), token_b());
        assert!(matches!(
            compiler().compile(&r, Revision::V2, RECIPIENT),
            Err(CompilerError::Route(RouteError::EmptyRoute))
        ));
    }

    #[test]
    fn test_mismatched_leg_aborts_without_payload() {
        let ab = concentrated_ab();
        let bc = constant_product_bc();
        let r = route(
            vec![leg(token_a(), token_b(), &ab), leg(token_a(), token_c(), &bc)],
            token_a(),
            token_c(),
        );

        assert!(matches!(
            compiler().compile(&r, Revision::V2, RECIPIENT),
            Err(CompilerError::Route(RouteError::LegPoolMismatch { pool, .. })) if pool == POOL_BC
        ));
    }

    #[test]
    fn test_pools_sharing_an_address_are_refused() {
        let constant_product = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::ConstantProduct { fee: 0.003 },
        );
        let concentrated = pool(
            POOL,
            vec![token_b(), token_c()],
            PoolKind::ConcentratedLiquidity { fee: 0.0005 },
        );
        let r = route(
            vec![
                leg(token_a(), token_b(), &constant_product),
                leg(token_b(), token_c(), &concentrated),
            ],
            token_a(),
            token_c(),
        );

        for revision in [Revision::V1, Revision::V2] {
            assert!(matches!(
                compiler().compile(&r, revision, RECIPIENT),
                Err(CompilerError::Registry(RegistryError::ConflictingPool { pool })) if pool == POOL
            ));
        }
    }

    #[test]
    fn test_unregistered_family_is_refused() {
        let mut registry = PoolEncoderRegistry::new(ENTRY_POINT);
        registry
            .register(PoolFamily::ConstantProduct, ConstantProductEncoder::construct)
            .unwrap();
        let compiler = RouteCompiler::new(Arc::new(registry));

        let p = concentrated_ab();
        let r = route(vec![leg(token_a(), token_b(), &p)], token_a(), token_b());
        assert!(matches!(
            compiler.compile(&r, Revision::V2, RECIPIENT),
            Err(CompilerError::Registry(RegistryError::UnknownPoolFamily { .. }))
        ));
    }

    #[test]
    fn test_fan_out_shares_and_recipients() {
        let ab = concentrated_ab();
        let ac = pool(
            POOL_AC,
            vec![token_a(), token_c()],
            PoolKind::ConstantProduct { fee: 0.003 },
        );
        let bc = constant_product_bc();

        let r = route(
            vec![
                RouteLeg::new(token_a(), token_b(), ab.clone(), 0.25).unwrap(),
                RouteLeg::new(token_a(), token_c(), ac.clone(), 0.75).unwrap(),
                leg(token_b(), token_c(), &bc),
            ],
            token_a(),
            token_c(),
        );

        let compiled = compiler().compile(&r, Revision::V2, RECIPIENT).unwrap();
        let shares: Vec<u16> = compiled.legs.iter().map(|leg| leg.share).collect();
        assert_eq!(shares, vec![16384, 49151, u16::MAX]);

        let recipients: Vec<Address> = compiled.legs.iter().map(|leg| leg.recipient).collect();
        assert_eq!(recipients, vec![ENTRY_POINT, RECIPIENT, RECIPIENT]);
        assert_eq!(compiled.payload.len(), 3 * 42);
    }

    #[test]
    fn test_amount_out_min_uses_slippage() {
        let p = concentrated_ab();
        let r = route(vec![leg(token_a(), token_b(), &p)], token_a(), token_b());

        let compiled = compiler()
            .with_slippage_bps(100)
            .unwrap()
            .compile(&r, Revision::V2, RECIPIENT)
            .unwrap();
        assert_eq!(compiled.amount_out_min, BigUint::from(1_980_000u32));
        assert_eq!(compiled.amount_in, BigUint::from(1_000_000u32));
        assert_eq!(compiled.token_in, token_a().address);
        assert_eq!(compiled.token_out, token_b().address);

        assert!(compiler().with_slippage_bps(10_001).is_err());
    }

    #[test]
    fn test_from_config_binds_chain() {
        let config = CompilerConfig {
            slippage_bps: 100,
            ..CompilerConfig::for_testing()
        };
        let compiler = RouteCompiler::from_config(&config).unwrap();
        assert_eq!(compiler.entry_point(), config.entry_point);
        assert_eq!(compiler.registry().chain_id(), Some(config.chain_id));
        assert_eq!(compiler.slippage_bps(), 100);

        let bridge = pool(
            POOL,
            vec![token_a(), token_b()],
            PoolKind::Bridge { destination_chain_id: config.chain_id },
        );
        let r = route(vec![leg(token_a(), token_b(), &bridge)], token_a(), token_b());
        assert!(matches!(
            compiler.compile(&r, Revision::V2, RECIPIENT),
            Err(CompilerError::Registry(RegistryError::InvalidPoolShape { .. }))
        ));
    }

    #[test]
    fn test_concurrent_compilation() {
        let compiler = compiler();
        let r = Arc::new(route(
            vec![
                leg(token_a(), token_b(), &concentrated_ab()),
                leg(token_b(), token_c(), &constant_product_bc()),
            ],
            token_a(),
            token_c(),
        ));
        let expected = compiler.compile(&r, Revision::V2, RECIPIENT).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let compiler = compiler.clone();
                let r = r.clone();
                thread::spawn(move || compiler.compile(&r, Revision::V2, RECIPIENT).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
