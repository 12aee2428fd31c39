//! Pool encoder registry.
//!
//! Maps each `PoolFamily` to a constructor that builds a `PoolEncoder` for a
//! concrete pool. The family list is fixed at process start; after that the
//! registry is read-only and can be shared across threads behind an `Arc`.
//!
//! Resolution is cheap but not free (shape validation, boxing), so each
//! compilation resolves through a `DescriptorCache` that reuses an encoder
//! for every leg touching the same pool.

use crate::errors::RegistryError;
use crate::pools::{
    BridgeEncoder, ConcentratedLiquidityEncoder, ConstantProductEncoder, PoolDescriptor,
    PoolEncoder, StableEncoder,
};
use crate::route::{Pool, PoolFamily};
use crate::RegistryResult;
use alloy::primitives::Address;
use itertools::Itertools;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

/// Builds the encoder for one pool of a registered family.
pub type DescriptorConstructor =
    Arc<dyn Fn(PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> + Send + Sync>;

/// Family-to-constructor map plus the entry point every descriptor carries.
#[derive(Clone)]
pub struct PoolEncoderRegistry {
    entry_point: Address,
    chain_id: Option<u64>,
    constructors: BTreeMap<PoolFamily, DescriptorConstructor>,
}

impl PoolEncoderRegistry {
    /// Create an empty registry. Nothing resolves until families are registered.
    pub fn new(entry_point: Address) -> Self {
        Self {
            entry_point,
            chain_id: None,
            constructors: BTreeMap::new(),
        }
    }

    /// Registry wired with every family known to this build.
    pub fn with_default_families(entry_point: Address) -> Self {
        let mut constructors: BTreeMap<PoolFamily, DescriptorConstructor> = BTreeMap::new();
        constructors.insert(
            PoolFamily::ConstantProduct,
            Arc::new(ConstantProductEncoder::construct),
        );
        constructors.insert(
            PoolFamily::ConcentratedLiquidity,
            Arc::new(ConcentratedLiquidityEncoder::construct),
        );
        constructors.insert(PoolFamily::Stable, Arc::new(StableEncoder::construct));
        constructors.insert(PoolFamily::Bridge, Arc::new(BridgeEncoder::construct));

        tracing::debug!(
            entry_point = %entry_point,
            families = %constructors.keys().join(", "),
            "Pool encoder registry initialized with default families"
        );

        Self {
            entry_point,
            chain_id: None,
            constructors,
        }
    }

    /// Bind the registry to the chain routes execute on. Descriptors carry it
    /// so that family constructors can reject pools invalid on that chain.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// Register the constructor for `family`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateFamily` if `family` already has one.
    pub fn register<F>(&mut self, family: PoolFamily, constructor: F) -> RegistryResult<&mut Self>
    where
        F: Fn(PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> + Send + Sync + 'static,
    {
        if self.constructors.contains_key(&family) {
            tracing::warn!(family = %family, "Rejected duplicate pool family registration");
            return Err(RegistryError::DuplicateFamily { family });
        }

        self.constructors.insert(family, Arc::new(constructor));
        tracing::debug!(family = %family, "Registered pool family");
        Ok(self)
    }

    /// Build the encoder for `pool`.
    ///
    /// # Errors
    ///
    /// - `RegistryError::UnknownPoolFamily` if the pool's family is not registered
    /// - `RegistryError::InvalidPoolShape` if the constructor rejects the pool
    pub fn resolve(&self, pool: &Arc<Pool>) -> RegistryResult<Arc<dyn PoolEncoder>> {
        let family = pool.family();
        let constructor = self.constructors.get(&family).ok_or_else(|| {
            tracing::warn!(
                family = %family,
                pool = %pool.address,
                "No encoder registered for pool family"
            );
            RegistryError::UnknownPoolFamily {
                family,
                pool: pool.address,
            }
        })?;

        let mut descriptor = PoolDescriptor::new(pool.clone(), self.entry_point);
        if let Some(chain_id) = self.chain_id {
            descriptor = descriptor.with_chain_id(chain_id);
        }

        let encoder = constructor(descriptor)?;
        Ok(Arc::from(encoder))
    }

    pub fn is_registered(&self, family: PoolFamily) -> bool {
        self.constructors.contains_key(&family)
    }

    /// Registered families in tag order.
    pub fn families(&self) -> Vec<PoolFamily> {
        self.constructors.keys().copied().collect()
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    /// Fresh per-compilation cache backed by this registry.
    pub fn cache(&self) -> DescriptorCache<'_> {
        DescriptorCache::new(self)
    }
}

impl fmt::Debug for PoolEncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolEncoderRegistry")
            .field("entry_point", &self.entry_point)
            .field("chain_id", &self.chain_id)
            .field("families", &self.families())
            .finish()
    }
}

/// Encoders resolved during one compilation, keyed by pool address.
pub struct DescriptorCache<'a> {
    registry: &'a PoolEncoderRegistry,
    encoders: HashMap<Address, Arc<dyn PoolEncoder>>,
}

impl<'a> DescriptorCache<'a> {
    pub fn new(registry: &'a PoolEncoderRegistry) -> Self {
        Self {
            registry,
            encoders: HashMap::new(),
        }
    }

    /// Encoder for `pool`, built on first use.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ConflictingPool` when a pool at the same
    /// address was already resolved with different metadata.
    pub fn resolve(&mut self, pool: &Arc<Pool>) -> RegistryResult<Arc<dyn PoolEncoder>> {
        if let Some(encoder) = self.encoders.get(&pool.address) {
            if encoder.pool() != pool.as_ref() {
                tracing::warn!(pool = %pool.address, "Pool address reused with different metadata");
                return Err(RegistryError::ConflictingPool { pool: pool.address });
            }
            return Ok(encoder.clone());
        }

        let encoder = self.registry.resolve(pool)?;
        self.encoders.insert(pool.address, encoder.clone());
        Ok(encoder)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
