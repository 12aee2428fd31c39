//! Builder pattern for PoolEncoderRegistry

use crate::errors::Result;
use crate::pools::{PoolDescriptor, PoolEncoder};
use crate::registry::{DescriptorConstructor, PoolEncoderRegistry};
use crate::route::PoolFamily;
use crate::RegistryResult;
use alloy::primitives::Address;
use std::sync::Arc;

/// Builder for creating PoolEncoderRegistry instances with a fluent API
pub struct RegistryBuilder {
    entry_point: Address,
    chain_id: Option<u64>,
    families: Vec<(PoolFamily, DescriptorConstructor)>,
}

impl RegistryBuilder {
    /// Create a builder for a registry whose descriptors point at `entry_point`
    pub fn new(entry_point: Address) -> Self {
        Self {
            entry_point,
            chain_id: None,
            families: Vec::new(),
        }
    }

    /// Set the chain routes execute on
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Add a family constructor
    ///
    /// Duplicates are reported by `build`, not here.
    pub fn family<F>(mut self, family: PoolFamily, constructor: F) -> Self
    where
        F: Fn(PoolDescriptor) -> RegistryResult<Box<dyn PoolEncoder>> + Send + Sync + 'static,
    {
        self.families.push((family, Arc::new(constructor)));
        self
    }

    /// Build the registry
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateFamily` if a family was added twice
    pub fn build(self) -> Result<PoolEncoderRegistry> {
        let mut registry = PoolEncoderRegistry::new(self.entry_point);
        if let Some(chain_id) = self.chain_id {
            registry = registry.with_chain_id(chain_id);
        }
        for (family, constructor) in self.families {
            registry.register(family, move |descriptor| constructor(descriptor))?;
        }
        Ok(registry)
    }

    /// Build the registry and wrap it for sharing between compilers
    pub fn build_shared(self) -> Result<Arc<PoolEncoderRegistry>> {
        self.build().map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CompilerError, RegistryError};
    use crate::pools::test_support::ENTRY_POINT;
    use crate::pools::{ConstantProductEncoder, StableEncoder};

    #[test]
    fn test_build_registry() {
        let registry = RegistryBuilder::new(ENTRY_POINT)
            .family(PoolFamily::Stable, StableEncoder::construct)
            .family(PoolFamily::ConstantProduct, ConstantProductEncoder::construct)
            .chain_id(8453)
            .build()
            .unwrap();

        assert_eq!(
            registry.families(),
            vec![PoolFamily::ConstantProduct, PoolFamily::Stable]
        );
        assert_eq!(registry.entry_point(), ENTRY_POINT);
        assert_eq!(registry.chain_id(), Some(8453));
    }

    #[test]
    fn test_duplicate_family_fails_build() {
        let result = RegistryBuilder::new(ENTRY_POINT)
            .family(PoolFamily::Stable, StableEncoder::construct)
            .family(PoolFamily::Stable, StableEncoder::construct)
            .build();

        assert!(matches!(
            result,
            Err(CompilerError::Registry(RegistryError::DuplicateFamily { .. }))
        ));
    }
}
