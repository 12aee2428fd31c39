//! Configuration management for the route compiler.
//!
//! Deployment-specific values (the route-processor entry point, the layout
//! revision it speaks, slippage tolerance, target chain) are read from the
//! environment instead of being hard-coded.

use crate::compiler::DEFAULT_SLIPPAGE_BPS;
use crate::errors::{ConfigError, Result};
use crate::pools::Revision;
use crate::route::BPS_DENOMINATOR;
use alloy::primitives::Address;
use std::env;

pub const ENTRY_POINT_VAR: &str = "ROUTE_ENTRY_POINT";
pub const REVISION_VAR: &str = "ROUTE_REVISION";
pub const SLIPPAGE_BPS_VAR: &str = "ROUTE_SLIPPAGE_BPS";
pub const CHAIN_VAR: &str = "ROUTE_CHAIN";

const DEFAULT_CHAIN: &str = "ethereum";

/// Settings the compiler needs for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Route-processor contract receiving input funds
    pub entry_point: Address,
    /// Layout revision the deployed route processor understands
    pub revision: Revision,
    /// Slippage tolerance applied to the minimum output, in basis points
    pub slippage_bps: u64,
    pub chain_id: u64,
}

impl CompilerConfig {
    /// Create a new configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// ## Required
    /// - `ROUTE_ENTRY_POINT`: Route-processor address
    ///
    /// ## Optional
    /// - `ROUTE_REVISION`: `v1` or `v2` (default: v2)
    /// - `ROUTE_SLIPPAGE_BPS`: Slippage tolerance in BPS (default: 50)
    /// - `ROUTE_CHAIN`: Target blockchain (default: ethereum)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` if the entry point is
    /// missing or any value is malformed or out of range.
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading route compiler configuration from environment");

        let entry_point_str = env::var(ENTRY_POINT_VAR).map_err(|_| {
            tracing::error!("{} environment variable is required but not found", ENTRY_POINT_VAR);
            ConfigError::InvalidConfiguration {
                message: format!("{} environment variable is required", ENTRY_POINT_VAR),
            }
        })?;
        let entry_point = Self::parse_address(&entry_point_str, ENTRY_POINT_VAR)?;

        let revision = match env::var(REVISION_VAR) {
            Ok(value) => value.parse::<Revision>().map_err(|_| ConfigError::InvalidConfiguration {
                message: format!(
                    "Invalid {} value: {}. Must be one of: v1, v2",
                    REVISION_VAR, value
                ),
            })?,
            Err(_) => {
                tracing::debug!("{} not set, using default: {}", REVISION_VAR, Revision::default());
                Revision::default()
            }
        };

        let slippage_bps = match env::var(SLIPPAGE_BPS_VAR) {
            Ok(value) => Self::parse_slippage(&value)?,
            Err(_) => {
                tracing::debug!(
                    "{} not set, using default: {}",
                    SLIPPAGE_BPS_VAR, DEFAULT_SLIPPAGE_BPS
                );
                DEFAULT_SLIPPAGE_BPS
            }
        };

        let chain = env::var(CHAIN_VAR).unwrap_or_else(|_| DEFAULT_CHAIN.to_string());
        let chain_id =
            crate::utils::chain_id(&chain).map_err(|_| ConfigError::InvalidConfiguration {
                message: format!(
                    "Invalid {} value: {}. Must be one of: ethereum, base, unichain, arbitrum, polygon",
                    CHAIN_VAR, chain
                ),
            })?;

        let config = Self {
            entry_point,
            revision,
            slippage_bps,
            chain_id,
        };

        tracing::info!(
            entry_point = %config.entry_point,
            revision = %config.revision,
            slippage_bps = config.slippage_bps,
            chain = %chain,
            chain_id = config.chain_id,
            "Route compiler configuration loaded successfully"
        );

        Ok(config)
    }

    /// Configuration for tests: a fixed entry point on ethereum.
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            entry_point: alloy::primitives::address!("e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0"),
            revision: Revision::V2,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            chain_id: 1,
        }
    }

    fn parse_address(value: &str, var_name: &str) -> Result<Address> {
        crate::utils::string_to_h160(value).map_err(|e| {
            ConfigError::InvalidConfiguration {
                message: format!("Failed to parse {}: {}", var_name, e),
            }
            .into()
        })
    }

    fn parse_slippage(value: &str) -> Result<u64> {
        match value.trim().parse::<u64>() {
            Ok(bps) if bps <= BPS_DENOMINATOR => {
                tracing::debug!(slippage_bps = bps, "Valid {} value", SLIPPAGE_BPS_VAR);
                Ok(bps)
            }
            Ok(bps) => Err(ConfigError::InvalidConfiguration {
                message: format!("{} must be <= 10000 (100%), got: {}", SLIPPAGE_BPS_VAR, bps),
            }
            .into()),
            Err(_) => Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "Invalid {} value: {}. Must be a valid integer",
                    SLIPPAGE_BPS_VAR, value
                ),
            }
            .into()),
        }
    }
}
