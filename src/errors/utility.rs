//! Utility function errors

use thiserror::Error;

/// Errors that can occur in utility functions
#[derive(Debug, Error)]
pub enum UtilityError {
    #[error("Failed to parse address from string '{input}': {source}")]
    AddressParsingFailed {
        input: String,
        #[source]
        source: alloy::primitives::AddressError,
    },

    #[error("BigUint value too large to fit in U256")]
    ValueTooLarge,

    #[error("Failed to parse amount '{input}'")]
    AmountParsingFailed { input: String },

    #[error("Unsupported chain: {chain}")]
    UnsupportedChain { chain: String },

    #[error("Missing field '{field}'")]
    MissingField { field: String },

    #[error("Unknown {kind}: {input}")]
    UnknownVariant { kind: &'static str, input: String },
}
