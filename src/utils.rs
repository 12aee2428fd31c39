//! Utility functions and type conversions.
//!
//! Bridges the type systems used throughout the crate: Alloy primitives for
//! addresses and fixed-width integers, `BigUint` for route amounts, and plain
//! strings for the JSON wire form. Also maps chain names to chain ids.

use alloy::primitives::{Address, U256};
use num_bigint::BigUint;
use std::str::FromStr;
use crate::errors::{Result, UtilityError};

/// Denominator of a proportional-input share.
pub const SHARE_DENOMINATOR: u16 = u16::MAX;

/// Parse a string representation of an Ethereum address.
///
/// Accepts addresses with or without the "0x" prefix and validates
/// the hex format. The address must be exactly 20 bytes (40 hex characters).
///
/// # Errors
///
/// This function will return an error if:
/// - The string contains invalid hex characters
/// - The string is not exactly 40 hex characters (after removing 0x prefix)
pub fn string_to_h160(s: &str) -> Result<Address> {
    let trimmed = s.trim();
    Address::from_str(trimmed.trim_start_matches("0x"))
        .map_err(|source| UtilityError::AddressParsingFailed {
            input: s.to_string(),
            source: alloy::primitives::AddressError::Hex(source),
        }.into())
}

/// Format an address as canonical lowercase, 0x-prefixed hex.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Convert a U256 value to a BigUint.
pub fn u256_to_biguint(val: U256) -> BigUint {
    BigUint::from_bytes_be(&val.to_be_bytes::<32>())
}

/// Convert a BigUint to a U256 value.
///
/// # Errors
///
/// This function will return an error if the value is larger than 2^256 - 1.
pub fn biguint_to_u256(val: &BigUint) -> Result<U256> {
    let bytes = val.to_bytes_be();
    if bytes.len() > 32 {
        return Err(UtilityError::ValueTooLarge.into());
    }
    let mut u256_bytes = [0u8; 32];
    u256_bytes[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(U256::from_be_bytes(u256_bytes))
}

/// Parse a decimal amount string into a BigUint.
pub fn parse_amount(value: &str) -> Result<BigUint> {
    BigUint::from_str(value.trim()).map_err(|_| {
        UtilityError::AmountParsingFailed {
            input: value.to_string(),
        }
        .into()
    })
}

/// Convert a flow fraction in (0, 1] into a 16-bit proportional-input share.
///
/// A fraction of 1.0 maps to `SHARE_DENOMINATOR`; values are rounded to the
/// nearest share and clamped into range.
pub fn fraction_to_share(fraction: f64) -> u16 {
    let scaled = (fraction * f64::from(SHARE_DENOMINATOR)).round();
    scaled.clamp(0.0, f64::from(SHARE_DENOMINATOR)) as u16
}

/// Get the chain ID for a given blockchain name.
///
/// # Errors
///
/// This function will return an error if the chain name is not recognized.
pub fn chain_id(chain: &str) -> Result<u64> {
    match chain {
        "ethereum" => Ok(1),
        "base" => Ok(8453),
        "unichain" => Ok(130),
        "arbitrum" => Ok(42161),
        "polygon" => Ok(137),
        _ => Err(UtilityError::UnsupportedChain {
            chain: chain.to_string(),
        }.into()),
    }
}
