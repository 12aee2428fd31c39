//! JSON wire form of routes and compiled payloads.
//!
//! Addresses travel as hex strings and amounts as decimal strings so that
//! 256-bit values survive JSON untouched. Conversion into domain types goes
//! through `TryFrom`, which is where malformed input is rejected.

use super::{MultiRoute, Pool, PoolFamily, PoolKind, RouteLeg, RouteStatus, Token};
use crate::compiler::{CompiledRoute, EncodedLeg};
use crate::errors::{CompilerError, Result, UtilityError};
use crate::pools::Revision;
use crate::utils::{biguint_to_u256, format_address, parse_amount, string_to_h160};
use num_bigint::BigUint;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub address: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDto {
    pub address: String,
    pub tokens: Vec<TokenDto>,
    pub provider: String,
    pub family: PoolFamily,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub destination_chain_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    pub token_from: TokenDto,
    pub token_to: TokenDto,
    /// Address of an entry in `RouteDto::pools`
    pub pool: String,
    pub flow_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub status: RouteStatus,
    pub token_in: TokenDto,
    pub token_out: TokenDto,
    pub amount_in: String,
    pub amount_out: String,
    #[serde(default)]
    pub pools: Vec<PoolDto>,
    #[serde(default)]
    pub legs: Vec<LegDto>,
}

impl TryFrom<&TokenDto> for Token {
    type Error = CompilerError;

    fn try_from(dto: &TokenDto) -> Result<Self> {
        let token = Token::new(string_to_h160(&dto.address)?, dto.decimals);
        Ok(match &dto.symbol {
            Some(symbol) => token.with_symbol(symbol.clone()),
            None => token,
        })
    }
}

impl TryFrom<&PoolDto> for Pool {
    type Error = CompilerError;

    fn try_from(dto: &PoolDto) -> Result<Self> {
        let fee = dto.fee.unwrap_or_default();
        let kind = match dto.family {
            PoolFamily::ConstantProduct => PoolKind::ConstantProduct { fee },
            PoolFamily::ConcentratedLiquidity => PoolKind::ConcentratedLiquidity { fee },
            PoolFamily::Stable => PoolKind::Stable { fee },
            PoolFamily::Bridge => PoolKind::Bridge {
                destination_chain_id: dto.destination_chain_id.ok_or_else(|| {
                    UtilityError::MissingField {
                        field: "destinationChainId".to_string(),
                    }
                })?,
            },
        };

        let tokens = dto
            .tokens
            .iter()
            .map(Token::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Pool::new(
            string_to_h160(&dto.address)?,
            tokens,
            dto.provider.clone(),
            kind,
        ))
    }
}

impl TryFrom<&RouteDto> for MultiRoute {
    type Error = CompilerError;

    fn try_from(dto: &RouteDto) -> Result<Self> {
        let mut pools: HashMap<Address, Arc<Pool>> = HashMap::with_capacity(dto.pools.len());
        for pool_dto in &dto.pools {
            let pool = Pool::try_from(pool_dto)?;
            pools.insert(pool.address, Arc::new(pool));
        }

        let legs = dto
            .legs
            .iter()
            .map(|leg| -> Result<RouteLeg> {
                let pool_address = string_to_h160(&leg.pool)?;
                let pool = pools.get(&pool_address).cloned().ok_or_else(|| {
                    UtilityError::UnknownVariant {
                        kind: "pool",
                        input: leg.pool.clone(),
                    }
                })?;
                Ok(RouteLeg::new(
                    Token::try_from(&leg.token_from)?,
                    Token::try_from(&leg.token_to)?,
                    pool,
                    leg.flow_fraction,
                )?)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MultiRoute::new(
            dto.status,
            legs,
            Token::try_from(&dto.token_in)?,
            Token::try_from(&dto.token_out)?,
            parse_uint256_amount(&dto.amount_in)?,
            parse_uint256_amount(&dto.amount_out)?,
        ))
    }
}

/// Amounts are on-chain `uint256` values; anything wider is rejected.
fn parse_uint256_amount(value: &str) -> Result<BigUint> {
    let amount = parse_amount(value)?;
    biguint_to_u256(&amount)?;
    Ok(amount)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedLegDto {
    pub index: usize,
    pub family: PoolFamily,
    pub pool: String,
    pub recipient: String,
    pub offset: usize,
    pub length: usize,
    pub share: u16,
}

/// Compiled route as handed to the transaction-submission layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRouteDto {
    pub payload: String,
    pub entry_point: String,
    pub revision: Revision,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub amount_out_min: String,
    pub legs: Vec<EncodedLegDto>,
}

impl From<&EncodedLeg> for EncodedLegDto {
    fn from(leg: &EncodedLeg) -> Self {
        Self {
            index: leg.index,
            family: leg.family,
            pool: format_address(&leg.pool),
            recipient: format_address(&leg.recipient),
            offset: leg.offset,
            length: leg.len,
            share: leg.share,
        }
    }
}

impl From<&CompiledRoute> for CompiledRouteDto {
    fn from(compiled: &CompiledRoute) -> Self {
        Self {
            payload: compiled.payload_hex(),
            entry_point: format_address(&compiled.entry_point),
            revision: compiled.revision,
            token_in: format_address(&compiled.token_in),
            token_out: format_address(&compiled.token_out),
            amount_in: compiled.amount_in.to_string(),
            amount_out_min: compiled.amount_out_min.to_string(),
            legs: compiled.legs.iter().map(EncodedLegDto::from).collect(),
        }
    }
}
