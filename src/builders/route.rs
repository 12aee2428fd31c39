//! Builder pattern for MultiRoute

use crate::errors::Result;
use crate::route::{MultiRoute, Pool, RouteLeg, RouteStatus, Token};
use num_bigint::BigUint;
use std::sync::Arc;

/// Builder for creating MultiRoute instances with a fluent API
pub struct MultiRouteBuilder {
    token_in: Token,
    token_out: Token,
    amount_in: BigUint,
    amount_out: BigUint,
    status: RouteStatus,
    legs: Vec<(Token, Token, Arc<Pool>, f64)>,
}

impl MultiRouteBuilder {
    /// Create a new MultiRouteBuilder
    ///
    /// # Arguments
    ///
    /// * `token_in` - Token the route starts from
    /// * `token_out` - Token the route delivers
    pub fn new(token_in: Token, token_out: Token) -> Self {
        Self {
            token_in,
            token_out,
            amount_in: BigUint::default(),
            amount_out: BigUint::default(),
            status: RouteStatus::Success,
            legs: Vec::new(),
        }
    }

    pub fn amounts(
        mut self,
        amount_in: impl Into<BigUint>,
        amount_out: impl Into<BigUint>,
    ) -> Self {
        self.amount_in = amount_in.into();
        self.amount_out = amount_out.into();
        self
    }

    pub fn status(mut self, status: RouteStatus) -> Self {
        self.status = status;
        self
    }

    /// Add a leg carrying the full incoming amount
    pub fn leg(self, token_from: Token, token_to: Token, pool: Arc<Pool>) -> Self {
        self.split_leg(token_from, token_to, pool, 1.0)
    }

    /// Add a leg carrying `flow_fraction` of the incoming amount
    pub fn split_leg(
        mut self,
        token_from: Token,
        token_to: Token,
        pool: Arc<Pool>,
        flow_fraction: f64,
    ) -> Self {
        self.legs.push((token_from, token_to, pool, flow_fraction));
        self
    }

    /// Build the MultiRoute
    ///
    /// # Errors
    ///
    /// Returns `RouteError::InvalidFlowFraction` if any leg fraction is outside (0, 1]
    pub fn build(self) -> Result<MultiRoute> {
        let legs = self
            .legs
            .into_iter()
            .map(|(from, to, pool, fraction)| RouteLeg::new(from, to, pool, fraction))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(MultiRoute::new(
            self.status,
            legs,
            self.token_in,
            self.token_out,
            self.amount_in,
            self.amount_out,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CompilerError, RouteError};
    use crate::pools::test_support::*;
    use crate::route::PoolKind;

    #[test]
    fn test_build_route() {
        let p = pool(POOL, vec![token_a(), token_b()], PoolKind::ConstantProduct { fee: 0.003 });
        let route = MultiRouteBuilder::new(token_a(), token_b())
            .amounts(100u32, 95u32)
            .leg(token_a(), token_b(), p)
            .build()
            .unwrap();

        assert_eq!(route.status, RouteStatus::Success);
        assert_eq!(route.legs.len(), 1);
        assert_eq!(route.amount_out, BigUint::from(95u32));
    }

    #[test]
    fn test_invalid_fraction_fails_build() {
        let p = pool(POOL, vec![token_a(), token_b()], PoolKind::ConstantProduct { fee: 0.003 });
        let result = MultiRouteBuilder::new(token_a(), token_b())
            .split_leg(token_a(), token_b(), p, 1.5)
            .build();

        assert!(matches!(
            result,
            Err(CompilerError::Route(RouteError::InvalidFlowFraction { .. }))
        ));
    }
}
