//! # Gateway Adapter
//!
//! Fixed-rate exchange gateway for testing and single-process use.
//! Production deployments would adapt a real router/quoter pair behind the
//! same trait.

use crate::domain::entities::Quote;
use crate::domain::value_objects::{Address, U256};
use crate::errors::GatewayError;
use crate::ports::outbound::ExchangeGateway;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// A recorded conversion, for test assertions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExecutedSwap {
    /// Asset that was converted.
    pub asset_in: Address,
    /// Asset that was delivered.
    pub asset_out: Address,
    /// Amount converted.
    pub amount_in: U256,
    /// Amount delivered.
    pub amount_out: U256,
}

/// Exchange gateway with a fixed rate table.
///
/// Rates are stored as (numerator, denominator) pairs per asset pair;
/// `amount_out = amount_in * numerator / denominator`.
#[derive(Debug, Default)]
pub struct FixedRateGateway {
    rates: RwLock<HashMap<(Address, Address), (U256, U256)>>,
    executed: RwLock<Vec<ExecutedSwap>>,
    /// When set, every swap is rejected. Test hook for the swap-failure path.
    fail_swaps: AtomicBool,
}

impl FixedRateGateway {
    /// Create a gateway with an empty rate table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rate for a pair: `amount_out = amount_in * numerator / denominator`.
    pub fn set_rate(&self, asset_in: Address, asset_out: Address, numerator: u64, denominator: u64) {
        self.rates.write().unwrap().insert(
            (asset_in, asset_out),
            (U256::from(numerator), U256::from(denominator)),
        );
    }

    /// Make every subsequent swap fail (or succeed again).
    pub fn set_fail_swaps(&self, fail: bool) {
        self.fail_swaps.store(fail, Ordering::SeqCst);
    }

    /// Conversions executed so far, in order.
    #[must_use]
    pub fn executed_swaps(&self) -> Vec<ExecutedSwap> {
        self.executed.read().unwrap().clone()
    }

    fn convert(
        &self,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
    ) -> Result<U256, GatewayError> {
        let rates = self.rates.read().unwrap();
        let (numerator, denominator) = rates.get(&(asset_in, asset_out)).ok_or(
            GatewayError::QuoteUnavailable {
                asset_in,
                asset_out,
            },
        )?;
        amount_in
            .checked_mul(*numerator)
            .map(|scaled| scaled / denominator)
            .ok_or_else(|| GatewayError::SwapRejected("amount out of range".to_string()))
    }
}

#[async_trait]
impl ExchangeGateway for FixedRateGateway {
    async fn quote(
        &self,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
    ) -> Result<Quote, GatewayError> {
        let amount_out = self.convert(asset_in, asset_out, amount_in)?;
        Ok(Quote {
            asset_in,
            asset_out,
            amount_in,
            amount_out,
        })
    }

    async fn swap(
        &self,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
        min_out: U256,
    ) -> Result<U256, GatewayError> {
        if self.fail_swaps.load(Ordering::SeqCst) {
            return Err(GatewayError::SwapRejected("gateway offline".to_string()));
        }

        let amount_out = self.convert(asset_in, asset_out, amount_in)?;
        if amount_out < min_out {
            return Err(GatewayError::SwapRejected(format!(
                "output {amount_out} below minimum {min_out}"
            )));
        }

        self.executed.write().unwrap().push(ExecutedSwap {
            asset_in,
            asset_out,
            amount_in,
            amount_out,
        });
        Ok(amount_out)
    }
}

// =============================================================================
// TESTS
// =============================================================================
