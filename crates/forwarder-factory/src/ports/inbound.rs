//! # Driving Ports (API - Inbound)
//!
//! Interfaces exposed by this crate. Callers (relayers, indexers, admin
//! tooling) use these to provision forwarders and settle collected value.

use crate::domain::entities::{DeploymentRecord, FeeSplit};
use crate::domain::value_objects::{Address, BasisPoints, U256};
use crate::errors::{ConfigError, FactoryError, SettlementError};
use async_trait::async_trait;

// =============================================================================
// FORWARDER PROVISIONING (Primary Driving Port)
// =============================================================================

/// Per-beneficiary forwarder provisioning.
///
/// State machine per beneficiary: Unprovisioned --create_forwarder-->
/// Provisioned. Provisioned is terminal: no re-creation, no deletion.
#[async_trait]
pub trait ForwarderProvisioning: Send + Sync {
    /// Provisions the forwarder for `beneficiary` exactly once.
    ///
    /// Derives the target address, atomically registers it, instantiates the
    /// forwarder at the derived address, and appends exactly one
    /// `ForwarderCreated` entry to the audit log, all-or-nothing.
    ///
    /// # Errors
    ///
    /// - [`FactoryError::InvalidBeneficiary`] for a malformed identifier.
    /// - [`FactoryError::AlreadyDeployed`] if a forwarder already exists;
    ///   callers should query [`Self::get_forwarder`] instead.
    /// - [`FactoryError::DeploymentFailed`] on execution-environment failure;
    ///   no registry mutation and no event is observable afterwards.
    async fn create_forwarder(&self, beneficiary: Address)
        -> Result<DeploymentRecord, FactoryError>;

    /// Read-only derivation passthrough.
    ///
    /// Callable any number of times, before or after actual deployment, and
    /// always returns the same value for the same beneficiary. After a
    /// successful creation the returned address equals the live address.
    fn get_forwarder(&self, beneficiary: Address) -> Result<Address, FactoryError>;

    /// Returns true if the beneficiary's forwarder has been provisioned.
    async fn is_deployed(&self, beneficiary: Address) -> bool;
}

// =============================================================================
// FEE SETTLEMENT
// =============================================================================

/// Conversion of collected value into the reference asset, with fee split.
#[async_trait]
pub trait FeeSettlement: Send + Sync {
    /// Splits `gross_amount` into protocol fee, relayer fee, and net payout,
    /// then instructs the gateway to convert the fee portions into the
    /// reference asset.
    ///
    /// Compute-then-act: the split is computed and validated before the
    /// gateway is instructed; a failed swap leaves no durable
    /// fee-accounting state behind.
    ///
    /// # Errors
    ///
    /// - [`SettlementError::InsufficientAmount`] for zero or dust amounts.
    /// - [`SettlementError::RateUnavailable`] when the gateway cannot quote
    ///   the configured pair.
    /// - [`SettlementError::ArithmeticOverflow`] when an intermediate value
    ///   exceeds the U256 range.
    /// - [`SettlementError::SwapFailed`] when the gateway rejects the
    ///   conversion.
    async fn settle(&self, gross_amount: U256) -> Result<FeeSplit, SettlementError>;
}

// =============================================================================
// CONFIGURATION UPDATE (Access-Controlled)
// =============================================================================

/// The single mutation entry point for fee configuration.
///
/// Fee rates are never mutated implicitly; only the configured owner may
/// change them here.
#[async_trait]
pub trait FeeConfigUpdate: Send + Sync {
    /// Updates the protocol and relayer fee rates.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Unauthorized`] unless `caller` is the owner.
    /// - [`ConfigError::FeeRateOutOfBounds`] if the combined rate exceeds
    ///   100%.
    async fn update_fees(
        &self,
        caller: Address,
        protocol_fee_bps: BasisPoints,
        relayer_fee_bps: BasisPoints,
    ) -> Result<(), ConfigError>;
}
