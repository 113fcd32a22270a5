//! # Error Types
//!
//! All error types for forwarder provisioning and fee settlement.
//!
//! Every failure aborts the whole operation with no partial durable-state
//! change; callers are always surfaced one of these kinds.

use crate::domain::value_objects::{Address, U256};
use thiserror::Error;

// =============================================================================
// FACTORY ERRORS
// =============================================================================

/// Errors from the forwarder provisioning path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Malformed beneficiary identifier (local validation failure).
    #[error("invalid beneficiary: {0:?}")]
    InvalidBeneficiary(Address),

    /// A forwarder already exists for this beneficiary.
    #[error("forwarder already deployed for beneficiary {beneficiary:?} at {address:?}")]
    AlreadyDeployed {
        /// The beneficiary the duplicate request targeted.
        beneficiary: Address,
        /// Where the existing forwarder lives.
        address: Address,
    },

    /// The ledger failed to instantiate the forwarder at the derived address.
    #[error("deployment failed at {address:?}: {reason}")]
    DeploymentFailed {
        /// The derived address instantiation was attempted at.
        address: Address,
        /// Ledger-supplied failure reason.
        reason: String,
    },
}

impl FactoryError {
    /// Returns true if the caller can recover by correcting its request
    /// (as opposed to an execution-environment failure).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DeploymentFailed { .. })
    }
}

// =============================================================================
// SETTLEMENT ERRORS
// =============================================================================

/// Errors from the fee-settlement path.
///
/// All variants are recoverable by retrying with different amounts or after
/// gateway recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// Gross amount too small for the fee split to leave a meaningful net.
    #[error("insufficient amount: {gross} cannot cover the configured fees")]
    InsufficientAmount {
        /// The rejected gross amount.
        gross: U256,
    },

    /// The gateway cannot supply a quote for the configured asset pair.
    #[error("rate unavailable for pair {asset_in:?} -> {asset_out:?}")]
    RateUnavailable {
        /// Asset that would be converted.
        asset_in: Address,
        /// Reference asset that was requested.
        asset_out: Address,
    },

    /// An intermediate value exceeded the representable range.
    #[error("arithmetic overflow in fee computation")]
    ArithmeticOverflow,

    /// The gateway accepted the quote but the conversion failed.
    #[error("swap failed: {0}")]
    SwapFailed(String),
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from the forwarder ledger (execution environment).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Something already lives at the target address.
    #[error("address occupied: {0:?}")]
    AddressOccupied(Address),

    /// The execution environment rejected or could not apply the operation.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// GATEWAY ERRORS
// =============================================================================

/// Errors from the exchange gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No quote can be supplied for the requested pair.
    #[error("no quote for pair {asset_in:?} -> {asset_out:?}")]
    QuoteUnavailable {
        /// Asset that would be converted.
        asset_in: Address,
        /// Asset that was requested as output.
        asset_out: Address,
    },

    /// The swap executed against the quote was rejected.
    #[error("swap rejected: {0}")]
    SwapRejected(String),
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

/// Errors from the access-controlled configuration update path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Caller is not the configured owner.
    #[error("unauthorized: {caller:?} is not the owner {owner:?}")]
    Unauthorized {
        /// Who attempted the update.
        caller: Address,
        /// Who is allowed to update.
        owner: Address,
    },

    /// Combined fee rate exceeds 100%.
    #[error("fee rates exceed 100%: protocol {protocol_bps} + relayer {relayer_bps} bps")]
    FeeRateOutOfBounds {
        /// Requested protocol fee rate.
        protocol_bps: u16,
        /// Requested relayer fee rate.
        relayer_bps: u16,
    },

    /// A seeded prior deployment duplicates another beneficiary.
    #[error("duplicate prior deployment for beneficiary {0:?}")]
    DuplicatePriorDeployment(Address),
}

// =============================================================================
// TESTS
// =============================================================================
