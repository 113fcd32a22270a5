//! # Core Domain Entities
//!
//! Main business entities for forwarder provisioning and fee settlement.

use crate::domain::value_objects::{Address, BasisPoints, LogicalTimestamp, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// FACTORY CONFIGURATION
// =============================================================================

/// Configuration for the forwarder factory and fee-settlement engine.
///
/// Set once at construction. The fee rates are mutable only through the
/// access-controlled update path on the service; every other field is
/// immutable for the lifetime of the factory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Exchange gateway that supplies quotes and executes swaps.
    pub exchange_gateway: Address,
    /// Reference asset that collected fees are converted into.
    pub reference_asset: Address,
    /// Swap router consulted by the gateway.
    pub router: Address,
    /// Protocol fee rate in basis points.
    pub protocol_fee_bps: BasisPoints,
    /// Relayer fee rate in basis points.
    pub relayer_fee_bps: BasisPoints,
    /// Owner allowed to update the fee rates.
    pub owner: Address,
    /// Beneficiaries whose forwarders were provisioned before this factory
    /// instance existed. Seeded into the registry at construction.
    pub prior_deployments: Vec<Address>,
}

impl FactoryConfig {
    /// Combined fee rate, if the two rates fit within 100%.
    #[must_use]
    pub fn total_fee_bps(&self) -> Option<BasisPoints> {
        self.protocol_fee_bps.checked_add(self.relayer_fee_bps)
    }
}

// =============================================================================
// DEPLOYMENT RECORD
// =============================================================================

/// Record of a provisioned forwarder.
///
/// Created exactly once per beneficiary, immutable after creation, never
/// deleted. The registry owns the beneficiary -> record mapping.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The beneficiary this forwarder relays for.
    pub beneficiary: Address,
    /// The derived address the forwarder lives at.
    pub address: Address,
    /// Logical timestamp assigned at registration.
    pub created_at: LogicalTimestamp,
}

impl DeploymentRecord {
    /// Creates a new record.
    #[must_use]
    pub const fn new(beneficiary: Address, address: Address, created_at: LogicalTimestamp) -> Self {
        Self {
            beneficiary,
            address,
            created_at,
        }
    }
}

// =============================================================================
// FEE SPLIT
// =============================================================================

/// Result of splitting a gross value amount into fee portions.
///
/// ## Invariants
/// - `protocol_fee + relayer_fee + net_amount == gross_amount` exactly.
/// - All parts are non-negative (unsigned by construction).
/// - Rounding residual from the basis-point floors is assigned to the
///   protocol fee.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FeeSplit {
    /// The gross amount the split was computed over.
    pub gross_amount: U256,
    /// Portion retained by the protocol (includes any rounding residual).
    pub protocol_fee: U256,
    /// Portion compensating the relayer.
    pub relayer_fee: U256,
    /// Portion paid out net of fees.
    pub net_amount: U256,
}

impl FeeSplit {
    /// Total fee portion (protocol + relayer). Cannot overflow: both parts
    /// are bounded by the gross amount.
    #[must_use]
    pub fn total_fees(&self) -> U256 {
        self.protocol_fee + self.relayer_fee
    }
}

// =============================================================================
// SETTLEMENT QUOTE
// =============================================================================

/// A conversion quote supplied by the exchange gateway.
///
/// Expresses how much of the reference asset `amount_out` the gateway will
/// deliver for `amount_in` of the input asset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Asset being converted.
    pub asset_in: Address,
    /// Reference asset being converted into.
    pub asset_out: Address,
    /// Input amount the quote was computed for.
    pub amount_in: U256,
    /// Output amount the gateway expects to deliver.
    pub amount_out: U256,
}

// =============================================================================
// TESTS
// =============================================================================
