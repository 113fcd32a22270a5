//! # Domain Invariants
//!
//! Critical invariants that MUST hold across provisioning and settlement.
//! These are checked at runtime in tests and can be asserted by callers
//! that need end-to-end verification.

use crate::domain::entities::{DeploymentRecord, FactoryConfig, FeeSplit};
use crate::domain::services::derive_forwarder_address;
use crate::domain::value_objects::{Address, Hash};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Fee-split exactness: the three parts sum to the gross amount exactly.
///
/// No rounding loss may escape the split. The split is caller-supplied, so
/// a part sum that overflows U256 counts as a violation rather than a
/// panic.
#[must_use]
pub fn check_split_exactness(split: &FeeSplit) -> bool {
    split
        .protocol_fee
        .checked_add(split.relayer_fee)
        .and_then(|sum| sum.checked_add(split.net_amount))
        .is_some_and(|sum| sum == split.gross_amount)
}

/// Fee-rate bounds: combined protocol + relayer rate fits within 100%.
#[must_use]
pub fn check_fee_rate_bounds(config: &FactoryConfig) -> bool {
    config.total_fee_bps().is_some()
}

/// Derivation determinism: deriving twice with identical inputs yields
/// identical output.
#[must_use]
pub fn check_derivation_determinism(
    factory: Address,
    beneficiary: Address,
    template_hash: Hash,
) -> bool {
    derive_forwarder_address(factory, beneficiary, template_hash)
        == derive_forwarder_address(factory, beneficiary, template_hash)
}

/// Record consistency: a deployment record's address equals the derived
/// address for its beneficiary.
#[must_use]
pub fn check_record_consistency(
    record: &DeploymentRecord,
    factory: Address,
    template_hash: Hash,
) -> bool {
    record.address == derive_forwarder_address(factory, record.beneficiary, template_hash)
}

/// Registry uniqueness: at most one record per beneficiary.
#[must_use]
pub fn check_registry_uniqueness(records: &[DeploymentRecord]) -> bool {
    let mut seen = std::collections::HashSet::new();
    records.iter().all(|r| seen.insert(r.beneficiary))
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(
    config: &FactoryConfig,
    factory: Address,
    template_hash: Hash,
    records: &[DeploymentRecord],
    splits: &[FeeSplit],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_fee_rate_bounds(config) {
        violations.push(InvariantViolation::FeeRateOutOfBounds {
            protocol_bps: config.protocol_fee_bps.get(),
            relayer_bps: config.relayer_fee_bps.get(),
        });
    }

    for split in splits {
        if !check_split_exactness(split) {
            violations.push(InvariantViolation::SplitNotExact {
                gross: split.gross_amount.to_string(),
            });
        }
    }

    for record in records {
        if !check_record_consistency(record, factory, template_hash) {
            violations.push(InvariantViolation::RecordInconsistent {
                beneficiary: record.beneficiary,
            });
        }
    }

    if !check_registry_uniqueness(records) {
        violations.push(InvariantViolation::DuplicateRecord);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Combined fee rate exceeds 100%.
    FeeRateOutOfBounds {
        /// Configured protocol rate.
        protocol_bps: u16,
        /// Configured relayer rate.
        relayer_bps: u16,
    },
    /// A fee split does not sum to its gross amount.
    SplitNotExact {
        /// Gross amount of the offending split.
        gross: String,
    },
    /// A record's address does not match the derivation for its beneficiary.
    RecordInconsistent {
        /// Beneficiary of the offending record.
        beneficiary: Address,
    },
    /// More than one record exists for a beneficiary.
    DuplicateRecord,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FeeRateOutOfBounds {
                protocol_bps,
                relayer_bps,
            } => {
                write!(
                    f,
                    "fee rates exceed 100%: {protocol_bps} + {relayer_bps} bps"
                )
            }
            Self::SplitNotExact { gross } => {
                write!(f, "fee split does not sum to gross amount {gross}")
            }
            Self::RecordInconsistent { beneficiary } => {
                write!(
                    f,
                    "record address does not match derivation for {beneficiary:?}"
                )
            }
            Self::DuplicateRecord => {
                write!(f, "more than one record for a beneficiary")
            }
        }
    }
}

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Configuration limits.
pub mod limits {
    /// Maximum combined fee rate (100%).
    pub const MAX_TOTAL_FEE_BPS: u16 = 10_000;

    /// Logical timestamp carried by seeded prior deployments.
    pub const SEED_TIMESTAMP: u64 = 0;
}

// =============================================================================
// TESTS
// =============================================================================
