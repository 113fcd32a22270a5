//! # Domain Services
//!
//! Pure business logic for address derivation and fee arithmetic.
//! These functions are deterministic and have no side effects.
//!
//! - NO I/O operations
//! - NO async code
//! - Pure functions only

use crate::domain::value_objects::{Address, BasisPoints, Hash, U256};
use crate::errors::SettlementError;
use sha3::{Digest, Keccak256};

// =============================================================================
// FORWARDER ADDRESS DERIVATION
// =============================================================================

/// Domain-separation tag mixed into every forwarder address derivation.
///
/// Keeps forwarder addresses disjoint from any other content-addressed
/// derivation scheme sharing the hash function.
pub const DERIVATION_TAG: u8 = 0xF4;

/// Identity of the forwarder template whose hash participates in derivation.
///
/// The ledger instantiates this template at the derived address; changing
/// the template changes every derived address.
pub const FORWARDER_TEMPLATE: &[u8] = b"forwarder/v1";

/// Computes the keccak256 hash of the forwarder template.
#[must_use]
pub fn forwarder_template_hash() -> Hash {
    keccak256(FORWARDER_TEMPLATE)
}

/// Derives the deterministic forwarder address for a beneficiary.
///
/// Address = keccak256(tag ++ factory ++ beneficiary ++ `template_hash`)\[12:\]
///
/// Salted content-addressed instantiation (EIP-1014 shape): the beneficiary
/// acts as the salt. Pure and total; callable before anything is deployed,
/// and calling it twice with identical inputs yields identical output
/// regardless of registry state.
#[must_use]
pub fn derive_forwarder_address(
    factory: Address,
    beneficiary: Address,
    template_hash: Hash,
) -> Address {
    let mut data = Vec::with_capacity(73);
    data.push(DERIVATION_TAG);
    data.extend_from_slice(factory.as_bytes());
    data.extend_from_slice(beneficiary.as_bytes());
    data.extend_from_slice(template_hash.as_bytes());

    let hash = Keccak256::digest(&data);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}

// =============================================================================
// FEE SPLIT ARITHMETIC
// =============================================================================

/// Splits a gross amount into protocol fee, relayer fee, and net payout.
///
/// All arithmetic is integer and exact:
/// - `relayer_fee = floor(gross * relayer_bps / 10_000)`
/// - `net_amount = floor(gross * (10_000 - protocol_bps - relayer_bps) / 10_000)`
/// - `protocol_fee = gross - relayer_fee - net_amount`
///
/// The protocol fee therefore equals its own floor value plus whatever
/// rounding residual the two floors left over, and the three parts always
/// sum to the gross amount exactly.
///
/// # Errors
///
/// - [`SettlementError::ArithmeticOverflow`] if an intermediate product
///   exceeds the U256 range, or the combined fee rate exceeds 100%.
/// - [`SettlementError::InsufficientAmount`] if the gross amount is zero, or
///   is dust that the fees would consume entirely while a net share is
///   configured.
pub fn split_fees(
    gross: U256,
    protocol_bps: BasisPoints,
    relayer_bps: BasisPoints,
) -> Result<crate::domain::entities::FeeSplit, SettlementError> {
    if gross.is_zero() {
        return Err(SettlementError::InsufficientAmount { gross });
    }

    let total_bps = protocol_bps
        .checked_add(relayer_bps)
        .ok_or(SettlementError::ArithmeticOverflow)?;
    let net_bps = u64::from(BasisPoints::MAX - total_bps.get());
    let denominator = U256::from(BasisPoints::MAX);

    let relayer_fee = gross
        .checked_mul(U256::from(u64::from(relayer_bps.get())))
        .ok_or(SettlementError::ArithmeticOverflow)?
        / denominator;
    let net_amount = gross
        .checked_mul(U256::from(net_bps))
        .ok_or(SettlementError::ArithmeticOverflow)?
        / denominator;

    // Dust: a net share is configured but the amount floors it to zero.
    if net_amount.is_zero() && net_bps > 0 {
        return Err(SettlementError::InsufficientAmount { gross });
    }

    // Both subtrahends are floors of disjoint shares of gross, so this
    // cannot underflow.
    let protocol_fee = gross - relayer_fee - net_amount;

    Ok(crate::domain::entities::FeeSplit {
        gross_amount: gross,
        protocol_fee,
        relayer_fee,
        net_amount,
    })
}

// =============================================================================
// KECCAK256 UTILITY
// =============================================================================

/// Computes keccak256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let hash = Keccak256::digest(data);
    Hash::new(hash.into())
}

// =============================================================================
// TESTS
// =============================================================================
