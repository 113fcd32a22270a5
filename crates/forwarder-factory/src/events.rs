//! # Event Schema
//!
//! Audit-trail payloads appended by the factory and the settlement engine.
//!
//! The event log is the sole source of truth for "which beneficiaries have
//! been provisioned": exactly one `ForwarderCreated` entry exists per
//! successful creation, and the log never diverges from the registry
//! (registration and emission commit together).

use crate::domain::value_objects::{Address, LogicalTimestamp, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// EVENT KINDS
// =============================================================================

/// Kind discriminator for querying the append-only log.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EventKind {
    /// A forwarder was provisioned.
    ForwarderCreated,
    /// A gross amount was split and converted.
    FeesSettled,
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Emitted exactly once per successful `create_forwarder`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ForwarderCreatedPayload {
    /// The just-created live address (equals the pre-queried derivation).
    pub created_address: Address,
    /// The beneficiary the forwarder relays for.
    pub forward_to: Address,
}

/// Emitted once per successful settlement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FeesSettledPayload {
    /// Correlation ID assigned to the settlement operation.
    pub correlation_id: Uuid,
    /// Gross amount that was split.
    pub gross_amount: U256,
    /// Protocol fee taken (includes rounding residual).
    pub protocol_fee: U256,
    /// Relayer fee taken.
    pub relayer_fee: U256,
    /// Net payout after fees.
    pub net_amount: U256,
    /// Reference-asset amount the gateway delivered for the fee portion.
    pub converted_out: U256,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// A committed log entry: payload plus the logical timestamp it was
/// appended at.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Kind discriminator for filtered queries.
    pub kind: EventKind,
    /// Logical timestamp assigned at commit.
    pub committed_at: LogicalTimestamp,
    /// The payload.
    pub payload: EventPayload,
}

/// Union of all payload types carried by the log.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EventPayload {
    /// Forwarder provisioning entry.
    ForwarderCreated(ForwarderCreatedPayload),
    /// Fee settlement entry.
    FeesSettled(FeesSettledPayload),
}

impl EventPayload {
    /// Kind discriminator for this payload.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ForwarderCreated(_) => EventKind::ForwarderCreated,
            Self::FeesSettled(_) => EventKind::FeesSettled,
        }
    }
}

// =============================================================================
// TOPICS
// =============================================================================

/// Topic names for consumers subscribing to the audit trail.
pub mod topics {
    /// Topic for forwarder creation entries.
    pub const FORWARDER_CREATED: &str = "forwarder_factory.forwarder.created";

    /// Topic for fee settlement entries.
    pub const FEES_SETTLED: &str = "forwarder_factory.fees.settled";
}

// =============================================================================
// TESTS
// =============================================================================
