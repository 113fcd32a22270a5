//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the factory and settlement engine depend on. External
//! adapters implement these traits to provide:
//! - The deployment registry (beneficiary -> record mapping)
//! - The forwarder ledger (content-addressed instantiation)
//! - The exchange gateway (quotes and swaps)
//! - The append-only event log
//!
//! Dependencies point INWARD: adapters implement these traits, the core
//! never reaches past them.

use crate::domain::entities::{DeploymentRecord, Quote};
use crate::domain::value_objects::{Address, Hash, LogicalTimestamp, U256};
use crate::errors::{FactoryError, GatewayError, LedgerError};
use crate::events::{EventEnvelope, EventKind};
use async_trait::async_trait;

// =============================================================================
// DEPLOYMENT REGISTRY
// =============================================================================

/// Exclusive owner of the beneficiary -> deployment-record mapping.
///
/// ## Invariants
///
/// - At most one record per beneficiary for the registry's lifetime.
/// - Records are immutable once created and never deleted.
/// - `register` is an atomic check-and-set: no interleaving may let two
///   callers both observe "not deployed" for the same beneficiary.
#[async_trait]
pub trait DeploymentRegistry: Send + Sync {
    /// Returns true if a record exists for the beneficiary.
    async fn is_deployed(&self, beneficiary: Address) -> bool;

    /// Registers a deployment. Fails with [`FactoryError::AlreadyDeployed`]
    /// if a record already exists for the beneficiary.
    async fn register(
        &self,
        beneficiary: Address,
        address: Address,
        created_at: LogicalTimestamp,
    ) -> Result<DeploymentRecord, FactoryError>;

    /// Looks up the record for a beneficiary, if any.
    async fn lookup(&self, beneficiary: Address) -> Option<DeploymentRecord>;

    /// Snapshot of all records, for audit and invariant checks.
    async fn records(&self) -> Vec<DeploymentRecord>;
}

// =============================================================================
// FORWARDER LEDGER (Execution Environment)
// =============================================================================

/// Content-addressed instantiation surface of the execution environment.
///
/// The ledger stores contract identities and balances; the core only needs
/// deploy-at-computed-address and an existence query.
#[async_trait]
pub trait ForwarderLedger: Send + Sync {
    /// Instantiates the forwarder template at exactly `address`.
    ///
    /// Fails with [`LedgerError::AddressOccupied`] if anything already
    /// lives there.
    async fn instantiate(
        &self,
        address: Address,
        template_hash: Hash,
        forward_to: Address,
    ) -> Result<(), LedgerError>;

    /// Template hash of the code living at `address`, if any.
    async fn code_at(&self, address: Address) -> Option<Hash>;

    /// Returns true if something lives at `address`.
    async fn exists(&self, address: Address) -> bool {
        self.code_at(address).await.is_some()
    }
}

// =============================================================================
// EXCHANGE GATEWAY
// =============================================================================

/// Externally-priced conversion surface.
///
/// Both operations are fallible; the core assumes no atomicity beyond what
/// the surrounding operation already provides and therefore quotes before
/// it commits to anything (compute-then-act).
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Quotes how much `asset_out` the gateway would deliver for
    /// `amount_in` of `asset_in`.
    async fn quote(
        &self,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
    ) -> Result<Quote, GatewayError>;

    /// Executes the conversion. Fails if fewer than `min_out` units of
    /// `asset_out` would be delivered.
    async fn swap(
        &self,
        asset_in: Address,
        asset_out: Address,
        amount_in: U256,
        min_out: U256,
    ) -> Result<U256, GatewayError>;
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Append-only audit trail, queryable by kind.
///
/// The log and the registry must never diverge: the service appends inside
/// the same critical section that registers the deployment.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Appends a committed entry.
    async fn append(&self, envelope: EventEnvelope);

    /// All entries of the given kind, in commit order.
    async fn query(&self, kind: EventKind) -> Vec<EventEnvelope>;

    /// Total number of committed entries.
    async fn len(&self) -> usize;

    /// Returns true if nothing has been committed.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
