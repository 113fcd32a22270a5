//! # Forwarder Factory - Deterministic Provisioning & Fee Settlement
//!
//! ## Purpose
//!
//! Provisions per-beneficiary forwarders at deterministically derived
//! addresses and settles relayed value through an exact basis-point fee
//! split. Addresses are computable before provisioning, each beneficiary
//! gets at most one forwarder, and no amount is ever created or destroyed
//! by a split.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Derivation Determinism | `domain/services.rs` - `derive_forwarder_address()` |
//! | INVARIANT-2 | One Forwarder Per Beneficiary | `adapters/registry.rs` - atomic check-and-set in `register()` |
//! | INVARIANT-3 | Split Exactness | `domain/services.rs` - `split_fees()` (remainder to protocol fee) |
//! | INVARIANT-4 | No Partial Provisioning | `service.rs` - registration and event commit after instantiation |
//! | INVARIANT-5 | Compute Then Act | `service.rs` - `FeeSettlementEngine::settle()` quotes and splits before swapping |
//!
//! ## Architecture
//!
//! Hexagonal: pure domain logic at the core, driven ports
//! (`DeploymentRegistry`, `ForwarderLedger`, `ExchangeGateway`, `EventLog`)
//! at the seams, in-memory adapters for testing and single-process use.
//!
//! ## Usage Example
//!
//! ```ignore
//! use forwarder_factory::prelude::*;
//!
//! let service = InMemoryFactoryService::in_memory(factory_identity, config).await?;
//!
//! // Address is known before provisioning.
//! let predicted = service.get_forwarder(beneficiary)?;
//! let record = service.create_forwarder(beneficiary).await?;
//! assert_eq!(record.address, predicted);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{DeploymentRecord, FactoryConfig, FeeSplit, Quote};

    // Value objects
    pub use crate::domain::value_objects::{Address, BasisPoints, Hash, LogicalTimestamp, U256};

    // Domain services
    pub use crate::domain::services::{
        derive_forwarder_address, forwarder_template_hash, keccak256, split_fees,
    };

    // Ports
    pub use crate::ports::inbound::{FeeConfigUpdate, FeeSettlement, ForwarderProvisioning};
    pub use crate::ports::outbound::{
        DeploymentRegistry, EventLog, ExchangeGateway, ForwarderLedger,
    };

    // Adapters
    pub use crate::adapters::{
        FixedRateGateway, InMemoryEventLog, InMemoryLedger, InMemoryRegistry,
    };

    // Services
    pub use crate::service::{
        FeeSettlementEngine, ForwarderFactoryService, InMemoryFactoryService, ServiceStats,
    };

    // Errors
    pub use crate::errors::{
        ConfigError, FactoryError, GatewayError, LedgerError, SettlementError,
    };

    // Events
    pub use crate::events::{
        EventEnvelope, EventKind, EventPayload, FeesSettledPayload, ForwarderCreatedPayload,
    };
}

// =============================================================================
// VERSION
// =============================================================================

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
