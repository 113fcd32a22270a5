//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for forwarder provisioning and fee settlement.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `ForwarderProvisioning`, `FeeSettlement`,
//!   `FeeConfigUpdate`
//! - **Driven Ports (Outbound)**: `DeploymentRegistry`, `ForwarderLedger`,
//!   `ExchangeGateway`, `EventLog`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
