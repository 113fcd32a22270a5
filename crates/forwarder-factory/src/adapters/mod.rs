//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the driven ports for testing and
//! single-process deployments.
//!
//! - Adapters implement domain ports
//! - Production deployments substitute durable/remote implementations
//!   behind the same traits

pub mod event_log;
pub mod gateway;
pub mod ledger;
pub mod registry;

pub use event_log::*;
pub use gateway::*;
pub use ledger::*;
pub use registry::*;
