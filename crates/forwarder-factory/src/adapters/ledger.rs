//! # Ledger Adapter
//!
//! In-memory execution environment for testing and single-process use.
//! Supports content-addressed instantiation and an injectable failure mode
//! for exercising the no-partial-state guarantee.

use crate::domain::value_objects::{Address, Hash};
use crate::errors::LedgerError;
use crate::ports::outbound::ForwarderLedger;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory contract ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    /// address -> (template hash, forward-to beneficiary)
    deployed: RwLock<HashMap<Address, (Hash, Address)>>,
    /// When set, every instantiation fails. Test hook for the
    /// deployment-failure path.
    fail_instantiations: AtomicBool,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent instantiation fail (or succeed again).
    pub fn set_fail_instantiations(&self, fail: bool) {
        self.fail_instantiations.store(fail, Ordering::SeqCst);
    }

    /// The beneficiary the forwarder at `address` relays for, if deployed.
    #[must_use]
    pub fn forward_target(&self, address: Address) -> Option<Address> {
        self.deployed
            .read()
            .unwrap()
            .get(&address)
            .map(|(_, to)| *to)
    }
}

#[async_trait]
impl ForwarderLedger for InMemoryLedger {
    async fn instantiate(
        &self,
        address: Address,
        template_hash: Hash,
        forward_to: Address,
    ) -> Result<(), LedgerError> {
        if self.fail_instantiations.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable(
                "instantiation rejected".to_string(),
            ));
        }

        let mut deployed = self.deployed.write().unwrap();
        if deployed.contains_key(&address) {
            return Err(LedgerError::AddressOccupied(address));
        }
        deployed.insert(address, (template_hash, forward_to));
        Ok(())
    }

    async fn code_at(&self, address: Address) -> Option<Hash> {
        self.deployed
            .read()
            .unwrap()
            .get(&address)
            .map(|(hash, _)| *hash)
    }
}

// =============================================================================
// TESTS
// =============================================================================
