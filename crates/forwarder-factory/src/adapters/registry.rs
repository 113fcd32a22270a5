//! # Registry Adapter
//!
//! In-memory deployment registry. Production deployments would back this
//! with the execution environment's transactional store; the trait contract
//! is identical.

use crate::domain::entities::DeploymentRecord;
use crate::domain::value_objects::{Address, LogicalTimestamp};
use crate::errors::FactoryError;
use crate::ports::outbound::DeploymentRegistry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory beneficiary -> record mapping.
///
/// The check-and-set in `register` holds the write lock across both the
/// lookup and the insert, so two concurrent callers can never both observe
/// "not deployed" for the same beneficiary.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    records: RwLock<HashMap<Address, DeploymentRecord>>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeploymentRegistry for InMemoryRegistry {
    async fn is_deployed(&self, beneficiary: Address) -> bool {
        self.records.read().unwrap().contains_key(&beneficiary)
    }

    async fn register(
        &self,
        beneficiary: Address,
        address: Address,
        created_at: LogicalTimestamp,
    ) -> Result<DeploymentRecord, FactoryError> {
        let mut records = self.records.write().unwrap();
        if let Some(existing) = records.get(&beneficiary) {
            return Err(FactoryError::AlreadyDeployed {
                beneficiary,
                address: existing.address,
            });
        }
        let record = DeploymentRecord::new(beneficiary, address, created_at);
        records.insert(beneficiary, record);
        Ok(record)
    }

    async fn lookup(&self, beneficiary: Address) -> Option<DeploymentRecord> {
        self.records.read().unwrap().get(&beneficiary).copied()
    }

    async fn records(&self) -> Vec<DeploymentRecord> {
        self.records.read().unwrap().values().copied().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
