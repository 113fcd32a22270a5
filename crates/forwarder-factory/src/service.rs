//! # Factory & Settlement Services
//!
//! Production orchestrators wiring the domain logic to the driven ports.
//!
//! - [`ForwarderFactoryService`]: derive -> check -> instantiate -> register
//!   -> emit, under a provisioning lock so the uniqueness invariant holds
//!   under real parallelism.
//! - [`FeeSettlementEngine`]: quote -> split -> swap, compute-then-act.
//!
//! Registration and event emission happen inside the same critical section,
//! so the registry and the audit log never diverge.

use crate::adapters::{InMemoryEventLog, InMemoryLedger, InMemoryRegistry};
use crate::domain::entities::{DeploymentRecord, FactoryConfig, FeeSplit};
use crate::domain::services::{derive_forwarder_address, forwarder_template_hash, split_fees};
use crate::domain::value_objects::{Address, BasisPoints, Hash, LogicalTimestamp, U256};
use crate::errors::{ConfigError, FactoryError, GatewayError, SettlementError};
use crate::events::{
    EventEnvelope, EventKind, EventPayload, FeesSettledPayload, ForwarderCreatedPayload,
};
use crate::ports::inbound::{FeeConfigUpdate, FeeSettlement, ForwarderProvisioning};
use crate::ports::outbound::{DeploymentRegistry, EventLog, ExchangeGateway, ForwarderLedger};

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// SERVICE STATISTICS
// =============================================================================

/// Counters maintained across provisioning and settlement.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Forwarders provisioned by this instance (excludes seeded records).
    pub forwarders_provisioned: u64,
    /// `create_forwarder` calls rejected as duplicates.
    pub duplicates_rejected: u64,
    /// `create_forwarder` calls that failed at the ledger.
    pub deployments_failed: u64,
    /// Settlements committed.
    pub settlements_completed: u64,
    /// Settlements that failed at any stage.
    pub settlements_failed: u64,
    /// Sum of protocol fees taken.
    pub total_protocol_fees: U256,
    /// Sum of relayer fees taken.
    pub total_relayer_fees: U256,
}

// =============================================================================
// FORWARDER FACTORY SERVICE
// =============================================================================

/// The forwarder factory.
///
/// Owns the [`FactoryConfig`] (shared read-only with the settlement engine)
/// and orchestrates provisioning against the registry, ledger, and event
/// log ports.
pub struct ForwarderFactoryService<R, L, E>
where
    R: DeploymentRegistry,
    L: ForwarderLedger,
    E: EventLog,
{
    /// This factory's own identity, mixed into every derivation.
    identity: Address,
    /// Shared configuration; fee rates mutable only via `update_fees`.
    config: Arc<RwLock<FactoryConfig>>,
    /// Template hash mixed into every derivation, fixed at construction.
    template_hash: Hash,
    registry: Arc<R>,
    ledger: Arc<L>,
    log: Arc<E>,
    /// Serializes the mutating provisioning path. The registry's own
    /// check-and-set is also atomic; the lock additionally keeps the
    /// ledger instantiation and the event append inside one commit.
    provisioning_lock: Mutex<()>,
    /// Logical clock; seeded records carry timestamp 0, live registrations
    /// start at 1.
    clock: Arc<AtomicU64>,
    stats: Arc<RwLock<ServiceStats>>,
}

/// Factory service wired to the in-memory adapters.
pub type InMemoryFactoryService =
    ForwarderFactoryService<InMemoryRegistry, InMemoryLedger, InMemoryEventLog>;

impl<R, L, E> std::fmt::Debug for ForwarderFactoryService<R, L, E>
where
    R: DeploymentRegistry,
    L: ForwarderLedger,
    E: EventLog,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwarderFactoryService")
            .field("identity", &self.identity)
            .field("template_hash", &self.template_hash)
            .finish_non_exhaustive()
    }
}

impl<R, L, E> ForwarderFactoryService<R, L, E>
where
    R: DeploymentRegistry,
    L: ForwarderLedger,
    E: EventLog,
{
    /// Creates a factory service and seeds the registry with the
    /// configuration's prior deployments (logical timestamp 0, no events:
    /// their creation was audited wherever they were provisioned).
    ///
    /// # Errors
    ///
    /// - [`ConfigError::FeeRateOutOfBounds`] if the combined fee rate
    ///   exceeds 100%.
    /// - [`ConfigError::DuplicatePriorDeployment`] if the seed list names a
    ///   beneficiary twice.
    pub async fn new(
        identity: Address,
        config: FactoryConfig,
        registry: Arc<R>,
        ledger: Arc<L>,
        log: Arc<E>,
    ) -> Result<Self, ConfigError> {
        if config.total_fee_bps().is_none() {
            return Err(ConfigError::FeeRateOutOfBounds {
                protocol_bps: config.protocol_fee_bps.get(),
                relayer_bps: config.relayer_fee_bps.get(),
            });
        }

        let template_hash = forwarder_template_hash();

        for &beneficiary in &config.prior_deployments {
            let address = derive_forwarder_address(identity, beneficiary, template_hash);
            registry
                .register(beneficiary, address, 0)
                .await
                .map_err(|_| ConfigError::DuplicatePriorDeployment(beneficiary))?;
        }
        let seeded = config.prior_deployments.len();
        if seeded > 0 {
            info!(seeded, "Seeded registry with prior deployments");
        }

        Ok(Self {
            identity,
            config: Arc::new(RwLock::new(config)),
            template_hash,
            registry,
            ledger,
            log,
            provisioning_lock: Mutex::new(()),
            clock: Arc::new(AtomicU64::new(1)),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// This factory's identity.
    #[must_use]
    pub fn identity(&self) -> Address {
        self.identity
    }

    /// The template hash mixed into every derivation.
    #[must_use]
    pub fn template_hash(&self) -> Hash {
        self.template_hash
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> FactoryConfig {
        self.config.read().await.clone()
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Builds a settlement engine sharing this factory's configuration,
    /// audit log, logical clock, and statistics.
    ///
    /// `collected_asset` is the asset relayed value accrues in; settlements
    /// convert fee portions from it into the configured reference asset.
    pub fn settlement_engine<G: ExchangeGateway>(
        &self,
        gateway: Arc<G>,
        collected_asset: Address,
    ) -> FeeSettlementEngine<G, E> {
        FeeSettlementEngine {
            config: Arc::clone(&self.config),
            gateway,
            log: Arc::clone(&self.log),
            collected_asset,
            clock: Arc::clone(&self.clock),
            stats: Arc::clone(&self.stats),
        }
    }

    fn next_timestamp(&self) -> LogicalTimestamp {
        self.clock.fetch_add(1, Ordering::SeqCst)
    }
}

impl InMemoryFactoryService {
    /// Convenience constructor wiring fresh in-memory adapters.
    ///
    /// # Errors
    ///
    /// Same as [`ForwarderFactoryService::new`].
    pub async fn in_memory(identity: Address, config: FactoryConfig) -> Result<Self, ConfigError> {
        Self::new(
            identity,
            config,
            Arc::new(InMemoryRegistry::new()),
            Arc::new(InMemoryLedger::new()),
            Arc::new(InMemoryEventLog::new()),
        )
        .await
    }

    /// The in-memory ledger, for test assertions.
    #[must_use]
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    /// The in-memory event log, for test assertions.
    #[must_use]
    pub fn event_log(&self) -> &InMemoryEventLog {
        &self.log
    }
}

#[async_trait]
impl<R, L, E> ForwarderProvisioning for ForwarderFactoryService<R, L, E>
where
    R: DeploymentRegistry,
    L: ForwarderLedger,
    E: EventLog,
{
    #[instrument(skip(self), fields(beneficiary = %beneficiary))]
    async fn create_forwarder(
        &self,
        beneficiary: Address,
    ) -> Result<DeploymentRecord, FactoryError> {
        if beneficiary.is_zero() {
            warn!("Rejected provisioning for zero beneficiary");
            return Err(FactoryError::InvalidBeneficiary(beneficiary));
        }

        let target = derive_forwarder_address(self.identity, beneficiary, self.template_hash);

        // Critical section: registry check, instantiation, registration and
        // event append commit together or not at all.
        let _guard = self.provisioning_lock.lock().await;

        if let Some(existing) = self.registry.lookup(beneficiary).await {
            debug!(address = %existing.address, "Duplicate provisioning request");
            self.stats.write().await.duplicates_rejected += 1;
            return Err(FactoryError::AlreadyDeployed {
                beneficiary,
                address: existing.address,
            });
        }

        if let Err(err) = self
            .ledger
            .instantiate(target, self.template_hash, beneficiary)
            .await
        {
            warn!(address = %target, error = %err, "Forwarder instantiation failed");
            self.stats.write().await.deployments_failed += 1;
            return Err(FactoryError::DeploymentFailed {
                address: target,
                reason: err.to_string(),
            });
        }

        let created_at = self.next_timestamp();
        let record = self.registry.register(beneficiary, target, created_at).await?;

        self.log
            .append(EventEnvelope {
                kind: EventKind::ForwarderCreated,
                committed_at: created_at,
                payload: EventPayload::ForwarderCreated(ForwarderCreatedPayload {
                    created_address: target,
                    forward_to: beneficiary,
                }),
            })
            .await;

        self.stats.write().await.forwarders_provisioned += 1;
        info!(address = %target, "Forwarder provisioned");
        Ok(record)
    }

    fn get_forwarder(&self, beneficiary: Address) -> Result<Address, FactoryError> {
        if beneficiary.is_zero() {
            return Err(FactoryError::InvalidBeneficiary(beneficiary));
        }
        Ok(derive_forwarder_address(
            self.identity,
            beneficiary,
            self.template_hash,
        ))
    }

    async fn is_deployed(&self, beneficiary: Address) -> bool {
        self.registry.is_deployed(beneficiary).await
    }
}

#[async_trait]
impl<R, L, E> FeeConfigUpdate for ForwarderFactoryService<R, L, E>
where
    R: DeploymentRegistry,
    L: ForwarderLedger,
    E: EventLog,
{
    #[instrument(skip(self), fields(caller = %caller))]
    async fn update_fees(
        &self,
        caller: Address,
        protocol_fee_bps: BasisPoints,
        relayer_fee_bps: BasisPoints,
    ) -> Result<(), ConfigError> {
        let mut config = self.config.write().await;

        if caller != config.owner {
            warn!(owner = %config.owner, "Unauthorized fee update attempt");
            return Err(ConfigError::Unauthorized {
                caller,
                owner: config.owner,
            });
        }

        if protocol_fee_bps.checked_add(relayer_fee_bps).is_none() {
            return Err(ConfigError::FeeRateOutOfBounds {
                protocol_bps: protocol_fee_bps.get(),
                relayer_bps: relayer_fee_bps.get(),
            });
        }

        config.protocol_fee_bps = protocol_fee_bps;
        config.relayer_fee_bps = relayer_fee_bps;
        info!(
            protocol_bps = protocol_fee_bps.get(),
            relayer_bps = relayer_fee_bps.get(),
            "Fee rates updated"
        );
        Ok(())
    }
}

// =============================================================================
// FEE SETTLEMENT ENGINE
// =============================================================================

/// The fee-settlement engine.
///
/// Shares the factory's configuration and audit log. Ordering is strictly
/// compute-then-act: the quote is fetched and the split computed and
/// validated before the gateway is instructed to convert anything, so a
/// failed swap leaves no durable fee-accounting state behind.
pub struct FeeSettlementEngine<G, E>
where
    G: ExchangeGateway,
    E: EventLog,
{
    config: Arc<RwLock<FactoryConfig>>,
    gateway: Arc<G>,
    log: Arc<E>,
    /// Asset collected value is denominated in (conversion input).
    collected_asset: Address,
    clock: Arc<AtomicU64>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<G, E> std::fmt::Debug for FeeSettlementEngine<G, E>
where
    G: ExchangeGateway,
    E: EventLog,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeSettlementEngine")
            .field("collected_asset", &self.collected_asset)
            .finish_non_exhaustive()
    }
}

impl<G, E> FeeSettlementEngine<G, E>
where
    G: ExchangeGateway,
    E: EventLog,
{
    /// Asset the engine converts from.
    #[must_use]
    pub fn collected_asset(&self) -> Address {
        self.collected_asset
    }

    fn map_gateway_error(err: GatewayError) -> SettlementError {
        match err {
            GatewayError::QuoteUnavailable {
                asset_in,
                asset_out,
            } => SettlementError::RateUnavailable {
                asset_in,
                asset_out,
            },
            GatewayError::SwapRejected(reason) => SettlementError::SwapFailed(reason),
        }
    }
}

#[async_trait]
impl<G, E> FeeSettlement for FeeSettlementEngine<G, E>
where
    G: ExchangeGateway,
    E: EventLog,
{
    #[instrument(skip(self), fields(gross = %gross_amount))]
    async fn settle(&self, gross_amount: U256) -> Result<FeeSplit, SettlementError> {
        let correlation_id = Uuid::new_v4();
        let (protocol_bps, relayer_bps, reference_asset) = {
            let config = self.config.read().await;
            (
                config.protocol_fee_bps,
                config.relayer_fee_bps,
                config.reference_asset,
            )
        };

        let result = self
            .settle_inner(
                correlation_id,
                gross_amount,
                protocol_bps,
                relayer_bps,
                reference_asset,
            )
            .await;

        match &result {
            Ok(split) => {
                let mut stats = self.stats.write().await;
                stats.settlements_completed += 1;
                stats.total_protocol_fees = stats
                    .total_protocol_fees
                    .saturating_add(split.protocol_fee);
                stats.total_relayer_fees =
                    stats.total_relayer_fees.saturating_add(split.relayer_fee);
            }
            Err(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "Settlement failed");
                self.stats.write().await.settlements_failed += 1;
            }
        }
        result
    }
}

impl<G, E> FeeSettlementEngine<G, E>
where
    G: ExchangeGateway,
    E: EventLog,
{
    async fn settle_inner(
        &self,
        correlation_id: Uuid,
        gross_amount: U256,
        protocol_bps: BasisPoints,
        relayer_bps: BasisPoints,
        reference_asset: Address,
    ) -> Result<FeeSplit, SettlementError> {
        // Compute phase: split and quote, no side effects yet.
        let split = split_fees(gross_amount, protocol_bps, relayer_bps)?;
        let fee_total = split.total_fees();

        let converted_out = if fee_total.is_zero() {
            // Nothing to convert; the split itself is still committed.
            U256::zero()
        } else {
            let quote = self
                .gateway
                .quote(self.collected_asset, reference_asset, fee_total)
                .await
                .map_err(Self::map_gateway_error)?;

            // Act phase: the quoted output is the minimum we accept.
            self.gateway
                .swap(
                    self.collected_asset,
                    reference_asset,
                    fee_total,
                    quote.amount_out,
                )
                .await
                .map_err(Self::map_gateway_error)?
        };

        let committed_at = self.clock.fetch_add(1, Ordering::SeqCst);
        self.log
            .append(EventEnvelope {
                kind: EventKind::FeesSettled,
                committed_at,
                payload: EventPayload::FeesSettled(FeesSettledPayload {
                    correlation_id,
                    gross_amount: split.gross_amount,
                    protocol_fee: split.protocol_fee,
                    relayer_fee: split.relayer_fee,
                    net_amount: split.net_amount,
                    converted_out,
                }),
            })
            .await;

        info!(
            correlation_id = %correlation_id,
            protocol_fee = %split.protocol_fee,
            relayer_fee = %split.relayer_fee,
            net = %split.net_amount,
            converted_out = %converted_out,
            "Settlement committed"
        );
        Ok(split)
    }
}

// =============================================================================
// TESTS
// =============================================================================
