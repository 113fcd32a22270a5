//! # Integration Test Flows
//!
//! End-to-end flows across the factory service, settlement engine, and the
//! in-memory adapters:
//!
//! 1. **Provisioning**: predicted address -> create -> ledger + registry + event
//! 2. **Settlement**: gross amount -> split -> gateway conversion -> audit event
//! 3. **Shared audit log**: provisioning and settlement commit to one ordered log

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use forwarder_factory::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const FACTORY: [u8; 20] = [0xFA; 20];
    const OWNER: [u8; 20] = [0x0D; 20];
    const REFERENCE_ASSET: [u8; 20] = [0xAA; 20];
    const COLLECTED_ASSET: [u8; 20] = [0xCC; 20];

    fn base_config() -> FactoryConfig {
        FactoryConfig {
            exchange_gateway: Address::new([0xEE; 20]),
            reference_asset: Address::new(REFERENCE_ASSET),
            router: Address::new([0xBB; 20]),
            protocol_fee_bps: BasisPoints::new(30).unwrap(),
            relayer_fee_bps: BasisPoints::new(10).unwrap(),
            owner: Address::new(OWNER),
            prior_deployments: Vec::new(),
        }
    }

    async fn factory_service() -> InMemoryFactoryService {
        InMemoryFactoryService::in_memory(Address::new(FACTORY), base_config())
            .await
            .expect("valid config")
    }

    // =============================================================================
    // PROVISIONING FLOWS
    // =============================================================================

    /// The predicted address is stable and matches what gets provisioned.
    #[tokio::test]
    async fn test_predicted_address_matches_created() {
        let service = factory_service().await;
        let beneficiary = Address::new([0x11; 20]);

        let predicted = service.get_forwarder(beneficiary).unwrap();
        assert_eq!(service.get_forwarder(beneficiary).unwrap(), predicted);

        let record = service.create_forwarder(beneficiary).await.unwrap();
        assert_eq!(record.address, predicted);

        // Prediction is unchanged after provisioning.
        assert_eq!(service.get_forwarder(beneficiary).unwrap(), predicted);
    }

    /// Provisioning places template code on the ledger, wired to the beneficiary.
    #[tokio::test]
    async fn test_create_forwarder_full_effects() {
        let service = factory_service().await;
        let beneficiary = Address::new([0x11; 20]);

        let record = service.create_forwarder(beneficiary).await.unwrap();

        assert_eq!(
            service.ledger().code_at(record.address).await,
            Some(service.template_hash())
        );
        assert_eq!(
            service.ledger().forward_target(record.address),
            Some(beneficiary)
        );
        assert!(service.is_deployed(beneficiary).await);

        let events = service.event_log().query(EventKind::ForwarderCreated).await;
        assert_eq!(events.len(), 1);
        match &events[0].payload {
            EventPayload::ForwarderCreated(payload) => {
                assert_eq!(payload.created_address, record.address);
                assert_eq!(payload.forward_to, beneficiary);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    /// A second request for the same beneficiary reports the existing address.
    #[tokio::test]
    async fn test_repeat_create_reports_existing_address() {
        let service = factory_service().await;
        let beneficiary = Address::new([0x11; 20]);

        let record = service.create_forwarder(beneficiary).await.unwrap();
        let err = service.create_forwarder(beneficiary).await.unwrap_err();

        assert_eq!(
            err,
            FactoryError::AlreadyDeployed {
                beneficiary,
                address: record.address,
            }
        );
        // No second event, no second ledger entry.
        assert_eq!(
            service
                .event_log()
                .query(EventKind::ForwarderCreated)
                .await
                .len(),
            1
        );
    }

    /// Distinct beneficiaries and distinct factory identities give distinct
    /// addresses.
    #[tokio::test]
    async fn test_address_space_separation() {
        let service = factory_service().await;
        let other_factory =
            InMemoryFactoryService::in_memory(Address::new([0xFB; 20]), base_config())
                .await
                .unwrap();

        let alice = Address::new([0x11; 20]);
        let bob = Address::new([0x22; 20]);

        let alice_here = service.get_forwarder(alice).unwrap();
        let bob_here = service.get_forwarder(bob).unwrap();
        let alice_there = other_factory.get_forwarder(alice).unwrap();

        assert_ne!(alice_here, bob_here);
        assert_ne!(alice_here, alice_there);
    }

    /// Concurrent provisioning for one beneficiary admits exactly one winner.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_create_single_winner() {
        let service = Arc::new(factory_service().await);
        let beneficiary = Address::new([0x11; 20]);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.create_forwarder(beneficiary).await
            }));
        }

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(FactoryError::AlreadyDeployed { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(
            service
                .event_log()
                .query(EventKind::ForwarderCreated)
                .await
                .len(),
            1
        );
    }

    /// Beneficiaries seeded from configuration behave like live deployments.
    #[tokio::test]
    async fn test_seeded_prior_deployment_flow() {
        let migrated = Address::new([0x77; 20]);
        let mut config = base_config();
        config.prior_deployments = vec![migrated];

        let service = InMemoryFactoryService::in_memory(Address::new(FACTORY), config)
            .await
            .unwrap();

        assert!(service.is_deployed(migrated).await);
        let err = service.create_forwarder(migrated).await.unwrap_err();
        assert!(matches!(err, FactoryError::AlreadyDeployed { .. }));

        // A fresh beneficiary still provisions normally alongside the seed.
        let fresh = Address::new([0x78; 20]);
        service.create_forwarder(fresh).await.unwrap();
        assert!(service.is_deployed(fresh).await);
    }

    // =============================================================================
    // SETTLEMENT FLOWS
    // =============================================================================

    /// Provision a forwarder, then settle relayed value end to end.
    #[tokio::test]
    async fn test_provision_then_settle() {
        let service = factory_service().await;
        let beneficiary = Address::new([0x11; 20]);
        service.create_forwarder(beneficiary).await.unwrap();

        let gateway = Arc::new(FixedRateGateway::new());
        gateway.set_rate(
            Address::new(COLLECTED_ASSET),
            Address::new(REFERENCE_ASSET),
            3,
            4,
        );
        let engine =
            service.settlement_engine(Arc::clone(&gateway), Address::new(COLLECTED_ASSET));

        let gross = U256::from(2_000_000u64);
        let split = engine.settle(gross).await.unwrap();

        // 30 + 10 bps of 2_000_000.
        assert_eq!(split.protocol_fee, U256::from(6_000u64));
        assert_eq!(split.relayer_fee, U256::from(2_000u64));
        assert_eq!(split.net_amount, U256::from(1_992_000u64));
        assert_eq!(
            split.protocol_fee + split.relayer_fee + split.net_amount,
            gross
        );

        // Fee portion converted at 3:4.
        let swaps = gateway.executed_swaps();
        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].amount_in, U256::from(8_000u64));
        assert_eq!(swaps[0].amount_out, U256::from(6_000u64));

        // Both flows audited on the shared log, in commit order.
        let entries = service.event_log().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EventKind::ForwarderCreated);
        assert_eq!(entries[1].kind, EventKind::FeesSettled);
        assert!(entries[0].committed_at < entries[1].committed_at);
    }

    /// Owner-driven fee updates apply to the next settlement.
    #[tokio::test]
    async fn test_fee_update_applies_to_next_settlement() {
        let service = factory_service().await;
        let gateway = Arc::new(FixedRateGateway::new());
        gateway.set_rate(
            Address::new(COLLECTED_ASSET),
            Address::new(REFERENCE_ASSET),
            1,
            1,
        );
        let engine =
            service.settlement_engine(Arc::clone(&gateway), Address::new(COLLECTED_ASSET));

        let before = engine.settle(U256::from(100_000u64)).await.unwrap();
        assert_eq!(before.protocol_fee, U256::from(300u64));

        service
            .update_fees(
                Address::new(OWNER),
                BasisPoints::new(500).unwrap(),
                BasisPoints::new(10).unwrap(),
            )
            .await
            .unwrap();

        let after = engine.settle(U256::from(100_000u64)).await.unwrap();
        assert_eq!(after.protocol_fee, U256::from(5_000u64));
        assert_eq!(after.relayer_fee, U256::from(100u64));
        assert_eq!(after.net_amount, U256::from(94_900u64));
    }

    /// A failed swap leaves the audit log and statistics untouched.
    #[tokio::test]
    async fn test_settlement_failure_is_not_audited() {
        let service = factory_service().await;
        let gateway = Arc::new(FixedRateGateway::new());
        gateway.set_rate(
            Address::new(COLLECTED_ASSET),
            Address::new(REFERENCE_ASSET),
            1,
            1,
        );
        gateway.set_fail_swaps(true);
        let engine =
            service.settlement_engine(Arc::clone(&gateway), Address::new(COLLECTED_ASSET));

        let err = engine.settle(U256::from(100_000u64)).await.unwrap_err();
        assert!(matches!(err, SettlementError::SwapFailed(_)));

        assert!(service.event_log().entries().is_empty());
        let stats = service.stats().await;
        assert_eq!(stats.settlements_completed, 0);
        assert_eq!(stats.settlements_failed, 1);

        // Gateway recovery makes the same settlement succeed.
        gateway.set_fail_swaps(false);
        engine.settle(U256::from(100_000u64)).await.unwrap();
        assert_eq!(service.stats().await.settlements_completed, 1);
    }

    /// Settlement correlation identifiers are unique per call.
    #[tokio::test]
    async fn test_settlement_correlation_ids_unique() {
        let service = factory_service().await;
        let gateway = Arc::new(FixedRateGateway::new());
        gateway.set_rate(
            Address::new(COLLECTED_ASSET),
            Address::new(REFERENCE_ASSET),
            1,
            1,
        );
        let engine =
            service.settlement_engine(Arc::clone(&gateway), Address::new(COLLECTED_ASSET));

        engine.settle(U256::from(10_000u64)).await.unwrap();
        engine.settle(U256::from(10_000u64)).await.unwrap();

        let events = service.event_log().query(EventKind::FeesSettled).await;
        assert_eq!(events.len(), 2);
        let ids: Vec<_> = events
            .iter()
            .map(|e| match &e.payload {
                EventPayload::FeesSettled(p) => p.correlation_id,
                other => panic!("unexpected payload {other:?}"),
            })
            .collect();
        assert_ne!(ids[0], ids[1]);
    }
}
