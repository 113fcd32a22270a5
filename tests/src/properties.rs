//! # Property Sampling
//!
//! Randomized checks of the domain guarantees:
//!
//! - Fee splits conserve value exactly and respect the rate bounds.
//! - Address derivation is a pure function with strong input separation.
//!
//! Sampling uses a fixed seed so failures reproduce.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use forwarder_factory::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SAMPLES: usize = 500;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x00F0_4F0F)
    }

    fn random_address(rng: &mut StdRng) -> Address {
        let mut bytes = [0u8; 20];
        rng.fill(&mut bytes[..]);
        Address::new(bytes)
    }

    // =============================================================================
    // FEE SPLIT PROPERTIES
    // =============================================================================

    /// protocol + relayer + net == gross, for any valid rates and amount.
    #[test]
    fn test_split_conserves_value() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            // Large enough that a nonzero net share cannot floor to zero.
            let gross = U256::from(rng.gen_range(10_000u64..u64::MAX));
            let protocol = rng.gen_range(0u16..=10_000);
            let relayer = rng.gen_range(0u16..=(10_000 - protocol));

            let split = split_fees(
                gross,
                BasisPoints::new(protocol).unwrap(),
                BasisPoints::new(relayer).unwrap(),
            )
            .unwrap();

            assert_eq!(
                split.protocol_fee + split.relayer_fee + split.net_amount,
                gross,
                "gross={gross} protocol={protocol} relayer={relayer}"
            );
        }
    }

    /// Each component stays within its rate's ceiling (protocol may absorb at
    /// most the rounding residual on top of its exact share).
    #[test]
    fn test_split_components_bounded() {
        let mut rng = rng();
        let denominator = U256::from(BasisPoints::MAX);
        for _ in 0..SAMPLES {
            let gross = U256::from(rng.gen_range(10_000u64..u64::MAX));
            let protocol = rng.gen_range(0u16..=10_000);
            let relayer = rng.gen_range(0u16..=(10_000 - protocol));

            let split = split_fees(
                gross,
                BasisPoints::new(protocol).unwrap(),
                BasisPoints::new(relayer).unwrap(),
            )
            .unwrap();

            // Relayer and net are exact floors of their shares.
            assert_eq!(
                split.relayer_fee,
                gross * U256::from(relayer) / denominator
            );
            let net_bps = 10_000 - protocol - relayer;
            assert_eq!(split.net_amount, gross * U256::from(net_bps) / denominator);

            // Protocol absorbs the residual: exact share plus at most 2 units
            // (one per flooring above).
            let exact_protocol = gross * U256::from(protocol) / denominator;
            assert!(split.protocol_fee >= exact_protocol);
            assert!(split.protocol_fee <= exact_protocol + U256::from(2u8));
        }
    }

    /// Rates that sum past 100% are rejected before any arithmetic.
    #[test]
    fn test_split_rejects_excess_rates() {
        let mut rng = rng();
        for _ in 0..SAMPLES {
            let protocol = rng.gen_range(1u16..=10_000);
            let relayer = rng.gen_range((10_001 - protocol)..=10_000);

            let err = split_fees(
                U256::from(1_000_000u64),
                BasisPoints::new(protocol).unwrap(),
                BasisPoints::new(relayer).unwrap(),
            )
            .unwrap_err();
            assert_eq!(err, SettlementError::ArithmeticOverflow);
        }
    }

    // =============================================================================
    // DERIVATION PROPERTIES
    // =============================================================================

    /// Same inputs always give the same address; sampled beneficiaries never
    /// collide.
    #[test]
    fn test_derivation_deterministic_and_collision_free() {
        let mut rng = rng();
        let factory = random_address(&mut rng);
        let template = forwarder_template_hash();

        let mut seen = HashSet::new();
        for _ in 0..SAMPLES {
            let beneficiary = random_address(&mut rng);
            let first = derive_forwarder_address(factory, beneficiary, template);
            let second = derive_forwarder_address(factory, beneficiary, template);

            assert_eq!(first, second);
            assert!(seen.insert(first), "collision at {beneficiary}");
        }
    }

    /// Flipping a single input byte moves the derived address.
    #[test]
    fn test_derivation_input_separation() {
        let mut rng = rng();
        let template = forwarder_template_hash();

        for _ in 0..SAMPLES {
            let factory = random_address(&mut rng);
            let beneficiary = random_address(&mut rng);
            let base = derive_forwarder_address(factory, beneficiary, template);

            let mut flipped = *beneficiary.as_bytes();
            let index = rng.gen_range(0..flipped.len());
            flipped[index] ^= 0x01;
            let shifted = derive_forwarder_address(factory, Address::new(flipped), template);

            assert_ne!(base, shifted);
        }
    }
}
