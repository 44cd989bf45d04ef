//! Property tests: witness projection is pure, and a mirror driven through
//! the ledger always agrees with the committed roots.

use msgchal_contract::MessageFlags;
use msgchal_core::Field;
use msgchal_crypto::{AuthenticatedMapClient, MerkleMap};
use msgchal_integration_tests::{user, Scenario};
use proptest::prelude::*;

fn field() -> impl Strategy<Value = Field> {
    any::<[u8; 32]>().prop_map(|b| Field::from_be_bytes_truncated(b, 254))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn projection_is_deterministic(
        entries in proptest::collection::vec((field(), field()), 0..6),
        key in field(),
        value in field(),
    ) {
        let mut map = MerkleMap::new();
        for (k, v) in entries {
            map.set(k, v);
        }
        let witness = map.witness_for(&key);
        prop_assert_eq!(
            witness.compute_root_and_key(&value),
            witness.compute_root_and_key(&value)
        );
        prop_assert_eq!(witness.key(), key);
    }

    #[test]
    fn projected_root_is_the_written_root(
        entries in proptest::collection::vec((field(), field()), 0..6),
        key in field(),
        value in field(),
    ) {
        let mut map = MerkleMap::new();
        for (k, v) in entries {
            map.set(k, v);
        }
        let witness = map.witness_for(&key);
        let (current, _) = witness.compute_root_and_key(&map.get(&key));
        prop_assert_eq!(current, map.root());

        let (projected, _) = witness.compute_root_and_key(&value);
        map.set(key, value);
        prop_assert_eq!(projected, map.root());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn ledger_and_mirror_agree(
        ops in proptest::collection::vec((1u32..6, any::<bool>(), 1u64..1000, any::<[bool; 6]>()), 1..12)
    ) {
        let mut s = Scenario::new().unwrap();
        let mut registered = 0u64;
        let mut deposited = 0u64;
        for (n, register, payload, flags) in ops {
            let who = user(n);
            let id = who.identity();
            if register {
                let fresh = !s.mirror.is_registered(&id);
                prop_assert_eq!(s.register(&id).is_ok(), fresh);
                registered += u64::from(fresh);
            } else {
                let flags = MessageFlags::new(flags);
                let message = flags.apply_to(Field::from_u64(payload));
                let allowed = s.mirror.is_registered(&id)
                    && s.mirror.message_of(&id).is_none()
                    && flags.validate().is_ok();
                prop_assert_eq!(s.deposit(&who, message).is_ok(), allowed);
                deposited += u64::from(allowed);
            }
            let state = s.state().unwrap();
            prop_assert!(s.mirror.in_sync_with(&state));
            prop_assert_eq!(state.address_count, registered);
            prop_assert_eq!(state.message_count, deposited);
        }
    }
}
