//! Address registration through the ledger: admin exclusivity, one-shot
//! registration and the capacity boundary.

use msgchal_contract::{ErrorKind, StateField, TransitionError};
use msgchal_core::ContractConfig;
use msgchal_integration_tests::{user, Scenario};
use msgchal_ledger::LedgerError;

fn transition_kind(err: &LedgerError) -> Option<ErrorKind> {
    match err {
        LedgerError::Transition(e) => Some(e.kind()),
        _ => None,
    }
}

#[test]
fn admin_registers_an_identity() {
    let mut s = Scenario::new().unwrap();
    let alice = user(1).identity();
    s.register(&alice).unwrap();
    let state = s.state().unwrap();
    assert_eq!(state.address_count, 1);
    assert_eq!(state.address_root, s.mirror.address_root());
    assert!(s.mirror.is_registered(&alice));
}

#[test]
fn registering_twice_leaves_count_and_root_unchanged() {
    let mut s = Scenario::new().unwrap();
    let alice = user(1).identity();
    s.register(&alice).unwrap();
    let before = s.state().unwrap();

    let err = s.register(&alice).unwrap_err();
    assert_eq!(transition_kind(&err), Some(ErrorKind::StaleWitness));
    let after = s.state().unwrap();
    assert_eq!(after.address_count, before.address_count);
    assert_eq!(after.address_root, before.address_root);
}

#[test]
fn hundredth_registration_succeeds_hundred_first_fails() {
    let mut s = Scenario::new().unwrap();
    for n in 1..=99 {
        s.register(&user(n).identity()).unwrap();
    }
    assert_eq!(s.state().unwrap().address_count, 99);

    s.register(&user(100).identity()).unwrap();
    assert_eq!(s.state().unwrap().address_count, 100);

    let before = s.state().unwrap();
    let err = s.register(&user(101).identity()).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Transition(TransitionError::CapacityExceeded {
            count: 100,
            capacity: 100
        })
    ));
    assert_eq!(s.state().unwrap(), before);
}

#[test]
fn configured_capacity_is_enforced() {
    let mut s = Scenario::with_config(ContractConfig {
        address_capacity: 3,
    })
    .unwrap();
    for n in 1..=3 {
        s.register(&user(n).identity()).unwrap();
    }
    let err = s.register(&user(4).identity()).unwrap_err();
    assert_eq!(transition_kind(&err), Some(ErrorKind::Capacity));
}

#[test]
fn non_admin_cannot_register_anyone() {
    let mut s = Scenario::new().unwrap();
    let intruder = user(7);
    let before = s.state().unwrap();

    for target in [intruder.identity(), user(8).identity()] {
        let err = s.register_as(&intruder, &target).unwrap_err();
        assert_eq!(transition_kind(&err), Some(ErrorKind::Authorization));
    }
    assert_eq!(s.state().unwrap(), before);
    assert_eq!(s.ledger.sequence(), 1);
}

#[test]
fn registered_user_cannot_register_others() {
    let mut s = Scenario::new().unwrap();
    let alice = user(1);
    s.register(&alice.identity()).unwrap();
    let err = s.register_as(&alice, &user(2).identity()).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Transition(TransitionError::Unauthorized { .. })
    ));
}

#[test]
fn admin_field_never_changes() {
    let mut s = Scenario::new().unwrap();
    let admin = s.admin.identity();
    for n in 1..=5 {
        s.register(&user(n).identity()).unwrap();
        s.deposit(&user(n), msgchal_core::Field::from_u64(u64::from(n)))
            .unwrap();
    }
    assert_eq!(
        s.ledger.get_field(StateField::AdminAddress),
        Some(msgchal_contract::FieldValue::Identity(admin))
    );
}
