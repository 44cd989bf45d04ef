//! # Statement Rules
//!
//! A verified proof binds a statement to a method's circuit, but says
//! nothing about whether that statement is one the method could produce.
//! These checks pin each method to the fields it reads and writes and
//! re-assert, against the committed state, the parts of the method's logic
//! that are visible in the statement: who may call it, the capacity bound
//! and the counter increments. Map roots stay opaque and are covered by the
//! proof alone.

use msgchal_contract::{ContractState, FieldSet, Method, StateField, TransitionError};
use msgchal_core::ContractConfig;

use crate::error::LedgerError;
use crate::statement::TransitionStatement;

/// Checks that need no committed state: declared fields and return value.
pub(crate) fn check_shape(statement: &TransitionStatement) -> Result<(), LedgerError> {
    let method = statement.method;
    if statement.preconditions.fields() != method.reads() {
        return Err(malformed(
            method,
            format!("must read exactly {}", field_list(method.reads())),
        ));
    }
    if statement.update.fields() != method.writes() {
        return Err(malformed(
            method,
            format!("must write exactly {}", field_list(method.writes())),
        ));
    }
    let expected = match method {
        Method::CheckMessage => Some(true),
        _ => None,
    };
    if statement.returned != expected {
        return Err(malformed(method, "unexpected return value".to_string()));
    }
    Ok(())
}

/// The state an `initialize` statement commits: genesis for its sender.
pub(crate) fn genesis(statement: &TransitionStatement) -> Result<ContractState, LedgerError> {
    let sender = statement
        .sender
        .ok_or(LedgerError::MissingSender(Method::Initialize))?;
    let state = ContractState::genesis(sender);
    if statement.update != FieldSet::full(&state) {
        return Err(malformed(
            Method::Initialize,
            "update must be the sender's genesis state".to_string(),
        ));
    }
    Ok(state)
}

/// Method rules against `current`, which the preconditions already match.
pub(crate) fn admit(
    statement: &TransitionStatement,
    current: &ContractState,
    config: &ContractConfig,
) -> Result<(), LedgerError> {
    let method = statement.method;
    match method {
        Method::Initialize => Err(TransitionError::AlreadyInitialized.into()),
        Method::RegisterAddress => {
            let sender = statement.sender.ok_or(LedgerError::MissingSender(method))?;
            if sender != current.admin_address {
                return Err(TransitionError::Unauthorized {
                    required: current.admin_address,
                    caller: sender,
                }
                .into());
            }
            if current.address_count >= config.address_capacity {
                return Err(TransitionError::CapacityExceeded {
                    count: current.address_count,
                    capacity: config.address_capacity,
                }
                .into());
            }
            expect_increment(
                method,
                StateField::AddressCount,
                statement.update.address_count,
                current.address_count,
            )
        }
        Method::DepositMessage => {
            expect_increment(
                method,
                StateField::MessageCount,
                statement.update.message_count,
                current.message_count,
            )
        }
        Method::CheckMessage => Ok(()),
    }
}

fn expect_increment(
    method: Method,
    field: StateField,
    written: Option<u64>,
    committed: u64,
) -> Result<(), LedgerError> {
    let next = committed
        .checked_add(1)
        .ok_or(TransitionError::CounterOverflow(field))?;
    if written != Some(next) {
        return Err(malformed(method, format!("{field} must advance to {next}")));
    }
    Ok(())
}

fn field_list(fields: &[StateField]) -> String {
    if fields.is_empty() {
        return "no fields".to_string();
    }
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn malformed(method: Method, reason: String) -> LedgerError {
    LedgerError::MalformedStatement { method, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgchal_contract::{initialize, Caller};
    use msgchal_crypto::KeyPair;

    fn genesis_statement(seed: u8) -> TransitionStatement {
        let admin = KeyPair::from_seed(&[seed; 32]).identity();
        initialize(&Caller::signed(admin)).unwrap().into()
    }

    #[test]
    fn engine_initialize_has_valid_shape() {
        let statement = genesis_statement(1);
        check_shape(&statement).unwrap();
        let state = genesis(&statement).unwrap();
        assert_eq!(Some(state.admin_address), statement.sender);
    }

    #[test]
    fn initialize_for_someone_else_is_rejected() {
        let mut statement = genesis_statement(1);
        statement.sender = Some(KeyPair::from_seed(&[2u8; 32]).identity());
        assert!(matches!(
            genesis(&statement),
            Err(LedgerError::MalformedStatement { .. })
        ));
    }

    #[test]
    fn initialize_with_nonzero_counts_is_rejected() {
        let mut statement = genesis_statement(1);
        statement.update.address_count = Some(7);
        assert!(matches!(
            genesis(&statement),
            Err(LedgerError::MalformedStatement { .. })
        ));
    }

    #[test]
    fn register_writing_admin_has_bad_shape() {
        let current = genesis(&genesis_statement(1)).unwrap();
        let statement = TransitionStatement {
            method: Method::RegisterAddress,
            sender: Some(current.admin_address),
            preconditions: FieldSet::read(&current, Method::RegisterAddress.reads()),
            update: FieldSet {
                admin_address: Some(current.admin_address),
                address_count: Some(1),
                address_root: Some(current.address_root),
                ..FieldSet::default()
            },
            returned: None,
        };
        let err = check_shape(&statement).unwrap_err();
        assert!(err.to_string().contains("address_count, address_root"), "{err}");
    }

    #[test]
    fn check_must_return_true() {
        let current = genesis(&genesis_statement(1)).unwrap();
        let statement = TransitionStatement {
            method: Method::CheckMessage,
            sender: None,
            preconditions: FieldSet::read(&current, Method::CheckMessage.reads()),
            update: FieldSet::default(),
            returned: Some(false),
        };
        assert!(matches!(
            check_shape(&statement),
            Err(LedgerError::MalformedStatement { .. })
        ));
    }

    #[test]
    fn register_by_non_admin_is_unauthorized() {
        let current = genesis(&genesis_statement(1)).unwrap();
        let intruder = KeyPair::from_seed(&[5u8; 32]).identity();
        let statement = TransitionStatement {
            method: Method::RegisterAddress,
            sender: Some(intruder),
            preconditions: FieldSet::read(&current, Method::RegisterAddress.reads()),
            update: FieldSet {
                address_count: Some(1),
                address_root: Some(current.address_root),
                ..FieldSet::default()
            },
            returned: None,
        };
        let err = admit(&statement, &current, &ContractConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transition(TransitionError::Unauthorized { .. })
        ));
    }

    #[test]
    fn deposit_count_must_advance_by_one() {
        let current = genesis(&genesis_statement(1)).unwrap();
        let statement = TransitionStatement {
            method: Method::DepositMessage,
            sender: Some(KeyPair::from_seed(&[6u8; 32]).identity()),
            preconditions: FieldSet::read(&current, Method::DepositMessage.reads()),
            update: FieldSet {
                message_count: Some(40),
                message_root: Some(current.message_root),
                ..FieldSet::default()
            },
            returned: None,
        };
        let err = admit(&statement, &current, &ContractConfig::default()).unwrap_err();
        assert!(err.to_string().contains("advance to 1"), "{err}");
    }
}
