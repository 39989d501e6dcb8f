extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::Client as TokenClient,
    xdr::ToXdr,
    Address, Bytes,
};

use crate::{
    test::{new_staker, setup, LOCK},
    ContractError, LpCall,
};

#[test]
fn test_relayed_calls_act_for_the_account() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    assert_eq!(s.client.trusted_relay(), Some(relay.clone()));

    let user = new_staker(&s, 10);
    s.client
        .execute_relayed(&relay, &user, &LpCall::Deposit(0, 10).to_xdr(&s.env));
    assert_eq!(s.client.get_position(&0, &user).amount, 10);

    let now = s.env.ledger().timestamp();
    s.env.ledger().set_timestamp(now + LOCK + 60);
    let pending = s.client.pending_reward(&0, &user);
    s.client
        .execute_relayed(&relay, &user, &LpCall::Claim(0).to_xdr(&s.env));
    assert_eq!(TokenClient::new(&s.env, &s.reward).balance(&user), pending);

    s.client
        .execute_relayed(&relay, &user, &LpCall::Withdraw(0, 4).to_xdr(&s.env));
    assert_eq!(s.client.get_position(&0, &user).amount, 6);

    s.client.execute_relayed(
        &relay,
        &user,
        &LpCall::EmergencyWithdraw(0).to_xdr(&s.env),
    );
    assert_eq!(s.client.get_position(&0, &user).amount, 0);
    assert_eq!(TokenClient::new(&s.env, &s.lp).balance(&user), 10);
}

#[test]
fn test_untrusted_relay_is_rejected() {
    let s = setup();
    let relay = Address::generate(&s.env);
    let user = new_staker(&s, 10);
    let call = LpCall::Deposit(0, 10).to_xdr(&s.env);

    match s.client.try_execute_relayed(&relay, &user, &call) {
        Err(Ok(e)) => assert_eq!(e, ContractError::UntrustedRelay),
        _ => unreachable!("Expected UntrustedRelay error"),
    }

    s.client.set_trusted_relay(&s.owner, &relay);
    let impostor = Address::generate(&s.env);
    match s.client.try_execute_relayed(&impostor, &user, &call) {
        Err(Ok(e)) => assert_eq!(e, ContractError::UntrustedRelay),
        _ => unreachable!("Expected UntrustedRelay error"),
    }
    assert_eq!(s.client.get_position(&0, &user).amount, 0);
}

#[test]
fn test_malformed_call_data_aborts() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = Address::generate(&s.env);

    let garbage = Bytes::from_slice(&s.env, &[0xde, 0xad, 0xbe, 0xef]);
    assert!(s.client.try_execute_relayed(&relay, &user, &garbage).is_err());
    assert_eq!(s.client.get_position(&0, &user).amount, 0);
}

#[test]
fn test_call_data_of_another_type_is_rejected() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = Address::generate(&s.env);

    match s.client.try_execute_relayed(&relay, &user, &7u32.to_xdr(&s.env)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidCallData),
        _ => unreachable!("Expected InvalidCallData error"),
    }
}

#[test]
fn test_relayed_errors_propagate() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = Address::generate(&s.env);

    let call = LpCall::Claim(0).to_xdr(&s.env);
    match s.client.try_execute_relayed(&relay, &user, &call) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingReward),
        _ => unreachable!("Expected NoPendingReward error"),
    }
}

#[test]
fn test_only_owner_sets_relay() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    match s.client.try_set_trusted_relay(&stranger, &stranger) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotOwner),
        _ => unreachable!("Expected NotOwner error"),
    }
}
