extern crate std;

use soroban_sdk::{testutils::Address as _, token::Client as TokenClient, xdr::ToXdr, Address, Bytes};

use crate::{
    test::{advance, bare_setup, new_staker, setup, DAY},
    ContractError, LockCall,
};

#[test]
fn test_relayed_stake_lifecycle() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = new_staker(&s, 1_000);

    s.client
        .execute_relayed(&relay, &user, &LockCall::StartStake(1_000, 1).to_xdr(&s.env));
    assert!(s.client.get_stake(&user).exists);

    advance(&s.env, 60 * DAY);
    s.client
        .execute_relayed(&relay, &user, &LockCall::EndStake.to_xdr(&s.env));
    assert_eq!(TokenClient::new(&s.env, &s.token).balance(&user), 1_050);
}

#[test]
fn test_relayed_emergency_withdraw() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = new_staker(&s, 1_000);
    s.client.start_stake(&user, &1_000, &2);
    s.client.finish(&s.owner);

    s.client.execute_relayed(
        &relay,
        &user,
        &LockCall::EmergencyWithdraw.to_xdr(&s.env),
    );
    assert_eq!(TokenClient::new(&s.env, &s.token).balance(&user), 1_000);
}

#[test]
fn test_relay_must_be_trusted() {
    let s = setup();
    let relay = Address::generate(&s.env);
    let user = new_staker(&s, 1_000);
    let call = LockCall::StartStake(1_000, 1).to_xdr(&s.env);

    match s.client.try_execute_relayed(&relay, &user, &call) {
        Err(Ok(e)) => assert_eq!(e, ContractError::UntrustedRelay),
        _ => unreachable!("Expected UntrustedRelay error"),
    }

    s.client.set_trusted_relay(&s.owner, &relay);
    match s
        .client
        .try_execute_relayed(&relay, &user, &LockCall::EndStake.to_xdr(&s.env))
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotStaked),
        _ => unreachable!("Expected NotStaked error"),
    }
}

#[test]
fn test_call_data_of_another_type_is_rejected() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = new_staker(&s, 1_000);

    match s
        .client
        .try_execute_relayed(&relay, &user, &42u32.to_xdr(&s.env))
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidCallData),
        _ => unreachable!("Expected InvalidCallData error"),
    }
}

#[test]
fn test_undecodable_call_data_aborts_without_effects() {
    let s = setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = new_staker(&s, 1_000);

    let garbage = Bytes::from_slice(&s.env, &[7u8; 5]);
    assert!(s.client.try_execute_relayed(&relay, &user, &garbage).is_err());
    assert!(!s.client.get_stake(&user).exists);
    assert_eq!(s.client.total_staked(), 0);
    assert_eq!(TokenClient::new(&s.env, &s.token).balance(&user), 1_000);
}

#[test]
fn test_relayed_end_stake_without_reserve() {
    let s = bare_setup();
    let relay = Address::generate(&s.env);
    s.client.set_trusted_relay(&s.owner, &relay);
    let user = new_staker(&s, 1_000);
    s.client.start_stake(&user, &1_000, &1);
    advance(&s.env, 60 * DAY);

    match s
        .client
        .try_execute_relayed(&relay, &user, &LockCall::EndStake.to_xdr(&s.env))
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientReward),
        _ => unreachable!("Expected InsufficientReward error"),
    }
    assert!(s.client.get_stake(&user).exists);
    assert_eq!(TokenClient::new(&s.env, &s.token).balance(&s.contract), 1_000);
}
