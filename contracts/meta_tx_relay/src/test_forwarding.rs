extern crate std;

use common::Role;
use lock_staking::{LockCall, LockStakingContract, LockStakingContractClient, RewardBasis, TierTerms};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short,
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    xdr::ToXdr,
    Address, Bytes, Env,
};

use crate::{
    test::{linked_account, setup, sign, Setup, FEE},
    ContractError, RelayCall,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TargetError {
    Rejected = 1,
}

/// Relay target that records the last call and rejects empty call data.
#[contract]
pub struct RecordingTarget;

#[contractimpl]
impl RecordingTarget {
    pub fn execute_relayed(
        env: Env,
        relay: Address,
        account: Address,
        call_data: Bytes,
    ) -> Result<(), TargetError> {
        relay.require_auth();
        if call_data.is_empty() {
            return Err(TargetError::Rejected);
        }
        env.storage()
            .instance()
            .set(&symbol_short!("LAST"), &(relay, account, call_data));
        Ok(())
    }

    pub fn last(env: Env) -> Option<(Address, Address, Bytes)> {
        env.storage().instance().get(&symbol_short!("LAST"))
    }
}

fn allowed_target(s: &Setup) -> RecordingTargetClient<'static> {
    let target = RecordingTargetClient::new(&s.env, &s.env.register(RecordingTarget, ()));
    s.client
        .grant_role(&s.owner, &target.address, &Role::AllowedContract);
    target
}

/// Deposits the relay fee for a number of calls into the account.
fn prepay(s: &Setup, account: &Address, calls: i128) {
    s.client.deposit(account, &(FEE * calls));
}

#[test]
fn test_relayed_call_reaches_target_and_charges_fee() {
    let s = setup();
    let target = allowed_target(&s);
    let (account, signer) = linked_account(&s, 201, 10_000);
    prepay(&s, &account, 2);

    let call = Bytes::from_slice(&s.env, b"ping");
    let sig = sign(&s, &signer, &call);
    s.client.relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    );

    assert_eq!(target.last(), Some((s.contract.clone(), account.clone(), call)));
    assert_eq!(s.client.balance_of(&account), FEE);
    assert_eq!(s.client.balance_of(&s.owner), FEE);
    assert_eq!(s.client.get_nonce(&signer.evm_address(&s.env)), 1);
}

#[test]
fn test_only_trusted_forwarder_relays() {
    let s = setup();
    let target = allowed_target(&s);
    let (account, signer) = linked_account(&s, 211, 10_000);
    prepay(&s, &account, 1);
    let call = Bytes::from_slice(&s.env, b"ping");
    let sig = sign(&s, &signer, &call);
    let stranger = Address::generate(&s.env);

    match s.client.try_relay_meta_transaction(
        &stranger,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotTrustedForwarder),
        _ => unreachable!("Expected NotTrustedForwarder error"),
    }

    s.client.set_trusted_forwarder(&s.owner, &stranger);
    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotTrustedForwarder),
        _ => unreachable!("Expected NotTrustedForwarder error"),
    }

    s.client.relay_meta_transaction(
        &stranger,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    );
    assert_eq!(s.client.get_nonce(&signer.evm_address(&s.env)), 1);
}

#[test]
fn test_target_must_be_allowed() {
    let s = setup();
    let target = RecordingTargetClient::new(&s.env, &s.env.register(RecordingTarget, ()));
    let (account, signer) = linked_account(&s, 221, 10_000);
    prepay(&s, &account, 1);
    let call = Bytes::from_slice(&s.env, b"ping");
    let sig = sign(&s, &signer, &call);

    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TargetNotAllowed),
        _ => unreachable!("Expected TargetNotAllowed error"),
    }
    assert_eq!(target.last(), None);
    assert_eq!(s.client.balance_of(&account), FEE);
}

#[test]
fn test_revoked_target_is_refused() {
    let s = setup();
    let target = allowed_target(&s);
    let (account, signer) = linked_account(&s, 231, 10_000);
    prepay(&s, &account, 1);

    assert!(s
        .client
        .revoke_role(&s.owner, &target.address, &Role::AllowedContract));
    assert!(!s
        .client
        .revoke_role(&s.owner, &target.address, &Role::AllowedContract));

    let call = Bytes::from_slice(&s.env, b"ping");
    let sig = sign(&s, &signer, &call);
    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TargetNotAllowed),
        _ => unreachable!("Expected TargetNotAllowed error"),
    }
}

#[test]
fn test_insufficient_relay_balance() {
    let s = setup();
    let target = allowed_target(&s);
    let (account, signer) = linked_account(&s, 241, 10_000);
    s.client.deposit(&account, &(FEE - 1));

    let call = Bytes::from_slice(&s.env, b"ping");
    let sig = sign(&s, &signer, &call);
    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &target.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientRelayBalance),
        _ => unreachable!("Expected InsufficientRelayBalance error"),
    }
    assert_eq!(s.client.get_nonce(&signer.evm_address(&s.env)), 0);
    assert_eq!(s.client.balance_of(&account), FEE - 1);
}

#[test]
fn test_failing_target_reverts_fee_and_nonce() {
    let s = setup();
    let target = allowed_target(&s);
    let (account, signer) = linked_account(&s, 251, 10_000);
    prepay(&s, &account, 1);

    let empty = Bytes::new(&s.env);
    let sig = sign(&s, &signer, &empty);
    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &target.address,
        &empty,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::RelayedCallFailed),
        _ => unreachable!("Expected RelayedCallFailed error"),
    }
    assert_eq!(s.client.get_nonce(&signer.evm_address(&s.env)), 0);
    assert_eq!(s.client.balance_of(&account), FEE);
    assert_eq!(s.client.balance_of(&s.owner), 0);
}

#[test]
fn test_relay_to_itself_dispatches_locally() {
    let s = setup();
    let (account, signer) = linked_account(&s, 261, 10_000);
    prepay(&s, &account, 1);

    let call = RelayCall::Deposit(1_000).to_xdr(&s.env);
    let sig = sign(&s, &signer, &call);
    s.client.relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &s.contract,
        &call,
        &sig,
    );

    assert_eq!(s.client.balance_of(&account), 1_000);
    assert_eq!(s.client.balance_of(&s.owner), FEE);
}

#[test]
fn test_factory_registers_children() {
    let s = setup();
    let factory = Address::generate(&s.env);
    let child = Address::generate(&s.env);

    match s.client.try_register_child(&factory, &child) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotFactory),
        _ => unreachable!("Expected NotFactory error"),
    }

    assert!(s.client.grant_role(&s.owner, &factory, &Role::Factory));
    s.client.register_child(&factory, &child);
    assert!(s.client.has_role(&child, &Role::AllowedContract));
    assert!(!s.client.has_role(&factory, &Role::AllowedContract));

    let stranger = Address::generate(&s.env);
    match s
        .client
        .try_grant_role(&stranger, &stranger, &Role::Factory)
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotOwner),
        _ => unreachable!("Expected NotOwner error"),
    }
}

struct Staking {
    client: LockStakingContractClient<'static>,
    stake_token: Address,
}

/// A lock-staking registry that trusts the relay, with one 60-day / 5% tier.
fn staking_behind_relay(s: &Setup) -> Staking {
    let stake_token = s
        .env
        .register_stellar_asset_contract_v2(Address::generate(&s.env))
        .address();
    let contract = s.env.register(LockStakingContract, ());
    let client = LockStakingContractClient::new(&s.env, &contract);
    client.initialize(&s.owner, &stake_token, &0, &0);
    client.add_tier(
        &s.owner,
        &TierTerms {
            lock_days: 60,
            reward_rate_bps: 500,
            min_amount: 100,
            basis: RewardBasis::Flat,
        },
        &true,
    );
    client.set_trusted_relay(&s.owner, &s.contract);
    StellarAssetClient::new(&s.env, &stake_token).mint(&s.owner, &1_000_000);
    client.fund(&s.owner, &1_000_000);

    s.client
        .grant_role(&s.owner, &contract, &Role::AllowedContract);
    Staking {
        client,
        stake_token,
    }
}

fn stake_funds(s: &Setup, staking: &Staking, account: &Address, amount: i128) {
    StellarAssetClient::new(&s.env, &staking.stake_token).mint(account, &amount);
    TokenClient::new(&s.env, &staking.stake_token).approve(
        account,
        &staking.client.address,
        &amount,
        &(s.env.ledger().sequence() + 100_000),
    );
}

#[test]
fn test_end_to_end_lock_stake_through_relay() {
    let s = setup();
    let staking = staking_behind_relay(&s);
    let (account, signer) = linked_account(&s, 271, 10_000);
    prepay(&s, &account, 2);
    stake_funds(&s, &staking, &account, 1_000);
    let evm = signer.evm_address(&s.env);

    let call = LockCall::StartStake(1_000, 0).to_xdr(&s.env);
    let sig = sign(&s, &signer, &call);
    s.client
        .relay_meta_transaction(&s.forwarder, &evm, &staking.client.address, &call, &sig);
    assert_eq!(staking.client.get_stake(&account).amount, 1_000);
    assert_eq!(staking.client.total_staked(), 1_000);

    let now = s.env.ledger().timestamp();
    s.env.ledger().set_timestamp(now + 61 * 86_400);

    let call = LockCall::EndStake.to_xdr(&s.env);
    let sig = sign(&s, &signer, &call);
    s.client
        .relay_meta_transaction(&s.forwarder, &evm, &staking.client.address, &call, &sig);

    assert_eq!(
        TokenClient::new(&s.env, &staking.stake_token).balance(&account),
        1_050
    );
    assert_eq!(s.client.get_nonce(&evm), 2);
    assert_eq!(s.client.balance_of(&account), 0);
    assert_eq!(s.client.balance_of(&s.owner), 2 * FEE);
}

#[test]
fn test_end_to_end_target_error_is_atomic() {
    let s = setup();
    let staking = staking_behind_relay(&s);
    let (account, signer) = linked_account(&s, 281, 10_000);
    prepay(&s, &account, 1);
    stake_funds(&s, &staking, &account, 50);
    let evm = signer.evm_address(&s.env);

    let call = LockCall::StartStake(50, 0).to_xdr(&s.env);
    let sig = sign(&s, &signer, &call);
    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &evm,
        &staking.client.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::RelayedCallFailed),
        _ => unreachable!("Expected RelayedCallFailed error"),
    }

    assert!(!staking.client.get_stake(&account).exists);
    assert_eq!(s.client.get_nonce(&evm), 0);
    assert_eq!(s.client.balance_of(&account), FEE);
}

#[test]
fn test_relay_is_unknown_to_staking_until_trusted() {
    let s = setup();
    let staking = staking_behind_relay(&s);
    let outsider = Address::generate(&s.env);
    staking.client.set_trusted_relay(&s.owner, &outsider);

    let (account, signer) = linked_account(&s, 291, 10_000);
    prepay(&s, &account, 1);
    stake_funds(&s, &staking, &account, 1_000);

    let call = LockCall::StartStake(1_000, 0).to_xdr(&s.env);
    let sig = sign(&s, &signer, &call);
    match s.client.try_relay_meta_transaction(
        &s.forwarder,
        &signer.evm_address(&s.env),
        &staking.client.address,
        &call,
        &sig,
    ) {
        Err(Ok(e)) => assert_eq!(e, ContractError::RelayedCallFailed),
        _ => unreachable!("Expected RelayedCallFailed error"),
    }
    assert!(!staking.client.get_stake(&account).exists);
}
