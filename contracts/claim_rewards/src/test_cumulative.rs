extern crate std;

use common::testutils::TestSigner;
use soroban_sdk::{testutils::Address as _, Address};

use crate::{
    test::{airdrop_sig, cumulative_sig, rewards, setup, LIMIT, TREASURY},
    ClaimRewardsContract, ClaimRewardsContractClient, ContractError,
};

#[test]
fn test_cursor_advances_and_old_signatures_die() {
    let s = setup();
    let user = Address::generate(&s.env);

    let first = cumulative_sig(&s, &s.admin, &user, 0, 2);
    assert_eq!(s.client.claim_reward_by_signature(&user, &0, &2, &first), 2);
    assert_eq!(s.client.claimed_reward(&user), 2);

    let second = cumulative_sig(&s, &s.admin, &user, 2, 3);
    assert_eq!(s.client.claim_reward_by_signature(&user, &2, &3, &second), 3);
    assert_eq!(s.client.claimed_reward(&user), 5);

    match s.client.try_claim_reward_by_signature(&user, &0, &2, &first) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidClaimedAmount),
        _ => unreachable!("Expected InvalidClaimedAmount error"),
    }
    // Re-presenting the first signature at the current cursor changes the
    // signed message, so it no longer recovers to the admin.
    match s.client.try_claim_reward_by_signature(&user, &5, &2, &first) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAllowed),
        _ => unreachable!("Expected NotAllowed error"),
    }

    assert_eq!(s.native.balance(&user), 5);
    assert_eq!(s.native.balance(&s.contract), TREASURY - 5);
    assert_eq!(s.client.total_claimed_reward(), 5);
    assert_eq!(s.client.claimed_count(), 2);
}

#[test]
fn test_record_is_checked_before_signature() {
    let s = setup();
    let user = Address::generate(&s.env);
    let stranger = TestSigner::from_scalar(90);

    let sig = cumulative_sig(&s, &stranger, &user, 7, 1);
    match s.client.try_claim_reward_by_signature(&user, &7, &1, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidClaimedAmount),
        _ => unreachable!("Expected InvalidClaimedAmount error"),
    }

    let sig = cumulative_sig(&s, &stranger, &user, 0, 1);
    match s.client.try_claim_reward_by_signature(&user, &0, &1, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAllowed),
        _ => unreachable!("Expected NotAllowed error"),
    }
}

#[test]
fn test_non_positive_amount_is_rejected() {
    let s = setup();
    let user = Address::generate(&s.env);
    let sig = cumulative_sig(&s, &s.admin, &user, 0, 0);
    match s.client.try_claim_reward_by_signature(&user, &0, &0, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
    match s.client.try_claim_reward_by_signature(&user, &0, &-1, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_signature_is_bound_to_recipient() {
    let s = setup();
    let user = Address::generate(&s.env);
    let thief = Address::generate(&s.env);
    let sig = cumulative_sig(&s, &s.admin, &user, 0, 10);

    match s.client.try_claim_reward_by_signature(&thief, &0, &10, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAllowed),
        _ => unreachable!("Expected NotAllowed error"),
    }
    assert_eq!(s.client.claimed_reward(&thief), 0);
}

#[test]
fn test_signature_is_bound_to_contract() {
    let s = setup();
    let user = Address::generate(&s.env);
    let sig = cumulative_sig(&s, &s.admin, &user, 0, 10);

    let twin = ClaimRewardsContractClient::new(&s.env, &s.env.register(ClaimRewardsContract, ()));
    twin.initialize(
        &s.owner,
        &s.admin.evm_address(&s.env),
        &s.native.address,
        &s.reward.address,
        &LIMIT,
        &rewards(),
    );
    match twin.try_claim_reward_by_signature(&user, &0, &10, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotAllowed),
        _ => unreachable!("Expected NotAllowed error"),
    }
}

#[test]
fn test_limit_is_shared_between_strategies() {
    let s = setup();
    s.client.set_limit(&s.owner, &2);
    let user = Address::generate(&s.env);

    let sig = airdrop_sig(&s, &s.admin, &user, false);
    s.client.do_airdrop_by_signature(&user, &false, &sig);
    let sig = cumulative_sig(&s, &s.admin, &user, 0, 4);
    s.client.claim_reward_by_signature(&user, &0, &4, &sig);

    let sig = cumulative_sig(&s, &s.admin, &user, 4, 4);
    match s.client.try_claim_reward_by_signature(&user, &4, &4, &sig) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ReachedLimit),
        _ => unreachable!("Expected ReachedLimit error"),
    }
    assert_eq!(s.client.claimed_reward(&user), 4);
}
