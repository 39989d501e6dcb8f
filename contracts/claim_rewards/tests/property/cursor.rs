#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property tests for cumulative claims.
//!
//! Invariants tested after every step:
//! - `claimed_reward` never decreases and moves only on success
//! - Every signature succeeds at most once
//! - Native tokens paid out equal `total_claimed_reward`

use claim_rewards::{ClaimRewardsContract, ClaimRewardsContractClient, RewardConfig};
use common::testutils::{self, TestSigner};
use common::SignatureParts;
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

const USERS: usize = 3;
const TREASURY: i128 = 1_000_000_000;

struct World {
    env: Env,
    client: ClaimRewardsContractClient<'static>,
    contract: Address,
    native: Address,
    admin: TestSigner,
    users: std::vec::Vec<Address>,
}

fn setup() -> World {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let owner = Address::generate(&env);
    let admin = TestSigner::from_scalar(5);
    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract = env.register(ClaimRewardsContract, ());
    let client = ClaimRewardsContractClient::new(&env, &contract);
    client.initialize(
        &owner,
        &admin.evm_address(&env),
        &native,
        &reward,
        &0,
        &RewardConfig {
            native_reward: 0,
            token_reward: 0,
            extra_bps: 0,
        },
    );
    StellarAssetClient::new(&env, &native).mint(&contract, &TREASURY);

    let users = (0..USERS).map(|_| Address::generate(&env)).collect();
    World {
        env,
        client,
        contract,
        native,
        admin,
        users,
    }
}

fn sign(w: &World, recipient: &Address, cursor: i128, amount: i128) -> SignatureParts {
    let mut msg = std::vec::Vec::new();
    msg.extend_from_slice(&testutils::evm_identity(&w.env, &w.contract));
    msg.extend_from_slice(&testutils::evm_identity(&w.env, recipient));
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&(cursor as u128).to_be_bytes());
    msg.extend_from_slice(&word);
    word[16..].copy_from_slice(&(amount as u128).to_be_bytes());
    msg.extend_from_slice(&word);
    w.admin.sign_personal(&w.env, &testutils::keccak(&msg))
}

#[derive(Clone, Debug)]
enum Action {
    /// Claim at the recipient's current cursor.
    Fresh { user: usize, amount: i128 },
    /// Claim at a cursor offset from the current one.
    Skewed { user: usize, offset: i128, amount: i128 },
    /// Resubmit an earlier successful claim verbatim.
    Replay { index: usize },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (0..USERS, 1i128..10_000).prop_map(|(user, amount)| Action::Fresh { user, amount }),
        1 => (0..USERS, 1i128..50, 1i128..10_000)
            .prop_map(|(user, offset, amount)| Action::Skewed { user, offset, amount }),
        2 => (0usize..32).prop_map(|index| Action::Replay { index }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn cursor_claims_are_single_use(
        actions in proptest::collection::vec(action(), 1..24)
    ) {
        let w = setup();
        let mut used: std::vec::Vec<(usize, i128, i128, SignatureParts)> = std::vec::Vec::new();

        for action in actions {
            let (user, cursor, amount, sig, replay) = match action {
                Action::Fresh { user, amount } => {
                    let cursor = w.client.claimed_reward(&w.users[user]);
                    (user, cursor, amount, sign(&w, &w.users[user], cursor, amount), false)
                }
                Action::Skewed { user, offset, amount } => {
                    let cursor = w.client.claimed_reward(&w.users[user]) + offset;
                    (user, cursor, amount, sign(&w, &w.users[user], cursor, amount), false)
                }
                Action::Replay { index } => {
                    if used.is_empty() {
                        continue;
                    }
                    let (user, cursor, amount, sig) = used[index % used.len()].clone();
                    (user, cursor, amount, sig, true)
                }
            };

            let recipient = &w.users[user];
            let before = w.client.claimed_reward(recipient);
            let outcome = w.client.try_claim_reward_by_signature(recipient, &cursor, &amount, &sig);
            let after = w.client.claimed_reward(recipient);

            prop_assert!(after >= before);
            if outcome.is_ok() {
                prop_assert!(!replay);
                prop_assert_eq!(cursor, before);
                prop_assert_eq!(after, before + amount);
                used.push((user, cursor, amount, sig));
            } else {
                prop_assert_eq!(after, before);
            }

            let total: i128 = w.users.iter().map(|u| w.client.claimed_reward(u)).sum();
            prop_assert_eq!(w.client.total_claimed_reward(), total);
            let paid: i128 = w
                .users
                .iter()
                .map(|u| TokenClient::new(&w.env, &w.native).balance(u))
                .sum();
            prop_assert_eq!(paid, total);
        }
    }
}
