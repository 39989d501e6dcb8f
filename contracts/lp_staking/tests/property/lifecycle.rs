#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property tests that drive the contract through random action sequences.
//!
//! Invariants tested after every step:
//! - A pool's `total_staked` equals the sum of its positions and the asset held
//! - `acc_reward_per_share` never decreases
//! - Pending reward is never negative
//! - Reward paid out never exceeds what has been emitted
//! - The contract holds exactly its reward reserve, and paid plus reserve is
//!   what was funded

use lp_staking::{LpStakingContract, LpStakingContractClient};
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

const T0: u64 = 1_700_000_000;
const RATE: i128 = 4_203_500;
const LOCK: u64 = 30 * 86_400;
const USERS: usize = 3;
// Runs out within a few waits, so shortfalls are carried.
const RESERVE: i128 = 100_000_000_000;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct World {
    env: Env,
    client: LpStakingContractClient<'static>,
    contract: Address,
    reward: Address,
    lp: Address,
    users: std::vec::Vec<Address>,
}

fn setup() -> World {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(T0);

    let owner = Address::generate(&env);
    let reward = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let lp = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract = env.register(LpStakingContract, ());
    let client = LpStakingContractClient::new(&env, &contract);
    client.initialize(&owner, &reward, &owner, &RATE, &0, &LOCK, &T0);
    client.add_pool(&owner, &lp, &100, &false);
    StellarAssetClient::new(&env, &reward).mint(&owner, &RESERVE);
    client.fund(&owner, &RESERVE);

    let mut users = std::vec::Vec::new();
    for _ in 0..USERS {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &lp).mint(&user, &1_000_000);
        TokenClient::new(&env, &lp).approve(&user, &contract, &1_000_000, &100_000);
        users.push(user);
    }

    World {
        env,
        client,
        contract,
        reward,
        lp,
        users,
    }
}

#[derive(Clone, Debug)]
enum Action {
    Deposit(usize, i128),
    Withdraw(usize, i128),
    Claim(usize),
    Emergency(usize),
    Wait(u64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..USERS, 1i128..10_000).prop_map(|(u, a)| Action::Deposit(u, a)),
        (0..USERS, 1i128..10_000).prop_map(|(u, a)| Action::Withdraw(u, a)),
        (0..USERS).prop_map(Action::Claim),
        (0..USERS).prop_map(Action::Emergency),
        (0u64..(LOCK * 2)).prop_map(Action::Wait),
    ]
}

fn apply(w: &World, step: &Action) {
    match *step {
        Action::Deposit(u, amount) => {
            let _ = w.client.try_deposit(&w.users[u], &0, &amount);
        }
        Action::Withdraw(u, amount) => {
            let _ = w.client.try_withdraw(&w.users[u], &0, &amount);
        }
        Action::Claim(u) => {
            let _ = w.client.try_claim(&w.users[u], &0);
        }
        Action::Emergency(u) => {
            let _ = w.client.try_emergency_withdraw(&w.users[u], &0);
        }
        Action::Wait(seconds) => {
            let now = w.env.ledger().timestamp();
            w.env.ledger().set_timestamp(now + seconds);
        }
    }
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_sequences_keep_books_balanced(
        steps in proptest::collection::vec(action(), 1..24)
    ) {
        let w = setup();
        let lp = TokenClient::new(&w.env, &w.lp);
        let reward = TokenClient::new(&w.env, &w.reward);
        let mut last_acc = 0i128;

        for step in steps.iter() {
            apply(&w, step);

            let pool = w.client.get_pool(&0);
            let positions: i128 = w
                .users
                .iter()
                .map(|u| w.client.get_position(&0, u).amount)
                .sum();
            prop_assert_eq!(pool.total_staked, positions);
            prop_assert_eq!(lp.balance(&w.contract), positions);

            prop_assert!(pool.acc_reward_per_share >= last_acc);
            last_acc = pool.acc_reward_per_share;

            for user in w.users.iter() {
                prop_assert!(w.client.pending_reward(&0, user) >= 0);
            }

            let paid: i128 = w.users.iter().map(|u| reward.balance(u)).sum();
            prop_assert!(paid <= w.client.total_finished_reward());

            let reserve = w.client.reward_reserve();
            prop_assert!(reserve >= 0);
            prop_assert_eq!(reward.balance(&w.contract), reserve);
            prop_assert_eq!(paid + reserve, RESERVE);
        }
    }
}
