#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property tests that drive the registry through random action sequences.
//!
//! Invariants tested after every step:
//! - Global and per-tier totals equal the sum of open stakes
//! - The contract holds exactly the locked principal plus the reward reserve
//! - `end_stake` before unlock succeeds only with early unstaking allowed,
//!   and then pays no reward

use lock_staking::{LockStakingContract, LockStakingContractClient, RewardBasis, TierTerms};
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

const T0: u64 = 1_700_000_000;
const DAY: u64 = 86_400;
const USERS: usize = 3;
const TIERS: u32 = 3;
const RESERVE: i128 = 50_000;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct World {
    env: Env,
    client: LockStakingContractClient<'static>,
    contract: Address,
    token: Address,
    owner: Address,
    users: std::vec::Vec<Address>,
}

fn setup() -> World {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(T0);

    let owner = Address::generate(&env);
    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract = env.register(LockStakingContract, ());
    let client = LockStakingContractClient::new(&env, &contract);
    client.initialize(&owner, &token, &0, &0);

    let terms = [
        (10u32, 100u32, RewardBasis::Flat),
        (30, 500, RewardBasis::Flat),
        (5, 20, RewardBasis::PerDay(60)),
    ];
    for (lock_days, bps, basis) in terms {
        client.add_tier(
            &owner,
            &TierTerms {
                lock_days,
                reward_rate_bps: bps,
                min_amount: 1,
                basis,
            },
            &true,
        );
    }
    StellarAssetClient::new(&env, &token).mint(&owner, &RESERVE);
    client.fund(&owner, &RESERVE);

    let mut users = std::vec::Vec::new();
    for _ in 0..USERS {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &token).mint(&user, &1_000_000_000);
        TokenClient::new(&env, &token).approve(&user, &contract, &1_000_000_000, &100_000);
        users.push(user);
    }

    World {
        env,
        client,
        contract,
        token,
        owner,
        users,
    }
}

#[derive(Clone, Debug)]
enum Action {
    Start(usize, i128, u32),
    End(usize),
    Emergency(usize),
    ToggleTier(u32),
    ToggleEarly,
    Wait(u64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..USERS, 1i128..1_000_000, 0..TIERS).prop_map(|(u, a, t)| Action::Start(u, a, t)),
        (0..USERS).prop_map(Action::End),
        (0..USERS).prop_map(Action::Emergency),
        (0..TIERS).prop_map(Action::ToggleTier),
        Just(Action::ToggleEarly),
        (0u64..(40 * DAY)).prop_map(Action::Wait),
    ]
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_sequences_keep_totals_consistent(
        steps in proptest::collection::vec(action(), 1..24)
    ) {
        let w = setup();
        let token = TokenClient::new(&w.env, &w.token);

        for step in steps.iter() {
            match *step {
                Action::Start(u, amount, tier) => {
                    let _ = w.client.try_start_stake(&w.users[u], &amount, &tier);
                }
                Action::End(u) => {
                    let user = &w.users[u];
                    let before = w.client.get_stake(user);
                    let balance_before = token.balance(user);
                    let early = w.client.early_unstake_allowed();
                    let reserve_before = w.client.reward_reserve();
                    let result = w.client.try_end_stake(user);

                    if before.exists {
                        let t = w.client.get_tier(&before.tier_index);
                        let now = w.env.ledger().timestamp();
                        let served = now >= before.staked_at + t.lock_days as u64 * DAY;
                        let owed = w.client.get_stake_info(user).reward;
                        let covered = owed <= reserve_before;
                        prop_assert_eq!(result.is_ok(), (served || early) && covered);
                        if result.is_ok() && !served {
                            prop_assert_eq!(token.balance(user) - balance_before, before.amount);
                        }
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Action::Emergency(u) => {
                    let _ = w.client.try_emergency_withdraw(&w.users[u]);
                }
                Action::ToggleTier(index) => {
                    let enabled = w.client.get_tier(&index).enabled;
                    w.client.set_tier_enabled(&w.owner, &index, &!enabled);
                }
                Action::ToggleEarly => {
                    let allowed = w.client.early_unstake_allowed();
                    w.client.set_early_unstake_allowed(&w.owner, &!allowed);
                }
                Action::Wait(seconds) => {
                    let now = w.env.ledger().timestamp();
                    w.env.ledger().set_timestamp(now + seconds);
                }
            }

            let open: i128 = w
                .users
                .iter()
                .map(|u| w.client.get_stake(u))
                .filter(|s| s.exists)
                .map(|s| s.amount)
                .sum();
            let tiers: i128 = w.client.get_tiers().iter().map(|t| t.total_staked).sum();
            prop_assert_eq!(w.client.total_staked(), open);
            prop_assert_eq!(tiers, open);
            prop_assert_eq!(token.balance(&w.contract), open + w.client.reward_reserve());
        }
    }
}
