#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lock_staking::{LockStakingContract, LockStakingContractClient, RewardBasis, TierTerms};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const T0: u64 = 1_700_000_000;
const DAY: u64 = 86_400;
const FUNDS: i128 = 1_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Start { user: u8, amount: u32, tier: u8 },
    End { user: u8 },
    Emergency { user: u8 },
    ToggleTier { tier: u8 },
    ToggleEarly,
    SetLimit { limit: u32 },
    Finish,
    Fund { amount: u16 },
    Advance { days: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
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
        (30u32, 0u32, RewardBasis::Flat),
        (60, 500, RewardBasis::Flat),
        (10, 20, RewardBasis::PerDay(90)),
    ];
    for (lock_days, reward_rate_bps, basis) in terms {
        client.add_tier(
            &owner,
            &TierTerms {
                lock_days,
                reward_rate_bps,
                min_amount: 100,
                basis,
            },
            &true,
        );
    }
    // A small reserve, so reward shortfalls are reachable.
    StellarAssetClient::new(&env, &token).mint(&owner, &FUNDS);
    client.fund(&owner, &5_000);

    let mut users = Vec::new();
    for _ in 0..3 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &token).mint(&user, &FUNDS);
        TokenClient::new(&env, &token).approve(&user, &contract, &FUNDS, &100_000);
        users.push(user);
    }
    let tiers = client.tier_count();

    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Start { user, amount, tier } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_start_stake(user, &(amount as i128), &(tier as u32 % tiers));
            }
            FuzzAction::End { user } => {
                let _ = client.try_end_stake(&users[user as usize % users.len()]);
            }
            FuzzAction::Emergency { user } => {
                let _ = client.try_emergency_withdraw(&users[user as usize % users.len()]);
            }
            FuzzAction::ToggleTier { tier } => {
                let index = tier as u32 % tiers;
                let enabled = client.get_tier(&index).enabled;
                let _ = client.try_set_tier_enabled(&owner, &index, &!enabled);
            }
            FuzzAction::ToggleEarly => {
                let allowed = client.early_unstake_allowed();
                let _ = client.try_set_early_unstake_allowed(&owner, &!allowed);
            }
            FuzzAction::SetLimit { limit } => {
                let _ = client.try_set_stake_limit(&owner, &(limit as i128));
            }
            FuzzAction::Finish => {
                let _ = client.try_finish(&owner);
            }
            FuzzAction::Fund { amount } => {
                let _ = client.try_fund(&owner, &(amount as i128));
            }
            FuzzAction::Advance { days } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + days as u64 * DAY);
            }
        }

        let open: i128 = users
            .iter()
            .map(|u| client.get_stake(u))
            .filter(|s| s.exists)
            .map(|s| s.amount)
            .sum();
        let per_tier: i128 = client.get_tiers().iter().map(|t| t.total_staked).sum();
        assert_eq!(client.total_staked(), open);
        assert_eq!(per_tier, open);
        let reserve = client.reward_reserve();
        assert!(reserve >= 0);
        assert_eq!(TokenClient::new(&env, &token).balance(&contract), open + reserve);
    }
});
