#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lp_staking::{LpStakingContract, LpStakingContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const T0: u64 = 1_700_000_000;
const FUNDS: i128 = 1_000_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, pid: u8, amount: u32 },
    Withdraw { user: u8, pid: u8, amount: u32 },
    Claim { user: u8, pid: u8 },
    EmergencyWithdraw { user: u8, pid: u8 },
    SetWeight { pid: u8, weight: u16 },
    SetRate { rate: u32 },
    Advance { seconds: u32 },
    Fund { amount: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(T0);

    let owner = Address::generate(&env);
    let reward = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract = env.register(LpStakingContract, ());
    let client = LpStakingContractClient::new(&env, &contract);
    client.initialize(&owner, &reward, &owner, &4_203_500, &0, &(30 * 86_400), &T0);
    // A small reserve, so reward shortfalls are reachable.
    StellarAssetClient::new(&env, &reward).mint(&owner, &(FUNDS * 1_000));
    client.fund(&owner, &FUNDS);

    let mut assets = Vec::new();
    for weight in [100u32, 40] {
        let asset = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        client.add_pool(&owner, &asset, &weight, &false);
        assets.push(asset);
    }

    let mut users = Vec::new();
    for _ in 0..3 {
        let user = Address::generate(&env);
        for asset in &assets {
            StellarAssetClient::new(&env, asset).mint(&user, &FUNDS);
            TokenClient::new(&env, asset).approve(&user, &contract, &FUNDS, &100_000);
        }
        users.push(user);
    }

    let mut last_acc = vec![0i128; assets.len()];
    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Deposit { user, pid, amount } => {
                let user = &users[user as usize % users.len()];
                let pid = pid as u32 % assets.len() as u32;
                let _ = client.try_deposit(user, &pid, &(amount as i128));
            }
            FuzzAction::Withdraw { user, pid, amount } => {
                let user = &users[user as usize % users.len()];
                let pid = pid as u32 % assets.len() as u32;
                let _ = client.try_withdraw(user, &pid, &(amount as i128));
            }
            FuzzAction::Claim { user, pid } => {
                let user = &users[user as usize % users.len()];
                let pid = pid as u32 % assets.len() as u32;
                let _ = client.try_claim(user, &pid);
            }
            FuzzAction::EmergencyWithdraw { user, pid } => {
                let user = &users[user as usize % users.len()];
                let pid = pid as u32 % assets.len() as u32;
                let _ = client.try_emergency_withdraw(user, &pid);
            }
            FuzzAction::SetWeight { pid, weight } => {
                let pid = pid as u32 % assets.len() as u32;
                let _ = client.try_set_pool_weight(&owner, &pid, &(weight as u32), &true);
            }
            FuzzAction::SetRate { rate } => {
                let _ = client.try_set_reward_per_minute(&owner, &(rate as i128));
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + seconds as u64 % (120 * 86_400));
            }
            FuzzAction::Fund { amount } => {
                let _ = client.try_fund(&owner, &(amount as i128));
            }
        }

        let reserve = client.reward_reserve();
        assert!(reserve >= 0);
        assert_eq!(TokenClient::new(&env, &reward).balance(&contract), reserve);

        for (pid, asset) in assets.iter().enumerate() {
            let pid_u32 = pid as u32;
            let pool = client.get_pool(&pid_u32);
            let staked: i128 = users
                .iter()
                .map(|u| client.get_position(&pid_u32, u).amount)
                .sum();
            assert_eq!(pool.total_staked, staked);
            assert_eq!(TokenClient::new(&env, asset).balance(&contract), staked);
            assert!(pool.acc_reward_per_share >= last_acc[pid]);
            last_acc[pid] = pool.acc_reward_per_share;
            for user in &users {
                assert!(client.pending_reward(&pid_u32, user) >= 0);
            }
        }
    }
});
