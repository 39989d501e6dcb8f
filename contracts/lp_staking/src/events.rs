#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub reward_token: Address,
    pub price_oracle: Address,
    pub reward_per_minute: i128,
    pub lock_period: u64,
    pub start_time: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub asset: Address,
    pub weight: u32,
    pub total_weight: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pid: u32,
    pub old_weight: u32,
    pub new_weight: u32,
    pub total_weight: u32,
    pub timestamp: u64,
}

/// Fired by an explicit `update_pool`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pid: u32,
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a user deposits into a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pid: u32,
    pub owner: Address,
    pub amount: i128,
    pub new_position: i128,
    pub new_total_staked: i128,
    pub acc_reward_per_share: i128,
    pub reward_paid: i128,
    pub carried_reward: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws from a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub pid: u32,
    pub owner: Address,
    pub amount: i128,
    pub new_position: i128,
    pub new_total_staked: i128,
    pub acc_reward_per_share: i128,
    pub reward_paid: i128,
    pub carried_reward: i128,
    /// Carried reward dropped by a full withdrawal.
    pub forfeited: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimEvent {
    pub pid: u32,
    pub owner: Address,
    pub reward_paid: i128,
    pub carried_reward: i128,
    pub acc_reward_per_share: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftRewardedEvent {
    pub owner: Address,
    pub nft: Address,
    pub model: u32,
    pub token_id: u64,
    pub reward_cost: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub pid: u32,
    pub owner: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub from: Address,
    pub amount: i128,
    pub reward_reserve: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FinishedEvent {
    pub total_finished_reward: i128,
    pub swept: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateSetEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub total_finished_reward: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockPeriodSetEvent {
    pub new_period: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinDepositSetEvent {
    pub new_value: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardModeSetEvent {
    pub reward_in_token: bool,
    pub reward_in_nft: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardNftsSetEvent {
    pub entries: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrustedRelaySetEvent {
    pub relay: Address,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    reward_token: Address,
    price_oracle: Address,
    reward_per_minute: i128,
    lock_period: u64,
    start_time: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            reward_token,
            price_oracle,
            reward_per_minute,
            lock_period,
            start_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(env: &Env, pid: u32, asset: Address, weight: u32, total_weight: u32) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            asset,
            weight,
            total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_weight_set(
    env: &Env,
    pid: u32,
    old_weight: u32,
    new_weight: u32,
    total_weight: u32,
) {
    env.events().publish(
        (symbol_short!("POOL_WGT"), pid),
        PoolWeightSetEvent {
            pid,
            old_weight,
            new_weight,
            total_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_updated(env: &Env, pid: u32, acc_reward_per_share: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pid),
        PoolUpdatedEvent {
            pid,
            acc_reward_per_share,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposit(env: &Env, event: DepositEvent) {
    env.events()
        .publish((symbol_short!("DEPOSIT"), event.owner.clone()), event);
}

pub fn publish_withdraw(env: &Env, event: WithdrawEvent) {
    env.events()
        .publish((symbol_short!("WITHDRAW"), event.owner.clone()), event);
}

pub fn publish_claim(
    env: &Env,
    pid: u32,
    owner: Address,
    reward_paid: i128,
    carried_reward: i128,
    acc_reward_per_share: i128,
) {
    env.events().publish(
        (symbol_short!("CLAIM"), owner.clone()),
        ClaimEvent {
            pid,
            owner,
            reward_paid,
            carried_reward,
            acc_reward_per_share,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_nft_rewarded(
    env: &Env,
    owner: Address,
    nft: Address,
    model: u32,
    token_id: u64,
    reward_cost: i128,
) {
    env.events().publish(
        (symbol_short!("NFT_RWD"), owner.clone()),
        NftRewardedEvent {
            owner,
            nft,
            model,
            token_id,
            reward_cost,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdraw(
    env: &Env,
    pid: u32,
    owner: Address,
    amount: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), owner.clone()),
        EmergencyWithdrawEvent {
            pid,
            owner,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funded(env: &Env, from: Address, amount: i128, reward_reserve: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), from.clone()),
        FundedEvent {
            from,
            amount,
            reward_reserve,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_finished(env: &Env, total_finished_reward: i128, swept: i128) {
    env.events().publish(
        (symbol_short!("FINISHED"),),
        FinishedEvent {
            total_finished_reward,
            swept,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_rate_set(
    env: &Env,
    old_rate: i128,
    new_rate: i128,
    total_finished_reward: i128,
) {
    env.events().publish(
        (symbol_short!("RWD_RATE"),),
        RewardRateSetEvent {
            old_rate,
            new_rate,
            total_finished_reward,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_lock_period_set(env: &Env, new_period: u64) {
    env.events().publish(
        (symbol_short!("LOCK_SET"),),
        LockPeriodSetEvent {
            new_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_min_deposit_set(env: &Env, new_value: i128) {
    env.events().publish(
        (symbol_short!("MIN_DEP"),),
        MinDepositSetEvent {
            new_value,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_mode_set(env: &Env, reward_in_token: bool, reward_in_nft: bool) {
    env.events().publish(
        (symbol_short!("RWD_MODE"),),
        RewardModeSetEvent {
            reward_in_token,
            reward_in_nft,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_nfts_set(env: &Env, entries: u32) {
    env.events().publish(
        (symbol_short!("NFT_SET"),),
        RewardNftsSetEvent {
            entries,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_trusted_relay_set(env: &Env, relay: Address) {
    env.events().publish(
        (symbol_short!("RELAY_SET"),),
        TrustedRelaySetEvent {
            relay,
            timestamp: env.ledger().timestamp(),
        },
    );
}
