#![allow(deprecated)] // events().publish migration tracked separately

use common::EvmAddress;
use soroban_sdk::{symbol_short, Address, Env};

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub admin: EvmAddress,
    pub native_token: Address,
    pub reward_token: Address,
    pub limit: u32,
    pub timestamp: u64,
}

/// Fired by a successful one-shot claim.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AirdropClaimedEvent {
    pub recipient: Address,
    pub extra: bool,
    pub native: i128,
    pub token: i128,
    pub token_extra: i128,
    pub claimed_count: u32,
    pub timestamp: u64,
}

/// Fired by a successful cumulative claim. `new_cursor` is the value the
/// recipient's next signature must carry.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub recipient: Address,
    pub old_cursor: i128,
    pub new_cursor: i128,
    pub amount: i128,
    pub total_claimed_reward: i128,
    pub claimed_count: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminEvent {
    pub old_admin: EvmAddress,
    pub new_admin: EvmAddress,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsSetEvent {
    pub native_reward: i128,
    pub token_reward: i128,
    pub extra_bps: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LimitSetEvent {
    pub old_limit: u32,
    pub new_limit: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub to: Address,
    pub native: i128,
    pub token: i128,
    pub timestamp: u64,
}

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    admin: EvmAddress,
    native_token: Address,
    reward_token: Address,
    limit: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            admin,
            native_token,
            reward_token,
            limit,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_airdrop_claimed(
    env: &Env,
    recipient: Address,
    extra: bool,
    native: i128,
    token: i128,
    token_extra: i128,
    claimed_count: u32,
) {
    env.events().publish(
        (symbol_short!("AIRDROP"), recipient.clone()),
        AirdropClaimedEvent {
            recipient,
            extra,
            native,
            token,
            token_extra,
            claimed_count,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_reward_claimed(
    env: &Env,
    recipient: Address,
    old_cursor: i128,
    new_cursor: i128,
    amount: i128,
    total_claimed_reward: i128,
    claimed_count: u32,
) {
    env.events().publish(
        (symbol_short!("CLAIMED"), recipient.clone()),
        RewardClaimedEvent {
            recipient,
            old_cursor,
            new_cursor,
            amount,
            total_claimed_reward,
            claimed_count,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_proposed(env: &Env, old_admin: EvmAddress, new_admin: EvmAddress) {
    env.events().publish(
        (symbol_short!("ADM_PROP"),),
        AdminEvent {
            old_admin,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_accepted(env: &Env, old_admin: EvmAddress, new_admin: EvmAddress) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"),),
        AdminEvent {
            old_admin,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_set(env: &Env, native_reward: i128, token_reward: i128, extra_bps: u32) {
    env.events().publish(
        (symbol_short!("RWD_SET"),),
        RewardsSetEvent {
            native_reward,
            token_reward,
            extra_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_limit_set(env: &Env, old_limit: u32, new_limit: u32) {
    env.events().publish(
        (symbol_short!("LIMIT_SET"),),
        LimitSetEvent {
            old_limit,
            new_limit,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, to: Address, native: i128, token: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), to.clone()),
        WithdrawnEvent {
            to,
            native,
            token,
            timestamp: env.ledger().timestamp(),
        },
    );
}
