#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::tier::StakeTier;

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub token: Address,
    pub staking_window: u64,
    pub stake_limit: i128,
    pub timestamp: u64,
}

/// Fired when a tier is added or its terms change.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierSetEvent {
    pub index: u32,
    pub tier: StakeTier,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierEnabledEvent {
    pub index: u32,
    pub enabled: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeStartedEvent {
    pub owner: Address,
    pub tier_index: u32,
    pub amount: i128,
    pub tier_total_staked: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeEndedEvent {
    pub owner: Address,
    pub tier_index: u32,
    pub amount: i128,
    pub reward: i128,
    pub staked_period: u64,
    pub tier_total_staked: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub owner: Address,
    pub tier_index: u32,
    pub amount: i128,
    pub total_staked: i128,
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
    pub swept: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchedEvent {
    pub launched_at: u64,
    pub staking_window: u64,
}

/// Fired by the scalar parameter setters; the topic names the parameter.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamSetEvent {
    pub value: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressSetEvent {
    pub address: Address,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    token: Address,
    staking_window: u64,
    stake_limit: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            token,
            staking_window,
            stake_limit,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_tier_set(env: &Env, index: u32, tier: StakeTier) {
    env.events().publish(
        (symbol_short!("TIER_SET"), index),
        TierSetEvent {
            index,
            tier,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_tier_enabled(env: &Env, index: u32, enabled: bool) {
    env.events().publish(
        (symbol_short!("TIER_ON"), index),
        TierEnabledEvent {
            index,
            enabled,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_started(env: &Env, event: StakeStartedEvent) {
    env.events()
        .publish((symbol_short!("STAKE_ST"), event.owner.clone()), event);
}

pub fn publish_stake_ended(env: &Env, event: StakeEndedEvent) {
    env.events()
        .publish((symbol_short!("STAKE_END"), event.owner.clone()), event);
}

pub fn publish_emergency_withdraw(
    env: &Env,
    owner: Address,
    tier_index: u32,
    amount: i128,
    total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), owner.clone()),
        EmergencyWithdrawEvent {
            owner,
            tier_index,
            amount,
            total_staked,
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

pub fn publish_finished(env: &Env, swept: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("FINISHED"),),
        FinishedEvent {
            swept,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_launched(env: &Env, launched_at: u64, staking_window: u64) {
    env.events().publish(
        (symbol_short!("LAUNCHED"),),
        LaunchedEvent {
            launched_at,
            staking_window,
        },
    );
}

pub fn publish_stake_limit_set(env: &Env, limit: i128) {
    env.events().publish(
        (symbol_short!("LIMIT_SET"),),
        ParamSetEvent {
            value: limit,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_early_unstake_set(env: &Env, allowed: bool) {
    env.events().publish(
        (symbol_short!("EARLY_SET"),),
        ParamSetEvent {
            value: allowed as i128,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staking_window_set(env: &Env, window: u64) {
    env.events().publish(
        (symbol_short!("WINDOW"),),
        ParamSetEvent {
            value: window as i128,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vault_set(env: &Env, vault: Address) {
    env.events().publish(
        (symbol_short!("VAULT_SET"),),
        AddressSetEvent {
            address: vault,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_trusted_relay_set(env: &Env, relay: Address) {
    env.events().publish(
        (symbol_short!("RELAY_SET"),),
        AddressSetEvent {
            address: relay,
            timestamp: env.ledger().timestamp(),
        },
    );
}
