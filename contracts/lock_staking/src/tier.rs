//! Reward tier table: an append-only arena of [`StakeTier`] records indexed
//! by their position.

use common::math;
use soroban_sdk::{contracttype, Env, Vec};

use crate::errors::ContractError;

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

pub const SECONDS_PER_DAY: u64 = 86_400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum TierKey {
    Tier(u32),
    Count,
}

/// How a served lock turns into reward.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RewardBasis {
    /// `amount * bps / 10_000`, once.
    Flat,
    /// `amount * min(days_held, max_days) * bps / 10_000`.
    PerDay(u32),
}

/// Owner-supplied terms of a tier.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierTerms {
    pub lock_days: u32,
    pub reward_rate_bps: u32,
    pub min_amount: i128,
    pub basis: RewardBasis,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeTier {
    pub enabled: bool,
    pub lock_days: u32,
    pub reward_rate_bps: u32,
    pub min_amount: i128,
    pub basis: RewardBasis,
    /// Principal currently locked in this tier.
    pub total_staked: i128,
}

impl StakeTier {
    pub fn new(enabled: bool, terms: &TierTerms) -> Self {
        StakeTier {
            enabled,
            lock_days: terms.lock_days,
            reward_rate_bps: terms.reward_rate_bps,
            min_amount: terms.min_amount,
            basis: terms.basis,
            total_staked: 0,
        }
    }

    /// Replaces the terms; `enabled` and `total_staked` are kept.
    pub fn apply(&mut self, terms: &TierTerms) {
        self.lock_days = terms.lock_days;
        self.reward_rate_bps = terms.reward_rate_bps;
        self.min_amount = terms.min_amount;
        self.basis = terms.basis;
    }

    pub fn unlocks_at(&self, staked_at: u64) -> u64 {
        staked_at.saturating_add(self.lock_days as u64 * SECONDS_PER_DAY)
    }

    pub fn is_served(&self, staked_at: u64, now: u64) -> bool {
        now >= self.unlocks_at(staked_at)
    }

    /// Reward for `amount` staked at `staked_at` and ended at `now`. Zero
    /// until the lock has been served.
    pub fn reward_for(&self, amount: i128, staked_at: u64, now: u64) -> Result<i128, ContractError> {
        if !self.is_served(staked_at, now) {
            return Ok(0);
        }
        let reward = match self.basis {
            RewardBasis::Flat => math::apply_bps(amount, self.reward_rate_bps)?,
            RewardBasis::PerDay(max_days) => {
                let days = (now.saturating_sub(staked_at) / SECONDS_PER_DAY).min(max_days as u64);
                let weighted = amount
                    .checked_mul(days as i128)
                    .ok_or(ContractError::ArithmeticError)?;
                math::apply_bps(weighted, self.reward_rate_bps)?
            }
        };
        Ok(reward)
    }
}

pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&TierKey::Count).unwrap_or(0)
}

pub fn load(env: &Env, index: u32) -> Result<StakeTier, ContractError> {
    env.storage()
        .persistent()
        .get(&TierKey::Tier(index))
        .ok_or(ContractError::InvalidTierIndex)
}

pub fn save(env: &Env, index: u32, tier: &StakeTier) {
    let key = TierKey::Tier(index);
    env.storage().persistent().set(&key, tier);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn push(env: &Env, tier: &StakeTier) -> u32 {
    let index = count(env);
    save(env, index, tier);
    env.storage().instance().set(&TierKey::Count, &(index + 1));
    index
}

pub fn all(env: &Env) -> Vec<StakeTier> {
    let mut tiers = Vec::new(env);
    for index in 0..count(env) {
        if let Ok(tier) = load(env, index) {
            tiers.push_back(tier);
        }
    }
    tiers
}
