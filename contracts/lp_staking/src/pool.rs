//! Pool table: an append-only arena of [`Pool`] records indexed by `pid`,
//! plus an `asset -> pid` lookup.

use soroban_sdk::{contracttype, Address, Env};

use crate::errors::ContractError;
use crate::rewards;

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum PoolKey {
    Pool(u32),
    ByAsset(Address),
    Count,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub pid: u32,
    pub asset: Address,
    pub weight: u32,
    pub last_reward_time: u64,
    /// Reward per staked unit, scaled by [`rewards::ACC_PRECISION`]. Never decreases.
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
}

/// Emission parameters shared by every pool at settlement time.
#[derive(Clone, Copy, Debug)]
pub struct Emission {
    pub reward_per_minute: i128,
    pub total_weight: u32,
}

impl Pool {
    /// Advances the index to `now`.
    ///
    /// An empty pool only moves its clock: emission for an interval nobody
    /// staked through is never owed to anyone.
    pub fn settle(&mut self, now: u64, emission: Emission) -> Result<(), ContractError> {
        if now <= self.last_reward_time {
            return Ok(());
        }
        if self.total_staked == 0 {
            self.last_reward_time = now;
            return Ok(());
        }
        let minutes = rewards::elapsed_minutes(self.last_reward_time, now);
        let reward = rewards::pool_emission(
            minutes,
            emission.reward_per_minute,
            self.weight,
            emission.total_weight,
        )?;
        self.acc_reward_per_share =
            rewards::accrue_index(self.acc_reward_per_share, reward, self.total_staked)?;
        self.last_reward_time = now;
        Ok(())
    }
}

pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&PoolKey::Count).unwrap_or(0)
}

pub fn load(env: &Env, pid: u32) -> Result<Pool, ContractError> {
    env.storage()
        .persistent()
        .get(&PoolKey::Pool(pid))
        .ok_or(ContractError::PoolNotFound)
}

pub fn save(env: &Env, pool: &Pool) {
    let key = PoolKey::Pool(pool.pid);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn pid_of(env: &Env, asset: &Address) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&PoolKey::ByAsset(asset.clone()))
}

/// Appends a new pool. Returns `PoolExists` when `asset` already has one.
pub fn push(
    env: &Env,
    asset: &Address,
    weight: u32,
    last_reward_time: u64,
) -> Result<Pool, ContractError> {
    if pid_of(env, asset).is_some() {
        return Err(ContractError::PoolExists);
    }
    let pid = count(env);
    let pool = Pool {
        pid,
        asset: asset.clone(),
        weight,
        last_reward_time,
        acc_reward_per_share: 0,
        total_staked: 0,
    };
    save(env, &pool);

    let by_asset = PoolKey::ByAsset(asset.clone());
    env.storage().persistent().set(&by_asset, &pid);
    env.storage()
        .persistent()
        .extend_ttl(&by_asset, TTL_THRESHOLD, TTL_EXTEND_TO);
    env.storage().instance().set(&PoolKey::Count, &(pid + 1));
    Ok(pool)
}
