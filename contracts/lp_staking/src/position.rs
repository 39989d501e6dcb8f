use soroban_sdk::{contracttype, Address, Env};

use crate::errors::ContractError;
use crate::rewards;

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum PositionKey {
    Position(u32, Address),
}

/// One owner's stake in one pool.
///
/// `reward_debt` is `amount * acc_reward_per_share` (descaled) as of the last
/// settlement. Reward that became due while the holding period was still
/// running sits in `carried_reward` until it can be paid.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub amount: i128,
    pub reward_debt: i128,
    pub carried_reward: i128,
    pub claimable_at: u64,
}

impl Position {
    /// Everything owed at index `acc`, carried reward included.
    pub fn pending(&self, acc: i128) -> Result<i128, ContractError> {
        let fresh = rewards::pending(self.amount, acc, self.reward_debt)?;
        fresh
            .checked_add(self.carried_reward)
            .ok_or(ContractError::ArithmeticError)
    }

    /// Re-snapshots the debt at `acc` for the current amount.
    pub fn rebase(&mut self, acc: i128) -> Result<(), ContractError> {
        self.reward_debt = rewards::accumulated(self.amount, acc)?;
        Ok(())
    }

    pub fn is_claimable(&self, now: u64) -> bool {
        now >= self.claimable_at
    }
}

pub fn load(env: &Env, pid: u32, owner: &Address) -> Position {
    env.storage()
        .persistent()
        .get(&PositionKey::Position(pid, owner.clone()))
        .unwrap_or_default()
}

/// Stores `position`, or drops the entry once it is fully zeroed.
pub fn save(env: &Env, pid: u32, owner: &Address, position: &Position) {
    let key = PositionKey::Position(pid, owner.clone());
    if *position == Position::default() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
