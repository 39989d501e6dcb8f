use soroban_sdk::{contracttype, Address, Env};

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum StakeKey {
    Stake(Address),
}

/// An owner's single lock position.
///
/// `exists` is true while the stake is open. Ending it keeps the record as a
/// receipt (`unstaked_at`, `reward_amount`) until the next `start_stake`
/// overwrites it.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LockedStake {
    pub exists: bool,
    pub tier_index: u32,
    pub staked_at: u64,
    pub unstaked_at: u64,
    pub amount: i128,
    pub reward_amount: i128,
}

impl LockedStake {
    pub fn has_ended(&self) -> bool {
        !self.exists && self.unstaked_at != 0
    }
}

pub fn load(env: &Env, owner: &Address) -> LockedStake {
    env.storage()
        .persistent()
        .get(&StakeKey::Stake(owner.clone()))
        .unwrap_or_default()
}

pub fn save(env: &Env, owner: &Address, stake: &LockedStake) {
    let key = StakeKey::Stake(owner.clone());
    env.storage().persistent().set(&key, stake);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
