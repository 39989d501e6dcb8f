#![no_std]

//! Tiered lock staking.
//!
//! Each owner holds at most one open stake, bound for its lifetime to a tier
//! of the reward table. The principal is locked for the tier's duration; the
//! reward is fixed by the tier's terms and paid when the stake is ended, as
//! long as the tier is still enabled at that point.

pub mod errors;
pub mod events;
pub mod relay;
pub mod stake;
pub mod tier;

use common::access;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, xdr::FromXdr, Address, Bytes, Env,
    Symbol, Vec,
};

pub use errors::ContractError;
pub use relay::LockCall;
pub use stake::LockedStake;
pub use tier::{RewardBasis, StakeTier, TierTerms};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const TOKEN: Symbol = symbol_short!("TOKEN");
const VAULT: Symbol = symbol_short!("VAULT");
const STAKE_LIMIT: Symbol = symbol_short!("STK_LIM");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const STAKING_WINDOW: Symbol = symbol_short!("WINDOW");
const LAUNCHED_AT: Symbol = symbol_short!("LAUNCHED");
const EARLY_UNSTAKE: Symbol = symbol_short!("EARLY");
const FINISHED: Symbol = symbol_short!("FINISHED");
const TRUSTED_RELAY: Symbol = symbol_short!("RELAY");
const RESERVE: Symbol = symbol_short!("RESERVE");

// ── Public-facing types ──────────────────────────────────────────────────────

/// Snapshot returned by `get_stake_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeInfo {
    pub amount: i128,
    pub tier_index: u32,
    /// Seconds held so far, or in total once ended.
    pub staked_period: u64,
    /// Reward if ended now, or the reward paid once ended.
    pub reward: i128,
    pub ended: bool,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct LockStakingContract;

#[contractimpl]
impl LockStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `token`          – SAC address staked and paid as reward.
    /// * `staking_window` – seconds after launch during which new stakes are
    ///                      accepted; `0` keeps staking open.
    /// * `stake_limit`    – ceiling on total principal; `0` means no ceiling.
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        staking_window: u64,
        stake_limit: i128,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_limit < 0 {
            return Err(ContractError::InvalidInput);
        }

        access::init_owner(&env, &owner);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&TOKEN, &token);
        env.storage().instance().set(&STAKING_WINDOW, &staking_window);
        env.storage().instance().set(&STAKE_LIMIT, &stake_limit);
        env.storage()
            .instance()
            .set(&LAUNCHED_AT, &env.ledger().timestamp());
        env.storage().instance().set(&EARLY_UNSTAKE, &false);
        env.storage().instance().set(&FINISHED, &false);

        events::publish_initialized(&env, owner, token, staking_window, stake_limit);

        Ok(())
    }

    // ── Tier table ──────────────────────────────────────────────────────────

    /// Append a tier. Owner only. Returns its index.
    pub fn add_tier(
        env: Env,
        caller: Address,
        terms: TierTerms,
        enabled: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        Self::validate_terms(&terms)?;

        let t = StakeTier::new(enabled, &terms);
        let index = tier::push(&env, &t);
        events::publish_tier_set(&env, index, t);
        Ok(index)
    }

    /// Replace a tier's terms. Open stakes in the tier are settled on the
    /// terms in force when they end.
    pub fn update_tier(
        env: Env,
        caller: Address,
        index: u32,
        terms: TierTerms,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        Self::validate_terms(&terms)?;

        let mut t = tier::load(&env, index)?;
        t.apply(&terms);
        tier::save(&env, index, &t);
        events::publish_tier_set(&env, index, t);
        Ok(())
    }

    /// Open or close a tier to new stakes. A stake ended while its tier is
    /// disabled gets its principal back without reward.
    pub fn set_tier_enabled(
        env: Env,
        caller: Address,
        index: u32,
        enabled: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;

        let mut t = tier::load(&env, index)?;
        t.enabled = enabled;
        tier::save(&env, index, &t);
        events::publish_tier_enabled(&env, index, enabled);
        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Lock `amount` in tier `tier_index`. The contract pulls the tokens
    /// through its allowance from `owner`.
    pub fn start_stake(
        env: Env,
        owner: Address,
        amount: i128,
        tier_index: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_start_stake(&env, &owner, amount, tier_index)
    }

    /// Close the stake. Returns principal plus reward paid. Fails when the
    /// reward reserve cannot cover the reward; `emergency_withdraw` still
    /// returns the principal in that case.
    pub fn end_stake(env: Env, owner: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_end_stake(&env, &owner)
    }

    /// Return the principal and drop the reward. Available once the lock is
    /// served, early unstaking is allowed, the tier is disabled or the
    /// registry is finished.
    pub fn emergency_withdraw(env: Env, owner: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_emergency_withdraw(&env, &owner)
    }

    /// Entry point for calls forwarded by the trusted relay on behalf of
    /// `account`. `call_data` is an XDR-encoded [`LockCall`].
    pub fn execute_relayed(
        env: Env,
        relay: Address,
        account: Address,
        call_data: Bytes,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let trusted: Address = env
            .storage()
            .instance()
            .get(&TRUSTED_RELAY)
            .ok_or(ContractError::UntrustedRelay)?;
        if relay != trusted {
            return Err(ContractError::UntrustedRelay);
        }
        relay.require_auth();

        let call =
            LockCall::from_xdr(&env, &call_data).map_err(|_| ContractError::InvalidCallData)?;
        match call {
            LockCall::StartStake(amount, tier_index) => {
                Self::do_start_stake(&env, &account, amount, tier_index)
            }
            LockCall::EndStake => Self::do_end_stake(&env, &account).map(|_| ()),
            LockCall::EmergencyWithdraw => {
                Self::do_emergency_withdraw(&env, &account).map(|_| ())
            }
        }
    }

    // ── Treasury ────────────────────────────────────────────────────────────

    /// Pull `amount` reward tokens from `from` into the reward reserve.
    /// Rewards without a vault are paid from this reserve only, never from
    /// locked principal.
    pub fn fund(env: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        from.require_auth();
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let reserve = Self::reserve(&env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticError)?;
        env.storage().instance().set(&RESERVE, &reserve);

        token::Client::new(&env, &Self::token_address(&env)?).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        events::publish_funded(&env, from, amount, reserve);
        Ok(())
    }

    /// Close the registry to new stakes. Open stakes keep their terms. The
    /// reward reserve is swept to the owner only once no principal is
    /// locked; until then this can be called again later. Returns the amount
    /// swept.
    pub fn finish(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        env.storage().instance().set(&FINISHED, &true);

        let total = Self::total(&env);
        let mut swept = 0i128;
        if total == 0 {
            swept = Self::reserve(&env);
            if swept > 0 {
                env.storage().instance().set(&RESERVE, &0i128);
                token::Client::new(&env, &Self::token_address(&env)?).transfer(
                    &env.current_contract_address(),
                    &access::owner(&env)?,
                    &swept,
                );
            }
        }

        events::publish_finished(&env, swept, total);
        Ok(swept)
    }

    // ── Parameter setters (owner or governor) ───────────────────────────────

    /// Restart the staking window from now.
    pub fn launch_today(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        let now = env.ledger().timestamp();
        env.storage().instance().set(&LAUNCHED_AT, &now);
        events::publish_launched(&env, now, Self::window(&env));
        Ok(())
    }

    pub fn set_staking_window(
        env: Env,
        caller: Address,
        staking_window: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        env.storage().instance().set(&STAKING_WINDOW, &staking_window);
        events::publish_staking_window_set(&env, staking_window);
        Ok(())
    }

    /// Raise or lower the principal ceiling. Lowering it below the current
    /// total only blocks new stakes.
    pub fn set_stake_limit(env: Env, caller: Address, limit: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        if limit < 0 {
            return Err(ContractError::InvalidInput);
        }
        env.storage().instance().set(&STAKE_LIMIT, &limit);
        events::publish_stake_limit_set(&env, limit);
        Ok(())
    }

    pub fn set_early_unstake_allowed(
        env: Env,
        caller: Address,
        allowed: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        env.storage().instance().set(&EARLY_UNSTAKE, &allowed);
        events::publish_early_unstake_set(&env, allowed);
        Ok(())
    }

    // ── Structural setters (owner only) ─────────────────────────────────────

    /// Rewards are pulled from `vault` (through its allowance) instead of the
    /// contract's own treasury.
    pub fn set_vault(env: Env, caller: Address, vault: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        env.storage().instance().set(&VAULT, &vault);
        events::publish_vault_set(&env, vault);
        Ok(())
    }

    pub fn set_trusted_relay(env: Env, caller: Address, relay: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        env.storage().instance().set(&TRUSTED_RELAY, &relay);
        events::publish_trusted_relay_set(&env, relay);
        Ok(())
    }

    pub fn set_governor(env: Env, caller: Address, governor: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::set_governor(&env, &caller, &governor)?;
        Ok(())
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    pub fn propose_owner(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::propose_owner(&env, &caller, &new_owner)?;
        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();
        access::accept_owner(&env, &new_owner)?;
        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::cancel_owner_transfer(&env, &caller)?;
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_stake_info(env: Env, owner: Address) -> Result<StakeInfo, ContractError> {
        let s = stake::load(&env, &owner);
        if !s.exists {
            return Ok(StakeInfo {
                amount: s.amount,
                tier_index: s.tier_index,
                staked_period: s.unstaked_at.saturating_sub(s.staked_at),
                reward: s.reward_amount,
                ended: s.has_ended(),
            });
        }

        let now = env.ledger().timestamp();
        let t = tier::load(&env, s.tier_index)?;
        let reward = if t.enabled {
            t.reward_for(s.amount, s.staked_at, now)?
        } else {
            0
        };
        Ok(StakeInfo {
            amount: s.amount,
            tier_index: s.tier_index,
            staked_period: now.saturating_sub(s.staked_at),
            reward,
            ended: false,
        })
    }

    pub fn get_stake(env: Env, owner: Address) -> LockedStake {
        stake::load(&env, &owner)
    }

    pub fn get_tier(env: Env, index: u32) -> Result<StakeTier, ContractError> {
        tier::load(&env, index)
    }

    pub fn get_tiers(env: Env) -> Vec<StakeTier> {
        tier::all(&env)
    }

    pub fn tier_count(env: Env) -> u32 {
        tier::count(&env)
    }

    pub fn total_staked(env: Env) -> i128 {
        Self::total(&env)
    }

    pub fn stake_limit(env: Env) -> i128 {
        env.storage().instance().get(&STAKE_LIMIT).unwrap_or(0)
    }

    pub fn staking_window(env: Env) -> u64 {
        Self::window(&env)
    }

    pub fn launched_at(env: Env) -> u64 {
        env.storage().instance().get(&LAUNCHED_AT).unwrap_or(0)
    }

    pub fn early_unstake_allowed(env: Env) -> bool {
        Self::early_allowed(&env)
    }

    pub fn is_finished(env: Env) -> bool {
        Self::finished(&env)
    }

    pub fn token(env: Env) -> Result<Address, ContractError> {
        Self::token_address(&env)
    }

    /// Funded reward not yet paid out.
    pub fn reward_reserve(env: Env) -> i128 {
        Self::reserve(&env)
    }

    pub fn vault(env: Env) -> Option<Address> {
        env.storage().instance().get(&VAULT)
    }

    pub fn trusted_relay(env: Env) -> Option<Address> {
        env.storage().instance().get(&TRUSTED_RELAY)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(access::owner(&env)?)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        access::pending_owner(&env)
    }

    pub fn get_governor(env: Env) -> Option<Address> {
        access::governor(&env)
    }

    // ── Internal: operations ────────────────────────────────────────────────

    fn do_start_stake(
        env: &Env,
        owner: &Address,
        amount: i128,
        tier_index: u32,
    ) -> Result<(), ContractError> {
        if stake::load(env, owner).exists {
            return Err(ContractError::AlreadyStaked);
        }
        if Self::finished(env) {
            return Err(ContractError::Finished);
        }
        let now = env.ledger().timestamp();
        let window = Self::window(env);
        if window > 0 {
            let launched: u64 = env.storage().instance().get(&LAUNCHED_AT).unwrap_or(0);
            if now > launched.saturating_add(window) {
                return Err(ContractError::StakingClosed);
            }
        }
        let mut t = tier::load(env, tier_index)?;
        if !t.enabled {
            return Err(ContractError::TierDisabled);
        }
        if amount <= 0 || amount < t.min_amount {
            return Err(ContractError::AmountTooSmall);
        }
        let total = Self::total(env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticError)?;
        let limit: i128 = env.storage().instance().get(&STAKE_LIMIT).unwrap_or(0);
        if limit > 0 && total > limit {
            return Err(ContractError::ExceedStakingLimit);
        }

        t.total_staked = t
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticError)?;
        let s = LockedStake {
            exists: true,
            tier_index,
            staked_at: now,
            unstaked_at: 0,
            amount,
            reward_amount: 0,
        };
        tier::save(env, tier_index, &t);
        stake::save(env, owner, &s);
        env.storage().instance().set(&TOTAL_STAKED, &total);

        let this = env.current_contract_address();
        token::Client::new(env, &Self::token_address(env)?).transfer_from(
            &this, owner, &this, &amount,
        );

        events::publish_stake_started(
            env,
            events::StakeStartedEvent {
                owner: owner.clone(),
                tier_index,
                amount,
                tier_total_staked: t.total_staked,
                total_staked: total,
                timestamp: now,
            },
        );
        Ok(())
    }

    fn do_end_stake(env: &Env, owner: &Address) -> Result<i128, ContractError> {
        let mut s = stake::load(env, owner);
        if !s.exists {
            return Err(ContractError::NotStaked);
        }
        let now = env.ledger().timestamp();
        let mut t = tier::load(env, s.tier_index)?;
        if !t.is_served(s.staked_at, now) && !Self::early_allowed(env) {
            return Err(ContractError::LockedStill);
        }

        let reward = if t.enabled {
            t.reward_for(s.amount, s.staked_at, now)?
        } else {
            0
        };
        let vault: Option<Address> = env.storage().instance().get(&VAULT);
        if reward > 0 && vault.is_none() {
            let reserve = Self::reserve(env);
            if reward > reserve {
                return Err(ContractError::InsufficientReward);
            }
            env.storage().instance().set(&RESERVE, &(reserve - reward));
        }
        let total = Self::release(env, &mut t, &s)?;

        let principal = s.amount;
        s.exists = false;
        s.unstaked_at = now;
        s.reward_amount = reward;
        tier::save(env, s.tier_index, &t);
        stake::save(env, owner, &s);

        let client = token::Client::new(env, &Self::token_address(env)?);
        let this = env.current_contract_address();
        client.transfer(&this, owner, &principal);
        if reward > 0 {
            match vault {
                Some(vault) => client.transfer_from(&this, &vault, owner, &reward),
                None => client.transfer(&this, owner, &reward),
            }
        }

        events::publish_stake_ended(
            env,
            events::StakeEndedEvent {
                owner: owner.clone(),
                tier_index: s.tier_index,
                amount: principal,
                reward,
                staked_period: now.saturating_sub(s.staked_at),
                tier_total_staked: t.total_staked,
                total_staked: total,
                timestamp: now,
            },
        );

        principal
            .checked_add(reward)
            .ok_or(ContractError::ArithmeticError)
    }

    fn do_emergency_withdraw(env: &Env, owner: &Address) -> Result<i128, ContractError> {
        let mut s = stake::load(env, owner);
        if !s.exists {
            return Err(ContractError::NotStaked);
        }
        let now = env.ledger().timestamp();
        let mut t = tier::load(env, s.tier_index)?;
        let released = t.is_served(s.staked_at, now)
            || Self::early_allowed(env)
            || Self::finished(env)
            || !t.enabled;
        if !released {
            return Err(ContractError::LockedStill);
        }

        let total = Self::release(env, &mut t, &s)?;
        let principal = s.amount;
        s.exists = false;
        s.unstaked_at = now;
        s.reward_amount = 0;
        tier::save(env, s.tier_index, &t);
        stake::save(env, owner, &s);

        token::Client::new(env, &Self::token_address(env)?).transfer(
            &env.current_contract_address(),
            owner,
            &principal,
        );

        events::publish_emergency_withdraw(env, owner.clone(), s.tier_index, principal, total);
        Ok(principal)
    }

    /// Takes `s.amount` out of the tier and global totals. Returns the new
    /// global total, already stored.
    fn release(env: &Env, t: &mut StakeTier, s: &LockedStake) -> Result<i128, ContractError> {
        t.total_staked = t
            .total_staked
            .checked_sub(s.amount)
            .ok_or(ContractError::ArithmeticError)?;
        let total = Self::total(env)
            .checked_sub(s.amount)
            .ok_or(ContractError::ArithmeticError)?;
        env.storage().instance().set(&TOTAL_STAKED, &total);
        Ok(total)
    }

    fn validate_terms(terms: &TierTerms) -> Result<(), ContractError> {
        if terms.min_amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    // ── Internal: config reads ──────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn token_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn reserve(env: &Env) -> i128 {
        env.storage().instance().get(&RESERVE).unwrap_or(0)
    }

    fn total(env: &Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    fn window(env: &Env) -> u64 {
        env.storage().instance().get(&STAKING_WINDOW).unwrap_or(0)
    }

    fn early_allowed(env: &Env) -> bool {
        env.storage().instance().get(&EARLY_UNSTAKE).unwrap_or(false)
    }

    fn finished(env: &Env) -> bool {
        env.storage().instance().get(&FINISHED).unwrap_or(false)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_relay;
