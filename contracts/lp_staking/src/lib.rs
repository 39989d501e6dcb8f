#![no_std]

//! Multi-pool yield farming.
//!
//! A fixed reward stream (`reward_per_minute`) is split across pools by
//! weight. Each pool keeps a monotonically increasing reward-per-share index;
//! every mutating call settles the pool to the current ledger time before it
//! touches a position, so all stakers are paid against the same snapshot.
//!
//! Reward is only paid once a position has been held for `lock_period`
//! seconds since its last deposit or withdrawal. Until then it is carried in
//! the position and stays owed.

pub mod errors;
pub mod events;
pub mod nft_reward;
pub mod oracle;
pub mod pool;
pub mod position;
pub mod relay;
pub mod rewards;

use common::access;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, xdr::FromXdr, Address, Bytes, Env,
    Symbol, Vec,
};

pub use errors::ContractError;
pub use nft_reward::NftReward;
pub use pool::Pool;
pub use position::Position;
pub use relay::LpCall;

use pool::Emission;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const PRICE_ORACLE: Symbol = symbol_short!("ORACLE");
const REWARD_RATE: Symbol = symbol_short!("RWD_RATE");
const MIN_VALUE: Symbol = symbol_short!("MIN_VAL");
const LOCK_PERIOD: Symbol = symbol_short!("LOCK_PER");
const START_TIME: Symbol = symbol_short!("START");
const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGT");
const TOKEN_REWARD_ON: Symbol = symbol_short!("TOK_ON");
const NFT_REWARD_ON: Symbol = symbol_short!("NFT_ON");
const FINISHED_BASE: Symbol = symbol_short!("FIN_BASE");
const FINISHED_AT: Symbol = symbol_short!("FIN_TIME");
const TRUSTED_RELAY: Symbol = symbol_short!("RELAY");
const RESERVE: Symbol = symbol_short!("RESERVE");

/// Shortest holding period that can be configured.
pub const MIN_LOCK_PERIOD: u64 = 30 * 86_400;

// ── Public-facing types ──────────────────────────────────────────────────────

/// Snapshot returned by `get_stake_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeInfo {
    pub staked_amount: i128,
    /// Seconds until the reward can be paid; `0` once claimable.
    pub claim_in: u64,
    pub reward_amount: i128,
    /// NFT the current reward would buy, if reward-in-kind is on.
    pub reward_nft: Option<NftReward>,
}

/// How a pending reward is going to be paid.
#[derive(Clone, Debug, Default)]
struct RewardPlan {
    nft: Option<NftReward>,
    nft_cost: i128,
    tokens: i128,
    carried: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct LpStakingContract;

#[contractimpl]
impl LpStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_token`      – SAC address of the token paid as reward.
    /// * `price_oracle`      – prices assets in the reference currency.
    /// * `reward_per_minute` – emission shared by all pools.
    /// * `min_deposit_value` – smallest deposit, in reference currency.
    /// * `lock_period`       – holding period in seconds (at least 30 days).
    /// * `start_time`        – emission start; clamped to the current time.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        reward_token: Address,
        price_oracle: Address,
        reward_per_minute: i128,
        min_deposit_value: i128,
        lock_period: u64,
        start_time: u64,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_minute < 0 || min_deposit_value < 0 {
            return Err(ContractError::InvalidInput);
        }
        if lock_period < MIN_LOCK_PERIOD {
            return Err(ContractError::LockPeriodTooShort);
        }

        let start = start_time.max(env.ledger().timestamp());

        access::init_owner(&env, &owner);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&PRICE_ORACLE, &price_oracle);
        env.storage().instance().set(&REWARD_RATE, &reward_per_minute);
        env.storage().instance().set(&MIN_VALUE, &min_deposit_value);
        env.storage().instance().set(&LOCK_PERIOD, &lock_period);
        env.storage().instance().set(&START_TIME, &start);
        env.storage().instance().set(&TOKEN_REWARD_ON, &true);
        env.storage().instance().set(&NFT_REWARD_ON, &true);
        env.storage().instance().set(&FINISHED_BASE, &0i128);
        env.storage().instance().set(&FINISHED_AT, &start);

        events::publish_initialized(
            &env,
            owner,
            reward_token,
            price_oracle,
            reward_per_minute,
            lock_period,
            start,
        );

        Ok(())
    }

    // ── Pools ───────────────────────────────────────────────────────────────

    /// Register a pool for `asset`. Owner only; one pool per asset.
    pub fn add_pool(
        env: Env,
        caller: Address,
        asset: Address,
        weight: u32,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        if with_update {
            Self::mass_update(&env)?;
        }

        let start: u64 = env.storage().instance().get(&START_TIME).unwrap_or(0);
        let last_reward_time = env.ledger().timestamp().max(start);
        let added = pool::push(&env, &asset, weight, last_reward_time)?;

        let total_weight = Self::total_weight(&env)
            .checked_add(weight)
            .ok_or(ContractError::ArithmeticError)?;
        env.storage().instance().set(&TOTAL_WEIGHT, &total_weight);

        events::publish_pool_added(&env, added.pid, asset, weight, total_weight);

        Ok(added.pid)
    }

    /// Change a pool's share of the emission. The pool is settled at its old
    /// weight first.
    pub fn set_pool_weight(
        env: Env,
        caller: Address,
        pid: u32,
        weight: u32,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;

        if with_update {
            Self::mass_update(&env)?;
        }
        let mut p = Self::settle_pool(&env, pid)?;

        let old_weight = p.weight;
        let total_weight = Self::total_weight(&env)
            .checked_sub(old_weight)
            .and_then(|w| w.checked_add(weight))
            .ok_or(ContractError::ArithmeticError)?;
        p.weight = weight;
        pool::save(&env, &p);
        env.storage().instance().set(&TOTAL_WEIGHT, &total_weight);

        events::publish_pool_weight_set(&env, pid, old_weight, weight, total_weight);

        Ok(())
    }

    /// Settle one pool to the current time.
    pub fn update_pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        Self::require_initialized(&env)?;
        let p = Self::settle_pool(&env, pid)?;
        events::publish_pool_updated(&env, pid, p.acc_reward_per_share, p.total_staked);
        Ok(p)
    }

    /// Settle every pool to the current time.
    pub fn mass_update_pools(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::mass_update(&env)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` of the pool's asset. The contract pulls the tokens
    /// through its allowance from `owner`.
    pub fn deposit(env: Env, owner: Address, pid: u32, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_deposit(&env, &owner, pid, amount)
    }

    /// Unstake `amount`. Returns the reward tokens paid.
    pub fn withdraw(
        env: Env,
        owner: Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_withdraw(&env, &owner, pid, amount)
    }

    /// Collect the pending reward without touching the stake. Returns the
    /// reward tokens paid.
    pub fn claim(env: Env, owner: Address, pid: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_claim(&env, &owner, pid)
    }

    /// Return the whole stake and drop every unpaid reward. The pool is not
    /// settled.
    pub fn emergency_withdraw(env: Env, owner: Address, pid: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        owner.require_auth();
        Self::do_emergency_withdraw(&env, &owner, pid)
    }

    /// Entry point for calls forwarded by the trusted relay on behalf of
    /// `account`. `call_data` is an XDR-encoded [`LpCall`].
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

        let call = LpCall::from_xdr(&env, &call_data).map_err(|_| ContractError::InvalidCallData)?;
        match call {
            LpCall::Deposit(pid, amount) => Self::do_deposit(&env, &account, pid, amount),
            LpCall::Withdraw(pid, amount) => {
                Self::do_withdraw(&env, &account, pid, amount).map(|_| ())
            }
            LpCall::Claim(pid) => Self::do_claim(&env, &account, pid).map(|_| ()),
            LpCall::EmergencyWithdraw(pid) => {
                Self::do_emergency_withdraw(&env, &account, pid).map(|_| ())
            }
        }
    }

    // ── Treasury ────────────────────────────────────────────────────────────

    /// Pull `amount` reward tokens from `from` into the reward reserve.
    /// Reward tokens are paid from this reserve only, so a pool staking the
    /// reward token never pays out of its own principal.
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

        token::Client::new(&env, &Self::reward_token(&env)?).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        events::publish_funded(&env, from, amount, reserve);
        Ok(())
    }

    /// Stop emission. The reward reserve is swept to the owner only once
    /// nothing is staked in any pool; until then this only freezes the rate
    /// and can be called again later. Returns the amount swept.
    pub fn finish(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;

        Self::mass_update(&env)?;
        let finished = Self::rebase_finished(&env)?;
        env.storage().instance().set(&REWARD_RATE, &0i128);

        let mut all_empty = true;
        for pid in 0..pool::count(&env) {
            if pool::load(&env, pid)?.total_staked != 0 {
                all_empty = false;
                break;
            }
        }

        let mut swept = 0i128;
        if all_empty {
            swept = Self::reserve(&env);
            if swept > 0 {
                env.storage().instance().set(&RESERVE, &0i128);
                token::Client::new(&env, &Self::reward_token(&env)?).transfer(
                    &env.current_contract_address(),
                    &access::owner(&env)?,
                    &swept,
                );
            }
        }

        events::publish_finished(&env, finished, swept);

        Ok(swept)
    }

    // ── Parameter setters (owner or governor) ───────────────────────────────

    /// Change the emission rate. Every pool is settled at the old rate first.
    pub fn set_reward_per_minute(
        env: Env,
        caller: Address,
        reward_per_minute: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        if reward_per_minute < 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::mass_update(&env)?;
        let finished = Self::rebase_finished(&env)?;
        let old_rate = Self::rate(&env);
        env.storage()
            .instance()
            .set(&REWARD_RATE, &reward_per_minute);

        events::publish_reward_rate_set(&env, old_rate, reward_per_minute, finished);
        Ok(())
    }

    /// Holding period for future deposits and withdrawals.
    pub fn set_lock_period(env: Env, caller: Address, lock_period: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        if lock_period < MIN_LOCK_PERIOD {
            return Err(ContractError::LockPeriodTooShort);
        }
        env.storage().instance().set(&LOCK_PERIOD, &lock_period);
        events::publish_lock_period_set(&env, lock_period);
        Ok(())
    }

    pub fn set_min_deposit_value(
        env: Env,
        caller: Address,
        min_deposit_value: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        if min_deposit_value < 0 {
            return Err(ContractError::InvalidInput);
        }
        env.storage().instance().set(&MIN_VALUE, &min_deposit_value);
        events::publish_min_deposit_set(&env, min_deposit_value);
        Ok(())
    }

    pub fn enable_reward_in_token(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        env.storage().instance().set(&TOKEN_REWARD_ON, &enabled);
        events::publish_reward_mode_set(&env, enabled, Self::nft_reward_on(&env));
        Ok(())
    }

    pub fn enable_reward_in_nft(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner_or_governor(&env, &caller)?;
        env.storage().instance().set(&NFT_REWARD_ON, &enabled);
        events::publish_reward_mode_set(&env, Self::token_reward_on(&env), enabled);
        Ok(())
    }

    // ── Structural setters (owner only) ─────────────────────────────────────

    /// Replace the reward-in-kind table.
    pub fn set_reward_nfts(
        env: Env,
        caller: Address,
        rows: Vec<NftReward>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        for row in rows.iter() {
            if row.price <= 0 {
                return Err(ContractError::InvalidInput);
            }
        }
        nft_reward::set_table(&env, &rows);
        events::publish_reward_nfts_set(&env, rows.len());
        Ok(())
    }

    pub fn set_price_oracle(
        env: Env,
        caller: Address,
        price_oracle: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        env.storage().instance().set(&PRICE_ORACLE, &price_oracle);
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

    pub fn get_pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        pool::load(&env, pid)
    }

    pub fn get_pool_by_asset(env: Env, asset: Address) -> Result<Pool, ContractError> {
        let pid = pool::pid_of(&env, &asset).ok_or(ContractError::PoolNotFound)?;
        pool::load(&env, pid)
    }

    pub fn pool_length(env: Env) -> u32 {
        pool::count(&env)
    }

    pub fn total_pool_weight(env: Env) -> u32 {
        Self::total_weight(&env)
    }

    pub fn get_position(env: Env, pid: u32, owner: Address) -> Position {
        position::load(&env, pid, &owner)
    }

    /// Reward owed to `owner` in `pid` if the pool were settled now.
    pub fn pending_reward(env: Env, pid: u32, owner: Address) -> Result<i128, ContractError> {
        let p = Self::settled_view(&env, pid)?;
        position::load(&env, pid, &owner).pending(p.acc_reward_per_share)
    }

    pub fn get_stake_info(env: Env, pid: u32, owner: Address) -> Result<StakeInfo, ContractError> {
        let p = Self::settled_view(&env, pid)?;
        let pos = position::load(&env, pid, &owner);
        let reward_amount = pos.pending(p.acc_reward_per_share)?;
        let reward_nft = if reward_amount > 0 {
            Self::plan_reward(&env, reward_amount)?.nft
        } else {
            None
        };

        Ok(StakeInfo {
            staked_amount: pos.amount,
            claim_in: pos.claimable_at.saturating_sub(env.ledger().timestamp()),
            reward_amount,
            reward_nft,
        })
    }

    /// Smallest deposit accepted into `pid`, in units of its asset.
    pub fn min_deposit_amount(env: Env, pid: u32) -> Result<i128, ContractError> {
        let p = pool::load(&env, pid)?;
        Self::min_deposit_for(&env, &p.asset)
    }

    /// Everything emitted since `start_time`, across rate changes.
    pub fn total_finished_reward(env: Env) -> Result<i128, ContractError> {
        Self::finished_now(&env)
    }

    /// Funded reward tokens not yet paid out.
    pub fn reward_reserve(env: Env) -> i128 {
        Self::reserve(&env)
    }

    pub fn reward_per_minute(env: Env) -> i128 {
        Self::rate(&env)
    }

    pub fn lock_period(env: Env) -> u64 {
        env.storage().instance().get(&LOCK_PERIOD).unwrap_or(0)
    }

    pub fn min_deposit_value(env: Env) -> i128 {
        env.storage().instance().get(&MIN_VALUE).unwrap_or(0)
    }

    pub fn start_time(env: Env) -> u64 {
        env.storage().instance().get(&START_TIME).unwrap_or(0)
    }

    pub fn reward_in_token_enabled(env: Env) -> bool {
        Self::token_reward_on(&env)
    }

    pub fn reward_in_nft_enabled(env: Env) -> bool {
        Self::nft_reward_on(&env)
    }

    pub fn reward_nfts(env: Env) -> Vec<NftReward> {
        nft_reward::table(&env)
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

    fn do_deposit(env: &Env, owner: &Address, pid: u32, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut p = Self::settle_pool(env, pid)?;
        if amount < Self::min_deposit_for(env, &p.asset)? {
            return Err(ContractError::BelowMinimumValue);
        }

        let now = env.ledger().timestamp();
        let acc = p.acc_reward_per_share;
        let mut pos = position::load(env, pid, owner);
        let plan = Self::harvest(env, &mut pos, acc, now)?;

        pos.amount = pos
            .amount
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticError)?;
        p.total_staked = p
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticError)?;
        pos.rebase(acc)?;
        pos.claimable_at = now.saturating_add(Self::lock(env));

        pool::save(env, &p);
        position::save(env, pid, owner, &pos);

        let this = env.current_contract_address();
        token::Client::new(env, &p.asset).transfer_from(&this, owner, &this, &amount);
        Self::pay(env, owner, &plan)?;

        events::publish_deposit(
            env,
            events::DepositEvent {
                pid,
                owner: owner.clone(),
                amount,
                new_position: pos.amount,
                new_total_staked: p.total_staked,
                acc_reward_per_share: acc,
                reward_paid: plan.tokens,
                carried_reward: pos.carried_reward,
                timestamp: now,
            },
        );
        Ok(())
    }

    fn do_withdraw(
        env: &Env,
        owner: &Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let mut pos = position::load(env, pid, owner);
        if amount > pos.amount {
            return Err(ContractError::InsufficientStake);
        }

        let mut p = Self::settle_pool(env, pid)?;
        let now = env.ledger().timestamp();
        let acc = p.acc_reward_per_share;
        let plan = Self::harvest(env, &mut pos, acc, now)?;

        pos.amount -= amount;
        p.total_staked = p
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticError)?;

        // Closing while locked forfeits what was carried; once claimable it
        // stays owed on the emptied position.
        let mut forfeited = 0i128;
        if pos.amount == 0 {
            if !pos.is_claimable(now) {
                forfeited = pos.carried_reward;
                pos.carried_reward = 0;
            }
            if pos.carried_reward == 0 {
                pos = Position::default();
            } else {
                pos.rebase(acc)?;
            }
        } else {
            pos.rebase(acc)?;
            pos.claimable_at = now.saturating_add(Self::lock(env));
        }

        pool::save(env, &p);
        position::save(env, pid, owner, &pos);

        token::Client::new(env, &p.asset).transfer(&env.current_contract_address(), owner, &amount);
        Self::pay(env, owner, &plan)?;

        events::publish_withdraw(
            env,
            events::WithdrawEvent {
                pid,
                owner: owner.clone(),
                amount,
                new_position: pos.amount,
                new_total_staked: p.total_staked,
                acc_reward_per_share: acc,
                reward_paid: plan.tokens,
                carried_reward: pos.carried_reward,
                forfeited,
                timestamp: now,
            },
        );
        Ok(plan.tokens)
    }

    fn do_claim(env: &Env, owner: &Address, pid: u32) -> Result<i128, ContractError> {
        let p = Self::settle_pool(env, pid)?;
        let now = env.ledger().timestamp();
        let acc = p.acc_reward_per_share;
        let mut pos = position::load(env, pid, owner);

        let pending = pos.pending(acc)?;
        if pending <= 0 {
            return Err(ContractError::NoPendingReward);
        }
        if !pos.is_claimable(now) {
            return Err(ContractError::RewardNotAllowedYet);
        }

        let plan = Self::plan_reward(env, pending)?;
        if plan.tokens > Self::reserve(env) {
            return Err(ContractError::InsufficientReward);
        }
        pos.carried_reward = plan.carried;
        pos.rebase(acc)?;
        if pos.amount == 0 && pos.carried_reward == 0 {
            pos = Position::default();
        }
        position::save(env, pid, owner, &pos);

        Self::pay(env, owner, &plan)?;

        events::publish_claim(env, pid, owner.clone(), plan.tokens, plan.carried, acc);
        Ok(plan.tokens)
    }

    fn do_emergency_withdraw(env: &Env, owner: &Address, pid: u32) -> Result<i128, ContractError> {
        let mut p = pool::load(env, pid)?;
        let pos = position::load(env, pid, owner);
        let amount = pos.amount;
        if amount <= 0 {
            return Err(ContractError::InsufficientStake);
        }

        p.total_staked = p
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticError)?;
        pool::save(env, &p);
        position::save(env, pid, owner, &Position::default());

        token::Client::new(env, &p.asset).transfer(&env.current_contract_address(), owner, &amount);

        events::publish_emergency_withdraw(env, pid, owner.clone(), amount, p.total_staked);
        Ok(amount)
    }

    // ── Internal: reward settlement ─────────────────────────────────────────

    /// Decides what happens to everything `pos` has earned. Reward that
    /// cannot be paid yet is moved into `carried_reward`.
    fn harvest(
        env: &Env,
        pos: &mut Position,
        acc: i128,
        now: u64,
    ) -> Result<RewardPlan, ContractError> {
        let pending = pos.pending(acc)?;
        if pending > 0 && pos.is_claimable(now) {
            let mut plan = Self::plan_reward(env, pending)?;
            Self::cover(env, &mut plan)?;
            pos.carried_reward = plan.carried;
            return Ok(plan);
        }
        pos.carried_reward = pending;
        Ok(RewardPlan::default())
    }

    /// Splits `pending` into an NFT (largest affordable table entry), reward
    /// tokens, and whatever must stay carried because token payout is off.
    fn plan_reward(env: &Env, pending: i128) -> Result<RewardPlan, ContractError> {
        let mut plan = RewardPlan::default();
        let mut remaining = pending;

        if Self::nft_reward_on(env) {
            let rows = nft_reward::table(env);
            if !rows.is_empty() {
                let price = oracle::price_of(env, &Self::oracle(env)?, &Self::reward_token(env)?)?;
                let value = oracle::value_of(remaining, price)?;
                if let Some(row) = nft_reward::select(&rows, value) {
                    let cost = oracle::amount_for(row.price, price)?.min(remaining);
                    remaining -= cost;
                    plan.nft_cost = cost;
                    plan.nft = Some(row);
                }
            }
        }

        if Self::token_reward_on(env) {
            plan.tokens = remaining;
        } else {
            plan.carried = remaining;
        }
        Ok(plan)
    }

    /// Caps the token payout at the reward reserve. The uncovered part stays
    /// carried, so deposits and withdrawals never wait on funding.
    fn cover(env: &Env, plan: &mut RewardPlan) -> Result<(), ContractError> {
        let reserve = Self::reserve(env);
        if plan.tokens > reserve {
            plan.carried = plan
                .carried
                .checked_add(plan.tokens - reserve)
                .ok_or(ContractError::ArithmeticError)?;
            plan.tokens = reserve;
        }
        Ok(())
    }

    /// Executes a plan. Callers store their state before calling this.
    fn pay(env: &Env, owner: &Address, plan: &RewardPlan) -> Result<(), ContractError> {
        let this = env.current_contract_address();
        if let Some(row) = &plan.nft {
            let token_id =
                nft_reward::RewardNftClient::new(env, &row.nft).mint(&this, owner, &row.model);
            events::publish_nft_rewarded(
                env,
                owner.clone(),
                row.nft.clone(),
                row.model,
                token_id,
                plan.nft_cost,
            );
        }
        if plan.tokens > 0 {
            let reserve = Self::reserve(env)
                .checked_sub(plan.tokens)
                .filter(|r| *r >= 0)
                .ok_or(ContractError::InsufficientReward)?;
            env.storage().instance().set(&RESERVE, &reserve);
            token::Client::new(env, &Self::reward_token(env)?).transfer(&this, owner, &plan.tokens);
        }
        Ok(())
    }

    // ── Internal: pools ─────────────────────────────────────────────────────

    fn emission(env: &Env) -> Emission {
        Emission {
            reward_per_minute: Self::rate(env),
            total_weight: Self::total_weight(env),
        }
    }

    fn settle_pool(env: &Env, pid: u32) -> Result<Pool, ContractError> {
        let mut p = pool::load(env, pid)?;
        p.settle(env.ledger().timestamp(), Self::emission(env))?;
        pool::save(env, &p);
        Ok(p)
    }

    /// The pool as it would look after settling now, without storing it.
    fn settled_view(env: &Env, pid: u32) -> Result<Pool, ContractError> {
        let mut p = pool::load(env, pid)?;
        p.settle(env.ledger().timestamp(), Self::emission(env))?;
        Ok(p)
    }

    fn mass_update(env: &Env) -> Result<(), ContractError> {
        for pid in 0..pool::count(env) {
            Self::settle_pool(env, pid)?;
        }
        Ok(())
    }

    fn min_deposit_for(env: &Env, asset: &Address) -> Result<i128, ContractError> {
        let min_value: i128 = env.storage().instance().get(&MIN_VALUE).unwrap_or(0);
        if min_value == 0 {
            return Ok(0);
        }
        let price = oracle::price_of(env, &Self::oracle(env)?, asset)?;
        oracle::amount_for(min_value, price)
    }

    // ── Internal: emission bookkeeping ──────────────────────────────────────

    fn finished_now(env: &Env) -> Result<i128, ContractError> {
        let base: i128 = env.storage().instance().get(&FINISHED_BASE).unwrap_or(0);
        let since: u64 = env.storage().instance().get(&FINISHED_AT).unwrap_or(0);
        let minutes = rewards::elapsed_minutes(since, env.ledger().timestamp());
        let emitted = (minutes as i128)
            .checked_mul(Self::rate(env))
            .ok_or(ContractError::ArithmeticError)?;
        base.checked_add(emitted)
            .ok_or(ContractError::ArithmeticError)
    }

    /// Folds emission so far into the base before the rate changes.
    fn rebase_finished(env: &Env) -> Result<i128, ContractError> {
        let finished = Self::finished_now(env)?;
        let since: u64 = env.storage().instance().get(&FINISHED_AT).unwrap_or(0);
        let now = env.ledger().timestamp().max(since);
        env.storage().instance().set(&FINISHED_BASE, &finished);
        env.storage().instance().set(&FINISHED_AT, &now);
        Ok(finished)
    }

    // ── Internal: config reads ──────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn oracle(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&PRICE_ORACLE)
            .ok_or(ContractError::NotInitialized)
    }

    fn reserve(env: &Env) -> i128 {
        env.storage().instance().get(&RESERVE).unwrap_or(0)
    }

    fn rate(env: &Env) -> i128 {
        env.storage().instance().get(&REWARD_RATE).unwrap_or(0)
    }

    fn lock(env: &Env) -> u64 {
        env.storage().instance().get(&LOCK_PERIOD).unwrap_or(0)
    }

    fn total_weight(env: &Env) -> u32 {
        env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
    }

    fn token_reward_on(env: &Env) -> bool {
        env.storage().instance().get(&TOKEN_REWARD_ON).unwrap_or(true)
    }

    fn nft_reward_on(env: &Env) -> bool {
        env.storage().instance().get(&NFT_REWARD_ON).unwrap_or(true)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_relay;

#[cfg(test)]
mod test_reentrancy;
