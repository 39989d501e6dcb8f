#![no_std]

//! Signature-gated reward claims.
//!
//! An off-chain admin key authorises payouts by personal-signing a packed
//! message naming this contract and the recipient. Two claim shapes share
//! one admin, one claim counter and one treasury:
//!
//! - **one-shot** (`do_airdrop_by_signature`): a fixed native + token
//!   reward, at most once per recipient;
//! - **cumulative** (`claim_reward_by_signature`): the signature names the
//!   recipient's claimed-so-far total, so it is spent by its first use.
//!
//! Every claim runs limit → record → signature, in that order, and updates
//! its record before any token moves.

pub mod errors;
pub mod events;
pub mod strategy;

use common::{access, math, meta_tx, signature, EvmAddress, SignatureParts};
use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Bytes, Env, Symbol};

pub use errors::ContractError;
pub use strategy::{ClaimStrategy, ClaimedInfo, Cumulative, CumulativeClaim, OneShot, Payout, RewardConfig};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const NATIVE_TOKEN: Symbol = symbol_short!("NATIVE");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const LIMIT: Symbol = symbol_short!("LIMIT");
const CLAIMED_COUNT: Symbol = symbol_short!("CLAIMED_N");
const REWARDS: Symbol = symbol_short!("REWARDS");
const TOTAL_CLAIMED: Symbol = symbol_short!("TOT_CLAIM");

const MAX_BPS: u32 = 10_000;

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct ClaimRewardsContract;

#[contractimpl]
impl ClaimRewardsContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `admin`        – signing key that authorises claims.
    /// * `native_token` – SAC paying native and cumulative rewards.
    /// * `reward_token` – SAC paying the one-shot token reward.
    /// * `limit`        – cap on successful claims; `0` disables it.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        admin: EvmAddress,
        native_token: Address,
        reward_token: Address,
        limit: u32,
        rewards: RewardConfig,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if admin.to_array() == [0u8; 20] {
            return Err(ContractError::InvalidInput);
        }
        Self::validate_rewards(&rewards)?;

        access::init_owner(&env, &owner);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&NATIVE_TOKEN, &native_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&LIMIT, &limit);
        env.storage().instance().set(&CLAIMED_COUNT, &0u32);
        env.storage().instance().set(&REWARDS, &rewards);
        env.storage().instance().set(&TOTAL_CLAIMED, &0i128);

        events::publish_initialized(&env, owner, admin, native_token, reward_token, limit);
        Ok(())
    }

    // ── Claims ──────────────────────────────────────────────────────────────

    /// One-shot claim. `sig` is the admin's personal signature over
    /// `keccak256(contract_id ‖ recipient_id ‖ extra)`.
    pub fn do_airdrop_by_signature(
        env: Env,
        recipient: Address,
        extra: bool,
        sig: SignatureParts,
    ) -> Result<Payout, ContractError> {
        Self::require_initialized(&env)?;
        let payout = Self::authorize::<OneShot>(&env, &recipient, &extra, &sig)?;

        Self::pay(&env, &recipient, &payout)?;
        events::publish_airdrop_claimed(
            &env,
            recipient,
            extra,
            payout.native,
            payout.token,
            payout.extra,
            Self::claimed_count(env.clone()),
        );
        Ok(payout)
    }

    /// Cumulative claim. `sig` is the admin's personal signature over
    /// `keccak256(contract_id ‖ recipient_id ‖ uint256(cursor) ‖ uint256(amount))`
    /// and `cursor` must equal `claimed_reward(recipient)`.
    pub fn claim_reward_by_signature(
        env: Env,
        recipient: Address,
        cursor: i128,
        amount: i128,
        sig: SignatureParts,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let request = CumulativeClaim { cursor, amount };
        let payout = Self::authorize::<Cumulative>(&env, &recipient, &request, &sig)?;

        let total = math::checked_add(Self::total_claimed_reward(env.clone()), payout.native)?;
        env.storage().instance().set(&TOTAL_CLAIMED, &total);

        Self::pay(&env, &recipient, &payout)?;
        events::publish_reward_claimed(
            &env,
            recipient.clone(),
            cursor,
            Cumulative::claimed_reward(&env, &recipient),
            amount,
            total,
            Self::claimed_count(env.clone()),
        );
        Ok(payout.native)
    }

    // ── Admin rotation ──────────────────────────────────────────────────────

    pub fn propose_admin(
        env: Env,
        caller: Address,
        new_admin: EvmAddress,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        if new_admin.to_array() == [0u8; 20] {
            return Err(ContractError::InvalidInput);
        }

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);
        events::publish_admin_proposed(&env, Self::admin(env.clone())?, new_admin);
        Ok(())
    }

    /// Completes a rotation. `sig` is the pending key's personal signature
    /// over `keccak256(contract_id ‖ pending_admin)`.
    pub fn accept_admin(env: Env, sig: SignatureParts) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let pending: EvmAddress = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::NoPendingAdmin)?;

        let mut msg = Bytes::new(&env);
        msg.append(&Self::self_identity(&env).into());
        msg.append(&pending.clone().into());
        let digest = signature::eth_signed_message_hash(&env, &meta_tx::keccak(&env, &msg));
        if signature::recover(&env, &digest, &sig)? != pending {
            return Err(ContractError::NotPendingAdmin);
        }

        let old = Self::admin(env.clone())?;
        env.storage().instance().set(&ADMIN, &pending);
        env.storage().instance().remove(&PENDING_ADMIN);
        events::publish_admin_accepted(&env, old, pending);
        Ok(())
    }

    // ── Owner setters ───────────────────────────────────────────────────────

    pub fn set_limit(env: Env, caller: Address, limit: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let old = Self::limit(env.clone());
        env.storage().instance().set(&LIMIT, &limit);
        events::publish_limit_set(&env, old, limit);
        Ok(())
    }

    pub fn set_rewards(
        env: Env,
        caller: Address,
        rewards: RewardConfig,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        Self::validate_rewards(&rewards)?;

        env.storage().instance().set(&REWARDS, &rewards);
        events::publish_rewards_set(
            &env,
            rewards.native_reward,
            rewards.token_reward,
            rewards.extra_bps,
        );
        Ok(())
    }

    /// Sweeps both token balances to the owner.
    pub fn withdraw(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let this = env.current_contract_address();
        let native = token::Client::new(&env, &Self::native_token(env.clone())?);
        let reward = token::Client::new(&env, &Self::reward_token(env.clone())?);

        let native_balance = native.balance(&this);
        if native_balance > 0 {
            native.transfer(&this, &caller, &native_balance);
        }
        // Both roles may be served by the same asset.
        let token_balance = reward.balance(&this);
        if token_balance > 0 {
            reward.transfer(&this, &caller, &token_balance);
        }

        events::publish_withdrawn(&env, caller, native_balance, token_balance);
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

    pub fn get_claimed_info(env: Env, recipient: Address) -> ClaimedInfo {
        OneShot::info(&env, &recipient)
    }

    /// Cursor the recipient's next cumulative signature must carry.
    pub fn claimed_reward(env: Env, recipient: Address) -> i128 {
        Cumulative::claimed_reward(&env, &recipient)
    }

    pub fn total_claimed_reward(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_CLAIMED).unwrap_or(0)
    }

    pub fn claimed_count(env: Env) -> u32 {
        env.storage().instance().get(&CLAIMED_COUNT).unwrap_or(0)
    }

    pub fn limit(env: Env) -> u32 {
        env.storage().instance().get(&LIMIT).unwrap_or(0)
    }

    pub fn rewards(env: Env) -> Result<RewardConfig, ContractError> {
        env.storage()
            .instance()
            .get(&REWARDS)
            .ok_or(ContractError::NotInitialized)
    }

    /// Token bonus a one-shot claim with the extra flag adds.
    pub fn token_extra_reward(env: Env) -> Result<i128, ContractError> {
        let rewards = Self::rewards(env)?;
        Ok(math::apply_bps(rewards.token_reward, rewards.extra_bps)?)
    }

    pub fn admin(env: Env) -> Result<EvmAddress, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn pending_admin(env: Env) -> Option<EvmAddress> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    pub fn native_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&NATIVE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
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

    // ── Internal ────────────────────────────────────────────────────────────

    /// Limit, then record, then signature. Neither of the first two
    /// consumes anything, so a rejected claim can be resubmitted later.
    fn authorize<S: ClaimStrategy>(
        env: &Env,
        recipient: &Address,
        request: &S::Request,
        sig: &SignatureParts,
    ) -> Result<Payout, ContractError> {
        let count = Self::claimed_count(env.clone());
        let limit = Self::limit(env.clone());
        if limit > 0 && count >= limit {
            return Err(ContractError::ReachedLimit);
        }

        S::check(env, recipient, request)?;

        let recipient_id = signature::evm_identity(env, recipient);
        let msg = S::message(env, &Self::self_identity(env), &recipient_id, request)?;
        let digest = signature::eth_signed_message_hash(env, &meta_tx::keccak(env, &msg));
        if signature::recover(env, &digest, sig)? != Self::admin(env.clone())? {
            return Err(ContractError::NotAllowed);
        }

        let payout = S::consume(env, recipient, request, &Self::rewards(env.clone())?)?;
        let count = count.checked_add(1).ok_or(ContractError::ArithmeticError)?;
        env.storage().instance().set(&CLAIMED_COUNT, &count);
        Ok(payout)
    }

    fn pay(env: &Env, recipient: &Address, payout: &Payout) -> Result<(), ContractError> {
        let this = env.current_contract_address();
        if payout.native > 0 {
            token::Client::new(env, &Self::native_token(env.clone())?).transfer(
                &this,
                recipient,
                &payout.native,
            );
        }
        let tokens = math::checked_add(payout.token, payout.extra)?;
        if tokens > 0 {
            token::Client::new(env, &Self::reward_token(env.clone())?).transfer(
                &this, recipient, &tokens,
            );
        }
        Ok(())
    }

    fn self_identity(env: &Env) -> EvmAddress {
        signature::evm_identity(env, &env.current_contract_address())
    }

    fn validate_rewards(rewards: &RewardConfig) -> Result<(), ContractError> {
        if rewards.native_reward < 0 || rewards.token_reward < 0 || rewards.extra_bps > MAX_BPS {
            return Err(ContractError::InvalidInput);
        }
        Ok(())
    }

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_cumulative;
