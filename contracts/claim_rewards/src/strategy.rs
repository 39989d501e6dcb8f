//! Claim strategies.
//!
//! A strategy owns three things: the packed message the admin signs, the
//! on-chain record that rules out a second use of that message, and the
//! payout a successful claim produces. The contract drives both strategies
//! through the same limit / record / signature sequence.

use common::{math, meta_tx, EvmAddress};
use soroban_sdk::{contracttype, Address, Bytes, Env};

use crate::errors::ContractError;

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum ClaimKey {
    OneShot(Address),
    Cumulative(Address),
}

/// What a claim pays, per token.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Payout {
    pub native: i128,
    pub token: i128,
    pub extra: i128,
}

/// Reward amounts a one-shot claim pays.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardConfig {
    pub native_reward: i128,
    pub token_reward: i128,
    /// Share of `token_reward` added when the signed extra flag is set.
    pub extra_bps: u32,
}

/// One-shot record. `claimed` never returns to `false`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClaimedInfo {
    pub claimed: bool,
    pub native: i128,
    pub token: i128,
    pub extra: i128,
}

/// Cumulative request: `cursor` must equal the recipient's claimed-so-far
/// total, which then advances by `amount`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CumulativeClaim {
    pub cursor: i128,
    pub amount: i128,
}

pub trait ClaimStrategy {
    type Request;

    /// Packed bytes whose keccak256 the admin personal-signs.
    fn message(
        env: &Env,
        contract: &EvmAddress,
        recipient: &EvmAddress,
        request: &Self::Request,
    ) -> Result<Bytes, ContractError>;

    /// Rejects a request the recipient's record has already consumed.
    fn check(env: &Env, recipient: &Address, request: &Self::Request)
        -> Result<(), ContractError>;

    /// Consumes the request and returns what to pay.
    fn consume(
        env: &Env,
        recipient: &Address,
        request: &Self::Request,
        rewards: &RewardConfig,
    ) -> Result<Payout, ContractError>;
}

fn packed_prefix(env: &Env, contract: &EvmAddress, recipient: &EvmAddress) -> Bytes {
    let mut msg = Bytes::new(env);
    msg.append(&contract.clone().into());
    msg.append(&recipient.clone().into());
    msg
}

fn word(env: &Env, value: i128) -> Result<Bytes, ContractError> {
    let value = u128::try_from(value).map_err(|_| ContractError::InvalidInput)?;
    Ok(meta_tx::uint_word(env, value))
}

// ── One-shot ─────────────────────────────────────────────────────────────────

/// `contract ‖ recipient ‖ extra_flag`; one claim per recipient.
pub struct OneShot;

impl OneShot {
    pub fn info(env: &Env, recipient: &Address) -> ClaimedInfo {
        env.storage()
            .persistent()
            .get(&ClaimKey::OneShot(recipient.clone()))
            .unwrap_or_default()
    }
}

impl ClaimStrategy for OneShot {
    type Request = bool;

    fn message(
        env: &Env,
        contract: &EvmAddress,
        recipient: &EvmAddress,
        extra: &bool,
    ) -> Result<Bytes, ContractError> {
        let mut msg = packed_prefix(env, contract, recipient);
        msg.push_back(u8::from(*extra));
        Ok(msg)
    }

    fn check(env: &Env, recipient: &Address, _extra: &bool) -> Result<(), ContractError> {
        if Self::info(env, recipient).claimed {
            return Err(ContractError::AlreadyClaimed);
        }
        Ok(())
    }

    fn consume(
        env: &Env,
        recipient: &Address,
        extra: &bool,
        rewards: &RewardConfig,
    ) -> Result<Payout, ContractError> {
        let extra_amount = if *extra {
            math::apply_bps(rewards.token_reward, rewards.extra_bps)?
        } else {
            0
        };
        let info = ClaimedInfo {
            claimed: true,
            native: rewards.native_reward,
            token: rewards.token_reward,
            extra: extra_amount,
        };

        let key = ClaimKey::OneShot(recipient.clone());
        env.storage().persistent().set(&key, &info);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        Ok(Payout {
            native: info.native,
            token: info.token,
            extra: info.extra,
        })
    }
}

// ── Cumulative ───────────────────────────────────────────────────────────────

/// `contract ‖ recipient ‖ uint256 cursor ‖ uint256 amount`; pays `amount`
/// of the native token.
pub struct Cumulative;

impl Cumulative {
    pub fn claimed_reward(env: &Env, recipient: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&ClaimKey::Cumulative(recipient.clone()))
            .unwrap_or(0)
    }
}

impl ClaimStrategy for Cumulative {
    type Request = CumulativeClaim;

    fn message(
        env: &Env,
        contract: &EvmAddress,
        recipient: &EvmAddress,
        request: &CumulativeClaim,
    ) -> Result<Bytes, ContractError> {
        let mut msg = packed_prefix(env, contract, recipient);
        msg.append(&word(env, request.cursor)?);
        msg.append(&word(env, request.amount)?);
        Ok(msg)
    }

    fn check(
        env: &Env,
        recipient: &Address,
        request: &CumulativeClaim,
    ) -> Result<(), ContractError> {
        if request.amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        if request.cursor != Self::claimed_reward(env, recipient) {
            return Err(ContractError::InvalidClaimedAmount);
        }
        Ok(())
    }

    fn consume(
        env: &Env,
        recipient: &Address,
        request: &CumulativeClaim,
        _rewards: &RewardConfig,
    ) -> Result<Payout, ContractError> {
        let next = math::checked_add(request.cursor, request.amount)?;

        let key = ClaimKey::Cumulative(recipient.clone());
        env.storage().persistent().set(&key, &next);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        Ok(Payout {
            native: request.amount,
            ..Payout::default()
        })
    }
}
