//! # Replay protection for signed messages
//!
//! Per-signer strictly-monotonic nonces. Each signer identity maintains an
//! independent counter in persistent storage; a signed message is only
//! accepted when its nonce equals the current expected value, and on success
//! the counter is incremented.
//!
//! The increment lives in the same invocation as the call it authorises, so
//! a failing inner call rolls the counter back with it.
//!
//! ```ignore
//! let nonce = nonce::current_nonce(&env, &signer);
//! // ... verify a signature that commits to `nonce`
//! nonce::validate_and_increment_nonce(&env, &signer, nonce)?;
//! ```

use soroban_sdk::{contracttype, Env};

use crate::{signature::EvmAddress, CommonError};

// ── Storage key ──────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum NonceKey {
    Nonce(EvmAddress),
}

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Internal helpers ─────────────────────────────────────────────────────────

fn nonce_key(signer: &EvmAddress) -> NonceKey {
    NonceKey::Nonce(signer.clone())
}

fn load_nonce(env: &Env, signer: &EvmAddress) -> u64 {
    env.storage()
        .persistent()
        .get(&nonce_key(signer))
        .unwrap_or(0u64)
}

fn store_nonce(env: &Env, signer: &EvmAddress, value: u64) {
    let key = nonce_key(signer);
    env.storage().persistent().set(&key, &value);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Return the nonce the next message from `signer` must carry.
///
/// New signers always start at `0`.
pub fn current_nonce(env: &Env, signer: &EvmAddress) -> u64 {
    load_nonce(env, signer)
}

/// Validate that `provided` equals the expected nonce for `signer`, then
/// increment the stored counter.
///
/// # Errors
/// - [`CommonError::InvalidNonce`]: `provided` does not match the expected value.
/// - [`CommonError::NonceOverflow`]: the counter is already at `u64::MAX`.
pub fn validate_and_increment_nonce(
    env: &Env,
    signer: &EvmAddress,
    provided: u64,
) -> Result<(), CommonError> {
    let expected = load_nonce(env, signer);
    if provided != expected {
        return Err(CommonError::InvalidNonce);
    }
    let next = expected.checked_add(1).ok_or(CommonError::NonceOverflow)?;
    store_nonce(env, signer, next);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
