#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::CommonError;

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const GOVERNOR: Symbol = symbol_short!("GOVERNOR");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum AccessKey {
    Capabilities(Address),
}

// ── Roles ────────────────────────────────────────────────────────────────────

/// Capabilities an account can hold. Stored as a bit-set per account so a
/// single read answers every role question for that account.
///
/// - `AllowedContract` – may be the target of a relayed meta-transaction.
/// - `Factory`         – may register the contracts it deploys as
///                       `AllowedContract`s.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    AllowedContract = 1,
    Factory = 2,
}

impl Role {
    pub fn bit(&self) -> u32 {
        *self as u32
    }
}

// ── Owner ────────────────────────────────────────────────────────────────────

/// Records the initial owner. Only called from a contract's `initialize`.
pub fn init_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

pub fn owner(env: &Env) -> Result<Address, CommonError> {
    env.storage()
        .instance()
        .get(&OWNER)
        .ok_or(CommonError::NotInitialized)
}

pub fn pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

pub fn governor(env: &Env) -> Option<Address> {
    env.storage().instance().get(&GOVERNOR)
}

/// Guard: `caller` must be the owner.
///
/// The caller must already have been authenticated via `require_auth()`.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), CommonError> {
    if *caller != owner(env)? {
        return Err(CommonError::NotOwner);
    }
    Ok(())
}

/// Guard for parameter setters: `caller` must be the owner or the governor
/// timelock.
pub fn require_owner_or_governor(env: &Env, caller: &Address) -> Result<(), CommonError> {
    if *caller == owner(env)? {
        return Ok(());
    }
    match governor(env) {
        Some(gov) if gov == *caller => Ok(()),
        _ => Err(CommonError::NotOwnerOrGovernor),
    }
}

/// Owner-only: installs (or replaces) the governor timelock.
pub fn set_governor(env: &Env, caller: &Address, governor: &Address) -> Result<(), CommonError> {
    require_owner(env, caller)?;
    env.storage().instance().set(&GOVERNOR, governor);
    publish_governor_set(env, caller.clone(), governor.clone());
    Ok(())
}

// ── Two-step ownership transfer ──────────────────────────────────────────────

pub fn propose_owner(env: &Env, caller: &Address, new_owner: &Address) -> Result<(), CommonError> {
    require_owner(env, caller)?;
    env.storage().instance().set(&PENDING_OWNER, new_owner);
    publish_owner_transfer_proposed(env, caller.clone(), new_owner.clone());
    Ok(())
}

/// Completes the transfer. Returns the previous owner.
pub fn accept_owner(env: &Env, caller: &Address) -> Result<Address, CommonError> {
    let pending = pending_owner(env).ok_or(CommonError::NoPendingOwner)?;
    if *caller != pending {
        return Err(CommonError::NotPendingOwner);
    }
    let previous = owner(env)?;
    env.storage().instance().set(&OWNER, &pending);
    env.storage().instance().remove(&PENDING_OWNER);
    publish_owner_transfer_accepted(env, previous.clone(), pending);
    Ok(previous)
}

/// Drops the pending transfer. Returns the address that was proposed.
pub fn cancel_owner_transfer(env: &Env, caller: &Address) -> Result<Address, CommonError> {
    require_owner(env, caller)?;
    let pending = pending_owner(env).ok_or(CommonError::NoPendingOwner)?;
    env.storage().instance().remove(&PENDING_OWNER);
    publish_owner_transfer_cancelled(env, caller.clone(), pending.clone());
    Ok(pending)
}

// ── Capabilities ─────────────────────────────────────────────────────────────

fn capability_key(account: &Address) -> AccessKey {
    AccessKey::Capabilities(account.clone())
}

pub fn capabilities(env: &Env, account: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&capability_key(account))
        .unwrap_or(0)
}

fn store_capabilities(env: &Env, account: &Address, bits: u32) {
    let key = capability_key(account);
    if bits == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &bits);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn has_role(env: &Env, account: &Address, role: Role) -> bool {
    capabilities(env, account) & role.bit() != 0
}

/// Adds `role` to `account`. Returns `false` when it was already held.
pub fn grant_role(env: &Env, account: &Address, role: Role) -> bool {
    let bits = capabilities(env, account);
    if bits & role.bit() != 0 {
        return false;
    }
    store_capabilities(env, account, bits | role.bit());
    true
}

/// Removes `role` from `account`. Returns `false` when it was not held.
pub fn revoke_role(env: &Env, account: &Address, role: Role) -> bool {
    let bits = capabilities(env, account);
    if bits & role.bit() == 0 {
        return false;
    }
    store_capabilities(env, account, bits & !role.bit());
    true
}

pub fn require_role(env: &Env, account: &Address, role: Role) -> Result<(), CommonError> {
    if !has_role(env, account, role) {
        return Err(CommonError::MissingRole);
    }
    Ok(())
}

// ── Events ───────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernorSetEvent {
    pub owner: Address,
    pub governor: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

fn publish_governor_set(env: &Env, owner: Address, governor: Address) {
    env.events().publish(
        (symbol_short!("GOV_SET"), owner.clone()),
        GovernorSetEvent {
            owner,
            governor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
