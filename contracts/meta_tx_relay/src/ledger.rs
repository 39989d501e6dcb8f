//! Prepaid balances and signer bindings.

use common::EvmAddress;
use soroban_sdk::{contracttype, Address, Env};

use crate::errors::ContractError;

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum LedgerKey {
    Balance(Address),
    AccountOf(EvmAddress),
    SignerOf(Address),
}

pub fn balance(env: &Env, account: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&LedgerKey::Balance(account.clone()))
        .unwrap_or(0)
}

fn set_balance(env: &Env, account: &Address, amount: i128) {
    let key = LedgerKey::Balance(account.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn credit(env: &Env, account: &Address, amount: i128) -> Result<i128, ContractError> {
    let next = balance(env, account)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticError)?;
    set_balance(env, account, next);
    Ok(next)
}

/// Fails with `shortfall` when `account` holds less than `amount`.
pub fn debit(
    env: &Env,
    account: &Address,
    amount: i128,
    shortfall: ContractError,
) -> Result<i128, ContractError> {
    let current = balance(env, account);
    if current < amount {
        return Err(shortfall);
    }
    let next = current - amount;
    set_balance(env, account, next);
    Ok(next)
}

pub fn account_of(env: &Env, signer: &EvmAddress) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&LedgerKey::AccountOf(signer.clone()))
}

pub fn signer_of(env: &Env, account: &Address) -> Option<EvmAddress> {
    env.storage()
        .persistent()
        .get(&LedgerKey::SignerOf(account.clone()))
}

/// Binds `signer` to `account`, replacing the account's previous signer.
pub fn link(env: &Env, account: &Address, signer: &EvmAddress) -> Result<(), ContractError> {
    if let Some(bound) = account_of(env, signer) {
        if bound != *account {
            return Err(ContractError::SignerAlreadyLinked);
        }
    }
    if let Some(previous) = signer_of(env, account) {
        env.storage()
            .persistent()
            .remove(&LedgerKey::AccountOf(previous));
    }

    let forward = LedgerKey::AccountOf(signer.clone());
    let reverse = LedgerKey::SignerOf(account.clone());
    env.storage().persistent().set(&forward, account);
    env.storage().persistent().set(&reverse, signer);
    env.storage()
        .persistent()
        .extend_ttl(&forward, TTL_THRESHOLD, TTL_EXTEND_TO);
    env.storage()
        .persistent()
        .extend_ttl(&reverse, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(())
}
