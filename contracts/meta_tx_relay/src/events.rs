#![allow(deprecated)] // events().publish migration tracked separately

use common::{EvmAddress, Role};
use soroban_sdk::{symbol_short, Address, Env};

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub token: Address,
    pub trusted_forwarder: Address,
    pub gas_price: i128,
    pub relay_gas: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerLinkedEvent {
    pub account: Address,
    pub signer: EvmAddress,
    pub timestamp: u64,
}

/// Fired for deposits and withdrawals of prepaid balance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceEvent {
    pub account: Address,
    pub amount: i128,
    pub new_balance: i128,
    pub timestamp: u64,
}

/// Fired once per executed meta-transaction. `nonce` is the value the
/// signature was checked against.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetaTxExecutedEvent {
    pub signer: EvmAddress,
    pub account: Address,
    pub target: Address,
    pub relayer: Option<Address>,
    pub nonce: u64,
    pub fee: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub account: Address,
    pub role: Role,
    pub granted: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChildRegisteredEvent {
    pub factory: Address,
    pub child: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeSetEvent {
    pub gas_price: i128,
    pub relay_gas: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForwarderSetEvent {
    pub old_forwarder: Address,
    pub new_forwarder: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    token: Address,
    trusted_forwarder: Address,
    gas_price: i128,
    relay_gas: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            token,
            trusted_forwarder,
            gas_price,
            relay_gas,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_signer_linked(env: &Env, account: Address, signer: EvmAddress) {
    env.events().publish(
        (symbol_short!("LINKED"), account.clone()),
        SignerLinkedEvent {
            account,
            signer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposit(env: &Env, account: Address, amount: i128, new_balance: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), account.clone()),
        BalanceEvent {
            account,
            amount,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdraw(env: &Env, account: Address, amount: i128, new_balance: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), account.clone()),
        BalanceEvent {
            account,
            amount,
            new_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_meta_tx_executed(
    env: &Env,
    signer: EvmAddress,
    account: Address,
    target: Address,
    relayer: Option<Address>,
    nonce: u64,
    fee: i128,
) {
    env.events().publish(
        (symbol_short!("META_TX"), account.clone()),
        MetaTxExecutedEvent {
            signer,
            account,
            target,
            relayer,
            nonce,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_changed(env: &Env, account: Address, role: Role, granted: bool) {
    env.events().publish(
        (symbol_short!("ROLE"), account.clone()),
        RoleChangedEvent {
            account,
            role,
            granted,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_child_registered(env: &Env, factory: Address, child: Address) {
    env.events().publish(
        (symbol_short!("CHILD"), factory.clone()),
        ChildRegisteredEvent {
            factory,
            child,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_fee_set(env: &Env, gas_price: i128, relay_gas: i128) {
    env.events().publish(
        (symbol_short!("FEE_SET"),),
        FeeSetEvent {
            gas_price,
            relay_gas,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_forwarder_set(env: &Env, old_forwarder: Address, new_forwarder: Address) {
    env.events().publish(
        (symbol_short!("FWD_SET"),),
        ForwarderSetEvent {
            old_forwarder,
            new_forwarder,
            timestamp: env.ledger().timestamp(),
        },
    );
}
