use soroban_sdk::{contractclient, contracttype, Address, Bytes, Env};

/// Operations a meta-transaction can run against the relay itself.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RelayCall {
    Deposit(i128),
    Withdraw(i128),
}

/// Implemented by every contract the relay forwards to. `relay` is this
/// contract and authenticates as the direct invoker; `account` is the
/// effective caller.
#[allow(dead_code)]
#[contractclient(name = "RelayRecipientClient")]
pub trait RelayRecipient {
    fn execute_relayed(env: Env, relay: Address, account: Address, call_data: Bytes);
}
