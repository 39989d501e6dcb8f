use soroban_sdk::contracttype;

/// A call forwarded through the meta-transaction relay. Encoded as XDR in
/// the signed `call_data`; the relayed account is the effective caller.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LpCall {
    /// `(pid, amount)`
    Deposit(u32, i128),
    /// `(pid, amount)`
    Withdraw(u32, i128),
    Claim(u32),
    EmergencyWithdraw(u32),
}
