use soroban_sdk::contracttype;

/// A call forwarded through the meta-transaction relay, XDR-encoded in the
/// signed `call_data`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LockCall {
    /// `(amount, tier_index)`
    StartStake(i128, u32),
    EndStake,
    EmergencyWithdraw,
}
