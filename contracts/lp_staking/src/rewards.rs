//! Pure reward-index arithmetic. Nothing here touches storage.
//!
//! The per-share index is scaled by [`ACC_PRECISION`]; every division
//! truncates, so dust accumulates in the treasury rather than in a payout.

use common::{math, CommonError};

/// Fixed-point scale of `acc_reward_per_share`.
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

pub const SECONDS_PER_MINUTE: u64 = 60;

/// Whole minutes between `from` and `to`; zero when `to <= from`.
pub fn elapsed_minutes(from: u64, to: u64) -> u64 {
    to.saturating_sub(from) / SECONDS_PER_MINUTE
}

/// Emission a pool earns over `minutes`: `minutes * rate * weight / total_weight`.
pub fn pool_emission(
    minutes: u64,
    reward_per_minute: i128,
    weight: u32,
    total_weight: u32,
) -> Result<i128, CommonError> {
    if total_weight == 0 || weight == 0 {
        return Ok(0);
    }
    let gross = (minutes as i128)
        .checked_mul(reward_per_minute)
        .ok_or(CommonError::ArithmeticError)?;
    math::mul_div(gross, weight as i128, total_weight as i128)
}

/// New index after distributing `reward` over `total_staked` shares.
pub fn accrue_index(acc: i128, reward: i128, total_staked: i128) -> Result<i128, CommonError> {
    let delta = math::mul_div(reward, ACC_PRECISION, total_staked)?;
    math::checked_add(acc, delta)
}

/// `amount * acc / ACC_PRECISION`, the reward `amount` shares have earned
/// since the pool started.
pub fn accumulated(amount: i128, acc: i128) -> Result<i128, CommonError> {
    math::mul_div(amount, acc, ACC_PRECISION)
}

/// Reward earned since the last snapshot. Never negative for a debt taken
/// at an index no greater than `acc`.
pub fn pending(amount: i128, acc: i128, reward_debt: i128) -> Result<i128, CommonError> {
    math::checked_sub(accumulated(amount, acc)?, reward_debt)
}
