//! Checked integer helpers for reward accounting.
//!
//! Every step truncates toward zero; callers rely on that so rounding dust
//! stays in the treasury instead of being paid out.

use crate::CommonError;

pub const BPS_DENOMINATOR: i128 = 10_000;

/// `a * b / denominator` with overflow and zero-denominator checks.
pub fn mul_div(a: i128, b: i128, denominator: i128) -> Result<i128, CommonError> {
    if denominator == 0 {
        return Err(CommonError::DivisionByZero);
    }
    a.checked_mul(b)
        .ok_or(CommonError::ArithmeticError)?
        .checked_div(denominator)
        .ok_or(CommonError::ArithmeticError)
}

/// `amount * bps / 10_000`.
pub fn apply_bps(amount: i128, bps: u32) -> Result<i128, CommonError> {
    mul_div(amount, bps as i128, BPS_DENOMINATOR)
}

pub fn checked_add(a: i128, b: i128) -> Result<i128, CommonError> {
    a.checked_add(b).ok_or(CommonError::ArithmeticError)
}

pub fn checked_sub(a: i128, b: i128) -> Result<i128, CommonError> {
    a.checked_sub(b).ok_or(CommonError::ArithmeticError)
}
