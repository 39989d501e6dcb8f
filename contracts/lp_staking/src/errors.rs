use common::{CommonError, ErrorCategory, ErrorReason};

/// Codes below 100 mirror [`CommonError`]; pool-specific failures start at 100.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,

    NotOwner = 10,
    NotOwnerOrGovernor = 11,
    NoPendingOwner = 12,
    NotPendingOwner = 13,
    Unauthorized = 15,

    InvalidInput = 30,

    ArithmeticError = 40,
    DivisionByZero = 41,

    BelowMinimumValue = 100,
    InsufficientStake = 101,
    NoPendingReward = 102,
    RewardNotAllowedYet = 103,
    PoolExists = 104,
    PoolNotFound = 105,
    LockPeriodTooShort = 106,
    UntrustedRelay = 107,
    InvalidCallData = 108,
    PriceUnavailable = 109,
    InsufficientReward = 110,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::NotOwner => ContractError::NotOwner,
            CommonError::NotOwnerOrGovernor => ContractError::NotOwnerOrGovernor,
            CommonError::NoPendingOwner => ContractError::NoPendingOwner,
            CommonError::NotPendingOwner => ContractError::NotPendingOwner,
            CommonError::MissingRole
            | CommonError::InvalidSignature
            | CommonError::SignerMismatch
            | CommonError::InvalidNonce => ContractError::Unauthorized,
            CommonError::InvalidInput => ContractError::InvalidInput,
            CommonError::NonceOverflow | CommonError::ArithmeticError => {
                ContractError::ArithmeticError
            }
            CommonError::DivisionByZero => ContractError::DivisionByZero,
        }
    }
}

impl ErrorReason for ContractError {
    fn reason(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Not initialized",
            ContractError::AlreadyInitialized => "Already initialized",
            ContractError::NotOwner => "Ownable: caller is not the owner",
            ContractError::NotOwnerOrGovernor => "The caller should be owner or governor",
            ContractError::NoPendingOwner => "No pending owner",
            ContractError::NotPendingOwner => "Caller is not the pending owner",
            ContractError::Unauthorized => "Unauthorized",
            ContractError::InvalidInput => "Invalid input",
            ContractError::ArithmeticError => "Arithmetic overflow",
            ContractError::DivisionByZero => "Division by zero",
            ContractError::BelowMinimumValue => {
                "The worth of LP amount should greater than minimum value"
            }
            ContractError::InsufficientStake => "Not enough LP token balance",
            ContractError::NoPendingReward => "No pending ZONE to reward",
            ContractError::RewardNotAllowedYet => {
                "The reward not allowed yet. please wait for more"
            }
            ContractError::PoolExists => "Pool already exists",
            ContractError::PoolNotFound => "Pool does not exist",
            ContractError::LockPeriodTooShort => "lockDay should be equal or greater than 30 day",
            ContractError::UntrustedRelay => "Caller is not the trusted relay",
            ContractError::InvalidCallData => "Invalid call data",
            ContractError::PriceUnavailable => "Price unavailable",
            ContractError::InsufficientReward => "Not enough reward in the treasury",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            ContractError::NotOwner
            | ContractError::NotOwnerOrGovernor
            | ContractError::NoPendingOwner
            | ContractError::NotPendingOwner
            | ContractError::Unauthorized
            | ContractError::UntrustedRelay => ErrorCategory::Authorization,
            ContractError::InvalidInput
            | ContractError::BelowMinimumValue
            | ContractError::InsufficientStake
            | ContractError::NoPendingReward
            | ContractError::RewardNotAllowedYet
            | ContractError::PoolExists
            | ContractError::PoolNotFound
            | ContractError::LockPeriodTooShort
            | ContractError::InvalidCallData
            | ContractError::PriceUnavailable => ErrorCategory::Precondition,
            ContractError::InsufficientReward => ErrorCategory::Capacity,
            ContractError::ArithmeticError | ContractError::DivisionByZero => {
                ErrorCategory::Arithmetic
            }
        }
    }
}
