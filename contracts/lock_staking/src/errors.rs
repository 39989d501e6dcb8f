use common::{CommonError, ErrorCategory, ErrorReason};

/// Codes below 100 mirror [`CommonError`]; staking failures start at 100.
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

    AlreadyStaked = 100,
    StakingClosed = 101,
    InvalidTierIndex = 102,
    TierDisabled = 103,
    AmountTooSmall = 104,
    ExceedStakingLimit = 105,
    Finished = 106,
    LockedStill = 107,
    NotStaked = 108,
    UntrustedRelay = 109,
    InvalidCallData = 110,
    InsufficientReward = 111,
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
            ContractError::AlreadyStaked => "This address already staked",
            ContractError::StakingClosed => "The staking already closed",
            ContractError::InvalidTierIndex => "Invalid typeIndex",
            ContractError::TierDisabled => "The type disabled",
            ContractError::AmountTooSmall => "The staking amount is too small",
            ContractError::ExceedStakingLimit => "Exceed the staking limit",
            ContractError::Finished => "Already closed",
            ContractError::LockedStill => "Locked still",
            ContractError::NotStaked => "Not staked",
            ContractError::UntrustedRelay => "Caller is not the trusted relay",
            ContractError::InvalidCallData => "Invalid call data",
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
            ContractError::StakingClosed
            | ContractError::ExceedStakingLimit
            | ContractError::Finished
            | ContractError::InsufficientReward => ErrorCategory::Capacity,
            ContractError::InvalidInput
            | ContractError::AlreadyStaked
            | ContractError::InvalidTierIndex
            | ContractError::TierDisabled
            | ContractError::AmountTooSmall
            | ContractError::LockedStill
            | ContractError::NotStaked
            | ContractError::InvalidCallData => ErrorCategory::Precondition,
            ContractError::ArithmeticError | ContractError::DivisionByZero => {
                ErrorCategory::Arithmetic
            }
        }
    }
}
