use common::{CommonError, ErrorCategory, ErrorReason};

/// Codes below 100 mirror [`CommonError`]; relay failures start at 100.
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
    MissingRole = 14,

    InvalidSignature = 20,
    SignerMismatch = 21,

    InvalidInput = 30,
    InvalidNonce = 31,

    ArithmeticError = 40,
    DivisionByZero = 41,

    NotTrustedForwarder = 100,
    InsufficientRelayBalance = 101,
    InsufficientBalance = 102,
    SignerNotLinked = 103,
    SignerAlreadyLinked = 104,
    InvalidCallData = 105,
    RelayedCallFailed = 106,
    TargetNotAllowed = 107,
    NotFactory = 108,
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
            CommonError::MissingRole => ContractError::MissingRole,
            CommonError::InvalidSignature => ContractError::InvalidSignature,
            CommonError::SignerMismatch => ContractError::SignerMismatch,
            CommonError::InvalidInput => ContractError::InvalidInput,
            CommonError::InvalidNonce => ContractError::InvalidNonce,
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
            ContractError::MissingRole => "AccessControl: account is missing role",
            ContractError::InvalidSignature => "Invalid signature",
            ContractError::SignerMismatch => "Signer and signature do not match",
            ContractError::InvalidInput => "Invalid input",
            ContractError::InvalidNonce => "Invalid nonce",
            ContractError::ArithmeticError => "Arithmetic overflow",
            ContractError::DivisionByZero => "Division by zero",
            ContractError::NotTrustedForwarder => {
                "Function can only be called through the trusted Forwarder"
            }
            ContractError::InsufficientRelayBalance => "Insufficient relay balance",
            ContractError::InsufficientBalance => "Insufficient balance",
            ContractError::SignerNotLinked => "Signer is not linked to an account",
            ContractError::SignerAlreadyLinked => "Signer is linked to another account",
            ContractError::InvalidCallData => "Invalid call data",
            ContractError::RelayedCallFailed => "Function call not successful",
            ContractError::TargetNotAllowed => "Target contract is not allowed",
            ContractError::NotFactory => "Caller is not a factory",
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
            | ContractError::MissingRole
            | ContractError::InvalidSignature
            | ContractError::SignerMismatch
            | ContractError::NotTrustedForwarder
            | ContractError::TargetNotAllowed
            | ContractError::NotFactory => ErrorCategory::Authorization,
            ContractError::InvalidInput
            | ContractError::InvalidNonce
            | ContractError::InsufficientRelayBalance
            | ContractError::InsufficientBalance
            | ContractError::SignerNotLinked
            | ContractError::SignerAlreadyLinked
            | ContractError::InvalidCallData
            | ContractError::RelayedCallFailed => ErrorCategory::Precondition,
            ContractError::ArithmeticError | ContractError::DivisionByZero => {
                ErrorCategory::Arithmetic
            }
        }
    }
}
