use common::{CommonError, ErrorCategory, ErrorReason};

/// Codes below 100 mirror [`CommonError`]; claim failures start at 100.
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

    InvalidSignature = 20,

    InvalidInput = 30,

    ArithmeticError = 40,
    DivisionByZero = 41,

    /// Signature recovered to someone other than the admin.
    NotAllowed = 100,
    AlreadyClaimed = 101,
    /// Presented cursor is not the recipient's claimed-so-far total.
    InvalidClaimedAmount = 102,
    ReachedLimit = 103,
    NoPendingAdmin = 104,
    NotPendingAdmin = 105,
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
            CommonError::MissingRole | CommonError::SignerMismatch => ContractError::NotAllowed,
            CommonError::InvalidSignature => ContractError::InvalidSignature,
            CommonError::InvalidInput | CommonError::InvalidNonce => ContractError::InvalidInput,
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
            ContractError::InvalidSignature => "Invalid signature",
            ContractError::InvalidInput => "Invalid input",
            ContractError::ArithmeticError => "Arithmetic overflow",
            ContractError::DivisionByZero => "Division by zero",
            ContractError::NotAllowed => "Not allowed",
            ContractError::AlreadyClaimed => "Already claimed",
            ContractError::InvalidClaimedAmount => "Invalid claimed amount",
            ContractError::ReachedLimit => "Reached to limit",
            ContractError::NoPendingAdmin => "No pending admin",
            ContractError::NotPendingAdmin => "acceptAdmin: Call must come from pendingAdmin.",
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
            | ContractError::InvalidSignature
            | ContractError::NotAllowed
            | ContractError::NoPendingAdmin
            | ContractError::NotPendingAdmin => ErrorCategory::Authorization,
            ContractError::InvalidInput
            | ContractError::AlreadyClaimed
            | ContractError::InvalidClaimedAmount => ErrorCategory::Precondition,
            ContractError::ReachedLimit => ErrorCategory::Capacity,
            ContractError::ArithmeticError | ContractError::DivisionByZero => {
                ErrorCategory::Arithmetic
            }
        }
    }
}
