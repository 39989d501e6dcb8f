//! Shared building blocks for the GridZone reward contracts.
//!
//! This crate provides:
//! - [`CommonError`] and the [`ErrorCategory`] taxonomy every contract error
//!   maps into.
//! - secp256k1 signer recovery and EIP-712 hashing ([`signature`], [`meta_tx`]).
//! - Per-signer replay nonces ([`nonce`]).
//! - Owner / governor / capability checks ([`access`]).
//! - Checked fixed-point helpers ([`math`]).
//!
//! Contract-specific errors start at code **100** when they are re-exported
//! through a contract's own enum, so the common set never collides.

#![no_std]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod access;
pub mod math;
pub mod meta_tx;
pub mod nonce;
pub mod signature;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use access::Role;
pub use signature::{EvmAddress, SignatureParts};

// ── Error taxonomy ───────────────────────────────────────────────────────────

/// Coarse classification of every failure a contract in the suite can raise.
///
/// All categories abort the whole invocation; the category only tells the
/// off-chain caller what must change before resubmitting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Initialisation ordering (not yet / already initialised).
    Lifecycle,
    /// Wrong signer, wrong role, wrong caller.
    Authorization,
    /// Insufficient balance, wrong lifecycle state, disabled tier.
    Precondition,
    /// Global caps and claim limits. Signatures and nonces are not consumed.
    Capacity,
    /// Overflow or division by zero in reward math.
    Arithmetic,
}

/// Implemented by every contract error so integrations can recover the
/// human-readable revert reason and its category.
pub trait ErrorReason {
    fn reason(&self) -> &'static str;
    fn category(&self) -> ErrorCategory;
}

// ── Shared error enum ────────────────────────────────────────────────────────

/// Failures raised by the helpers in this crate.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Ownership, governor, roles     |
/// | 20 – 29 | Signatures                     |
/// | 30 – 39 | Nonces and input validation    |
/// | 40 – 49 | Arithmetic                     |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    NotInitialized = 1,
    AlreadyInitialized = 2,

    /// Caller is not the owner.
    NotOwner = 10,
    /// Caller is neither the owner nor the governor.
    NotOwnerOrGovernor = 11,
    /// No ownership transfer is pending.
    NoPendingOwner = 12,
    /// Caller is not the proposed owner.
    NotPendingOwner = 13,
    /// Account lacks the capability the operation requires.
    MissingRole = 14,

    /// Malformed signature (bad `v`, zero `r`/`s`, high `s`).
    InvalidSignature = 20,
    /// Signature is well-formed but recovers to a different signer.
    SignerMismatch = 21,

    InvalidInput = 30,
    /// Provided nonce does not equal the stored one.
    InvalidNonce = 31,
    NonceOverflow = 32,

    ArithmeticError = 40,
    DivisionByZero = 41,
}

impl ErrorReason for CommonError {
    fn reason(&self) -> &'static str {
        match self {
            CommonError::NotInitialized => "Not initialized",
            CommonError::AlreadyInitialized => "Already initialized",
            CommonError::NotOwner => "Ownable: caller is not the owner",
            CommonError::NotOwnerOrGovernor => "The caller should be owner or governor",
            CommonError::NoPendingOwner => "No pending owner",
            CommonError::NotPendingOwner => "Caller is not the pending owner",
            CommonError::MissingRole => "AccessControl: account is missing role",
            CommonError::InvalidSignature => "Invalid signature",
            CommonError::SignerMismatch => "Signer and signature do not match",
            CommonError::InvalidInput => "Invalid input",
            CommonError::InvalidNonce => "Invalid nonce",
            CommonError::NonceOverflow => "Nonce overflow",
            CommonError::ArithmeticError => "Arithmetic overflow",
            CommonError::DivisionByZero => "Division by zero",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            CommonError::NotInitialized | CommonError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            CommonError::NotOwner
            | CommonError::NotOwnerOrGovernor
            | CommonError::NoPendingOwner
            | CommonError::NotPendingOwner
            | CommonError::MissingRole
            | CommonError::InvalidSignature
            | CommonError::SignerMismatch
            | CommonError::InvalidNonce => ErrorCategory::Authorization,
            CommonError::InvalidInput => ErrorCategory::Precondition,
            CommonError::NonceOverflow
            | CommonError::ArithmeticError
            | CommonError::DivisionByZero => ErrorCategory::Arithmetic,
        }
    }
}
