//! # secp256k1 signer recovery
//!
//! Off-chain signers are identified by their 20-byte EVM address
//! (`keccak256(uncompressed_pubkey[1..])[12..]`). On-chain Soroban addresses
//! that appear inside a signed payload are mapped to the same width through
//! [`evm_identity`], so a signature always commits to 20-byte identities.
//!
//! Recovery rejects everything an ECDSA verifier would accept twice for the
//! same message: `v` outside `{0, 1, 27, 28}`, zero `r`/`s`, and any `s` in
//! the upper half of the curve order.

use soroban_sdk::{contracttype, crypto::Hash, xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::CommonError;

/// 20-byte signer identity.
pub type EvmAddress = BytesN<20>;

/// `n / 2` for the secp256k1 group order.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

const PERSONAL_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// A split `r || s || v` signature.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureParts {
    pub r: BytesN<32>,
    pub s: BytesN<32>,
    pub v: u32,
}

impl SignatureParts {
    /// Splits a 65-byte `r || s || v` signature.
    pub fn from_bytes(env: &Env, raw: &BytesN<65>) -> Self {
        let bytes = raw.to_array();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        SignatureParts {
            r: BytesN::from_array(env, &r),
            s: BytesN::from_array(env, &s),
            v: bytes[64] as u32,
        }
    }

    fn recovery_id(&self) -> Result<u32, CommonError> {
        match self.v {
            0 | 1 => Ok(self.v),
            27 | 28 => Ok(self.v - 27),
            _ => Err(CommonError::InvalidSignature),
        }
    }

    fn compact(&self, env: &Env) -> Result<BytesN<64>, CommonError> {
        let r = self.r.to_array();
        let s = self.s.to_array();
        if r == [0u8; 32] || s == [0u8; 32] || s > HALF_ORDER {
            return Err(CommonError::InvalidSignature);
        }
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&r);
        out[32..].copy_from_slice(&s);
        Ok(BytesN::from_array(env, &out))
    }
}

fn last_twenty(env: &Env, hash: &[u8; 32]) -> EvmAddress {
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    BytesN::from_array(env, &out)
}

/// Maps an uncompressed SEC1 public key (`0x04 || x || y`) to its address.
pub fn address_from_public_key(env: &Env, public_key: &BytesN<65>) -> EvmAddress {
    let key = public_key.to_array();
    let hash = env.crypto().keccak256(&Bytes::from_slice(env, &key[1..]));
    last_twenty(env, &hash.to_array())
}

/// 20-byte identity of a Soroban address, used wherever a signed payload
/// names a contract or a recipient.
pub fn evm_identity(env: &Env, address: &Address) -> EvmAddress {
    let hash = env.crypto().keccak256(&address.clone().to_xdr(env));
    last_twenty(env, &hash.to_array())
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || hash)`.
pub fn eth_signed_message_hash(env: &Env, hash: &BytesN<32>) -> Hash<32> {
    let mut msg = Bytes::from_slice(env, PERSONAL_PREFIX);
    msg.append(&Bytes::from_array(env, &hash.to_array()));
    env.crypto().keccak256(&msg)
}

/// Recovers the signer of `digest`.
///
/// Structurally invalid signatures return [`CommonError::InvalidSignature`].
/// A well-formed `r` that is not a curve point aborts inside the host.
pub fn recover(
    env: &Env,
    digest: &Hash<32>,
    sig: &SignatureParts,
) -> Result<EvmAddress, CommonError> {
    let recovery_id = sig.recovery_id()?;
    let compact = sig.compact(env)?;
    let public_key = env
        .crypto()
        .secp256k1_recover(digest, &compact, recovery_id);
    Ok(address_from_public_key(env, &public_key))
}

/// Recovers the signer of `digest` and requires it to be `expected`.
pub fn verify(
    env: &Env,
    digest: &Hash<32>,
    sig: &SignatureParts,
    expected: &EvmAddress,
) -> Result<(), CommonError> {
    let signer = recover(env, digest, sig)?;
    if signer.to_array() == [0u8; 20] {
        return Err(CommonError::InvalidSignature);
    }
    if signer != *expected {
        return Err(CommonError::SignerMismatch);
    }
    Ok(())
}
