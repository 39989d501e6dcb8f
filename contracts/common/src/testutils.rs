//! Off-chain counterparts of the on-chain hashing and signing, for tests.
//!
//! Everything here is computed with `k256` and `sha3` directly, never through
//! the Soroban host, so a test that compares the two sides actually checks
//! the contract's encoding.

extern crate std;

use std::vec::Vec;

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};
use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::signature::{EvmAddress, SignatureParts};

/// secp256k1 group order, big-endian.
const ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

pub fn keccak(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

pub fn to_vec(bytes: &Bytes) -> Vec<u8> {
    bytes.iter().collect()
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || hash)`.
pub fn personal_hash(hash: &[u8; 32]) -> [u8; 32] {
    let mut msg = Vec::with_capacity(60);
    msg.extend_from_slice(b"\x19Ethereum Signed Message:\n32");
    msg.extend_from_slice(hash);
    keccak(&msg)
}

/// 20-byte identity of a Soroban address.
pub fn evm_identity(env: &Env, address: &Address) -> [u8; 20] {
    let hash = keccak(&to_vec(&address.clone().to_xdr(env)));
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    out
}

/// `n - s`, the malleated twin of a signature's `s`.
pub fn negate_scalar(s: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = ORDER[i] as i16 - s[i] as i16 - borrow;
        borrow = if diff < 0 {
            diff += 256;
            1
        } else {
            0
        };
        out[i] = diff as u8;
    }
    out
}

fn word_address(addr: &[u8; 20]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr);
    word
}

fn word_uint(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn domain_separator(
    name: &[u8],
    version: &[u8],
    verifying_contract: &[u8; 20],
    salt: &[u8; 32],
) -> [u8; 32] {
    let mut enc = Vec::with_capacity(160);
    enc.extend_from_slice(&keccak(
        b"EIP712Domain(string name,string version,address verifyingContract,bytes32 salt)",
    ));
    enc.extend_from_slice(&keccak(name));
    enc.extend_from_slice(&keccak(version));
    enc.extend_from_slice(&word_address(verifying_contract));
    enc.extend_from_slice(salt);
    keccak(&enc)
}

#[allow(clippy::too_many_arguments)]
pub fn meta_tx_digest(
    name: &[u8],
    version: &[u8],
    verifying_contract: &[u8; 20],
    salt: &[u8; 32],
    nonce: u64,
    from: &[u8; 20],
    call_data: &[u8],
) -> [u8; 32] {
    let mut enc = Vec::with_capacity(128);
    enc.extend_from_slice(&keccak(
        b"MetaTransaction(uint256 nonce,address from,bytes functionSignature)",
    ));
    enc.extend_from_slice(&word_uint(nonce));
    enc.extend_from_slice(&word_address(from));
    enc.extend_from_slice(&keccak(call_data));
    let struct_hash = keccak(&enc);

    let mut msg = Vec::with_capacity(66);
    msg.extend_from_slice(&[0x19, 0x01]);
    msg.extend_from_slice(&domain_separator(name, version, verifying_contract, salt));
    msg.extend_from_slice(&struct_hash);
    keccak(&msg)
}

/// A deterministic secp256k1 test key.
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// Key whose secret scalar is `scalar` (big-endian, non-zero).
    pub fn from_scalar(scalar: u64) -> Self {
        let mut secret = [0u8; 32];
        secret[24..].copy_from_slice(&scalar.to_be_bytes());
        TestSigner {
            key: SigningKey::from_slice(&secret).expect("non-zero scalar below the order"),
        }
    }

    pub fn address_bytes(&self) -> [u8; 20] {
        let public = k256::PublicKey::from(self.key.verifying_key());
        let point = public.to_encoded_point(false);
        let hash = keccak(&point.as_bytes()[1..]);
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..]);
        out
    }

    pub fn evm_address(&self, env: &Env) -> EvmAddress {
        BytesN::from_array(env, &self.address_bytes())
    }

    /// Signs a 32-byte digest as-is. `v` uses the 27/28 convention.
    pub fn sign_digest(&self, env: &Env, digest: &[u8; 32]) -> SignatureParts {
        let (sig, recid) = self
            .key
            .sign_prehash_recoverable(digest)
            .expect("prehash signing");
        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        SignatureParts {
            r: BytesN::from_array(env, &r),
            s: BytesN::from_array(env, &s),
            v: 27 + recid.to_byte() as u32,
        }
    }

    /// `signMessage` over a 32-byte hash.
    pub fn sign_personal(&self, env: &Env, hash: &[u8; 32]) -> SignatureParts {
        self.sign_digest(env, &personal_hash(hash))
    }

    /// Signs a `MetaTransaction` for the relay at `verifying_contract`.
    pub fn sign_meta_tx(
        &self,
        env: &Env,
        verifying_contract: &Address,
        name: &[u8],
        version: &[u8],
        nonce: u64,
        call_data: &Bytes,
    ) -> SignatureParts {
        let digest = meta_tx_digest(
            name,
            version,
            &evm_identity(env, verifying_contract),
            &env.ledger().network_id().to_array(),
            nonce,
            &self.address_bytes(),
            &to_vec(call_data),
        );
        self.sign_digest(env, &digest)
    }
}
