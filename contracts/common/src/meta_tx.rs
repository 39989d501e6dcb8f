//! EIP-712 typed-data hashing for meta-transactions.
//!
//! Domain: `EIP712Domain(string name,string version,address verifyingContract,bytes32 salt)`
//! with the network id as `salt`. Message:
//! `MetaTransaction(uint256 nonce,address from,bytes functionSignature)`.

use soroban_sdk::{crypto::Hash, Bytes, BytesN, Env};

use crate::signature::EvmAddress;

pub const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,address verifyingContract,bytes32 salt)";
pub const META_TRANSACTION_TYPE: &[u8] =
    b"MetaTransaction(uint256 nonce,address from,bytes functionSignature)";

pub fn keccak(env: &Env, data: &Bytes) -> BytesN<32> {
    env.crypto().keccak256(data).to_bytes()
}

/// ABI word for an address: 12 zero bytes followed by the 20-byte identity.
pub fn address_word(env: &Env, addr: &EvmAddress) -> Bytes {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&addr.to_array());
    Bytes::from_array(env, &word)
}

/// ABI `uint256` word for a value that fits in 128 bits.
pub fn uint_word(env: &Env, value: u128) -> Bytes {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    Bytes::from_array(env, &word)
}

pub fn domain_separator(
    env: &Env,
    name: &Bytes,
    version: &Bytes,
    verifying_contract: &EvmAddress,
    salt: &BytesN<32>,
) -> BytesN<32> {
    let mut enc = Bytes::new(env);
    enc.append(&keccak(env, &Bytes::from_slice(env, DOMAIN_TYPE)).into());
    enc.append(&keccak(env, name).into());
    enc.append(&keccak(env, version).into());
    enc.append(&address_word(env, verifying_contract));
    enc.append(&salt.clone().into());
    keccak(env, &enc)
}

pub fn meta_tx_struct_hash(
    env: &Env,
    nonce: u64,
    from: &EvmAddress,
    call_data: &Bytes,
) -> BytesN<32> {
    let mut enc = Bytes::new(env);
    enc.append(&keccak(env, &Bytes::from_slice(env, META_TRANSACTION_TYPE)).into());
    enc.append(&uint_word(env, nonce as u128));
    enc.append(&address_word(env, from));
    enc.append(&keccak(env, call_data).into());
    keccak(env, &enc)
}

/// `keccak256(0x19 0x01 || domain_separator || struct_hash)`.
pub fn typed_data_digest(env: &Env, domain: &BytesN<32>, struct_hash: &BytesN<32>) -> Hash<32> {
    let mut msg = Bytes::from_array(env, &[0x19, 0x01]);
    msg.append(&domain.clone().into());
    msg.append(&struct_hash.clone().into());
    env.crypto().keccak256(&msg)
}
