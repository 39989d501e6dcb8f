//! Reward-in-kind: part of a payout can be taken as an NFT model whose
//! reference-currency price fits inside the payout's value.

use soroban_sdk::{contractclient, contracttype, symbol_short, Address, Env, Symbol, Vec};

const NFT_TABLE: Symbol = symbol_short!("NFT_TBL");

/// One row of the reward table: mint `model` from `nft` for rewards worth
/// at least `price` (reference currency, oracle scale).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftReward {
    pub nft: Address,
    pub model: u32,
    pub price: i128,
}

#[allow(dead_code)]
#[contractclient(name = "RewardNftClient")]
pub trait RewardNft {
    /// Mints one token of `model` to `to`. `minter` must be an allowed minter.
    fn mint(env: Env, minter: Address, to: Address, model: u32) -> u64;
}

pub fn table(env: &Env) -> Vec<NftReward> {
    env.storage()
        .instance()
        .get(&NFT_TABLE)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_table(env: &Env, rows: &Vec<NftReward>) {
    env.storage().instance().set(&NFT_TABLE, rows);
}

/// The most expensive entry whose price does not exceed `value`. Ties keep
/// the earliest row.
pub fn select(rows: &Vec<NftReward>, value: i128) -> Option<NftReward> {
    let mut best: Option<NftReward> = None;
    for row in rows.iter() {
        if row.price <= 0 || row.price > value {
            continue;
        }
        let better = match &best {
            Some(current) => row.price > current.price,
            None => true,
        };
        if better {
            best = Some(row);
        }
    }
    best
}
