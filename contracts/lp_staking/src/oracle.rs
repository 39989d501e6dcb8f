//! Price-oracle boundary. The oracle reports the reference-currency value of
//! one base unit of an asset, scaled by [`PRICE_SCALE`].

use soroban_sdk::{contractclient, Address, Env};

use crate::errors::ContractError;

pub const PRICE_SCALE: i128 = 1_000_000_000_000_000_000;

#[allow(dead_code)]
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn price_per_unit(env: Env, asset: Address) -> i128;
}

pub fn price_of(env: &Env, oracle: &Address, asset: &Address) -> Result<i128, ContractError> {
    let price = PriceOracleClient::new(env, oracle).price_per_unit(asset);
    if price <= 0 {
        return Err(ContractError::PriceUnavailable);
    }
    Ok(price)
}

/// Reference-currency value of `amount` units at `price`.
pub fn value_of(amount: i128, price: i128) -> Result<i128, ContractError> {
    Ok(common::math::mul_div(amount, price, PRICE_SCALE)?)
}

/// Units worth `value` at `price`.
pub fn amount_for(value: i128, price: i128) -> Result<i128, ContractError> {
    Ok(common::math::mul_div(value, PRICE_SCALE, price)?)
}
