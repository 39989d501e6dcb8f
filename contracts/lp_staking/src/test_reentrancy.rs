extern crate std;

use soroban_sdk::{
    contract, contractimpl, contracttype, testutils::Address as _, Address, Env,
};

use crate::{test::setup, LpStakingContractClient};

#[contracttype]
#[derive(Clone)]
enum HostileKey {
    Balance(Address),
    Target,
    Victim,
    Pid,
    Reentered,
}

/// Asset token that calls back into the staking contract from inside its
/// own transfer hooks once armed.
#[contract]
pub struct HostileToken;

#[contractimpl]
impl HostileToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&HostileKey::Balance(to), &(balance + amount));
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&HostileKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn arm(env: Env, target: Address, victim: Address, pid: u32) {
        env.storage().instance().set(&HostileKey::Target, &target);
        env.storage().instance().set(&HostileKey::Victim, &victim);
        env.storage().instance().set(&HostileKey::Pid, &pid);
    }

    pub fn reentered(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&HostileKey::Reentered)
            .unwrap_or(false)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        Self::move_balance(&env, &from, &to, amount);
        Self::strike(&env);
    }

    pub fn transfer_from(env: Env, _spender: Address, from: Address, to: Address, amount: i128) {
        Self::move_balance(&env, &from, &to, amount);
        Self::strike(&env);
    }

    fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) {
        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            panic!("insufficient balance");
        }
        env.storage()
            .persistent()
            .set(&HostileKey::Balance(from.clone()), &(from_balance - amount));
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&HostileKey::Balance(to.clone()), &(to_balance + amount));
    }

    fn strike(env: &Env) {
        let target: Option<Address> = env.storage().instance().get(&HostileKey::Target);
        let Some(target) = target else {
            return;
        };
        env.storage().instance().remove(&HostileKey::Target);

        let victim: Address = env
            .storage()
            .instance()
            .get(&HostileKey::Victim)
            .unwrap();
        let pid: u32 = env.storage().instance().get(&HostileKey::Pid).unwrap();
        let result = LpStakingContractClient::new(env, &target).try_withdraw(&victim, &pid, &1);
        env.storage()
            .instance()
            .set(&HostileKey::Reentered, &matches!(result, Ok(Ok(_))));
    }
}

fn hostile_pool(
    s: &crate::test::Setup,
) -> (HostileTokenClient<'static>, u32) {
    let token = HostileTokenClient::new(&s.env, &s.env.register(HostileToken, ()));
    let pid = s.client.add_pool(&s.owner, &token.address, &100, &false);
    (token, pid)
}

#[test]
fn test_reentrant_withdraw_cannot_double_spend() {
    let s = setup();
    let (token, pid) = hostile_pool(&s);
    let user = Address::generate(&s.env);
    token.mint(&user, &10);
    s.client.deposit(&user, &pid, &10);

    token.arm(&s.contract, &user, &pid);
    let outcome = s.client.try_withdraw(&user, &pid, &5);

    let staked = s.client.get_position(&pid, &user).amount;
    let pool = s.client.get_pool(&pid);
    let held = token.balance(&s.contract);

    assert!(!token.reentered());
    assert_eq!(pool.total_staked, staked);
    assert_eq!(held, staked);
    assert_eq!(token.balance(&user) + held, 10);
    match outcome {
        Ok(Ok(_)) => assert_eq!(staked, 5),
        _ => assert_eq!(staked, 10),
    }
}

#[test]
fn test_reentrant_call_during_deposit_pull_is_contained() {
    let s = setup();
    let (token, pid) = hostile_pool(&s);
    let user = Address::generate(&s.env);
    token.mint(&user, &20);
    s.client.deposit(&user, &pid, &10);

    token.arm(&s.contract, &user, &pid);
    let outcome = s.client.try_deposit(&user, &pid, &10);

    let staked = s.client.get_position(&pid, &user).amount;
    let pool = s.client.get_pool(&pid);

    assert!(!token.reentered());
    assert_eq!(pool.total_staked, staked);
    assert_eq!(token.balance(&s.contract), staked);
    match outcome {
        Ok(Ok(_)) => assert_eq!(staked, 20),
        _ => assert_eq!(staked, 10),
    }
}
