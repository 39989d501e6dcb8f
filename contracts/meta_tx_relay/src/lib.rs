#![no_std]

//! Fee-prepaid meta-transaction relay.
//!
//! Accounts bind a secp256k1 signer and prepay a balance in the ecosystem
//! token. A relayer submits EIP-712 signed calls on their behalf: either
//! against the relay's own balance ledger (`execute_meta_transaction`) or
//! forwarded to an allowed target contract (`relay_meta_transaction`), which
//! is charged `gas_price * relay_gas` from the prepaid balance.
//!
//! The signer's nonce is consumed in the same invocation as the call it
//! authorises, so a failing call leaves the nonce untouched.

pub mod call;
pub mod errors;
pub mod events;
pub mod ledger;

use common::{access, meta_tx, nonce, signature, EvmAddress, Role, SignatureParts};
use soroban_sdk::{
    contract, contractimpl, symbol_short, token, xdr::FromXdr, Address, Bytes, BytesN, Env, Symbol,
};

pub use call::{RelayCall, RelayRecipientClient};
pub use errors::ContractError;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const TOKEN: Symbol = symbol_short!("TOKEN");
const FORWARDER: Symbol = symbol_short!("FWD");
const GAS_PRICE: Symbol = symbol_short!("GAS_PRICE");
const RELAY_GAS: Symbol = symbol_short!("RELAY_GAS");
const DOMAIN_NAME: Symbol = symbol_short!("DOM_NAME");
const DOMAIN_VERSION: Symbol = symbol_short!("DOM_VER");

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct MetaTxRelayContract;

#[contractimpl]
impl MetaTxRelayContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the relay.
    ///
    /// * `token`             – SAC address of the prepaid-balance token.
    /// * `trusted_forwarder` – only caller of `relay_meta_transaction`.
    /// * `gas_price`         – token units per gas unit.
    /// * `relay_gas`         – gas units charged per relayed call.
    /// * `name`, `version`   – EIP-712 domain fields.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        trusted_forwarder: Address,
        gas_price: i128,
        relay_gas: i128,
        name: Bytes,
        version: Bytes,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if gas_price < 0 || relay_gas < 0 || name.is_empty() {
            return Err(ContractError::InvalidInput);
        }

        access::init_owner(&env, &owner);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&TOKEN, &token);
        env.storage().instance().set(&FORWARDER, &trusted_forwarder);
        env.storage().instance().set(&GAS_PRICE, &gas_price);
        env.storage().instance().set(&RELAY_GAS, &relay_gas);
        env.storage().instance().set(&DOMAIN_NAME, &name);
        env.storage().instance().set(&DOMAIN_VERSION, &version);

        let this = env.current_contract_address();
        access::grant_role(&env, &this, Role::AllowedContract);

        events::publish_initialized(&env, owner, token, trusted_forwarder, gas_price, relay_gas);
        Ok(())
    }

    // ── Signers ─────────────────────────────────────────────────────────────

    /// Bind `signer` to `account`. `proof` is the signer's personal
    /// signature over `keccak256(relay_id ‖ account_id)`.
    pub fn link_signer(
        env: Env,
        account: Address,
        signer: EvmAddress,
        proof: SignatureParts,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();

        let digest = Self::link_digest(&env, &account);
        signature::verify(&env, &digest, &proof, &signer)?;
        ledger::link(&env, &account, &signer)?;

        events::publish_signer_linked(&env, account, signer);
        Ok(())
    }

    // ── Balance ledger ──────────────────────────────────────────────────────

    pub fn deposit(env: Env, account: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        Self::do_deposit(&env, &account, amount)
    }

    pub fn withdraw(env: Env, account: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();
        Self::do_withdraw(&env, &account, amount)
    }

    // ── Meta-transactions ───────────────────────────────────────────────────

    /// Run a signed [`RelayCall`] against this contract as the signer's
    /// linked account. Callable by anyone; the signature is the
    /// authorisation.
    pub fn execute_meta_transaction(
        env: Env,
        signer: EvmAddress,
        call_data: Bytes,
        sig: SignatureParts,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let account = ledger::account_of(&env, &signer).ok_or(ContractError::SignerNotLinked)?;
        let used = Self::consume_signature(&env, &signer, &call_data, &sig)?;

        Self::dispatch_local(&env, &account, &call_data)?;

        let this = env.current_contract_address();
        events::publish_meta_tx_executed(&env, signer, account, this, None, used, 0);
        Ok(())
    }

    /// Forward a signed call to `target` on behalf of the signer's linked
    /// account, charging the relay fee from the account's prepaid balance.
    pub fn relay_meta_transaction(
        env: Env,
        forwarder: Address,
        signer: EvmAddress,
        target: Address,
        call_data: Bytes,
        sig: SignatureParts,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        forwarder.require_auth();
        if forwarder != Self::trusted_forwarder(env.clone())? {
            return Err(ContractError::NotTrustedForwarder);
        }
        if !access::has_role(&env, &target, Role::AllowedContract) {
            return Err(ContractError::TargetNotAllowed);
        }

        let account = ledger::account_of(&env, &signer).ok_or(ContractError::SignerNotLinked)?;
        let used = Self::consume_signature(&env, &signer, &call_data, &sig)?;
        let fee = Self::charge_fee(&env, &account)?;

        let this = env.current_contract_address();
        if target == this {
            Self::dispatch_local(&env, &account, &call_data)?;
        } else {
            let outcome = RelayRecipientClient::new(&env, &target)
                .try_execute_relayed(&this, &account, &call_data);
            if !matches!(outcome, Ok(Ok(()))) {
                return Err(ContractError::RelayedCallFailed);
            }
        }

        events::publish_meta_tx_executed(&env, signer, account, target, Some(forwarder), used, fee);
        Ok(())
    }

    // ── Roles ───────────────────────────────────────────────────────────────

    pub fn grant_role(
        env: Env,
        caller: Address,
        account: Address,
        role: Role,
    ) -> Result<bool, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let changed = access::grant_role(&env, &account, role);
        if changed {
            events::publish_role_changed(&env, account, role, true);
        }
        Ok(changed)
    }

    pub fn revoke_role(
        env: Env,
        caller: Address,
        account: Address,
        role: Role,
    ) -> Result<bool, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let changed = access::revoke_role(&env, &account, role);
        if changed {
            events::publish_role_changed(&env, account, role, false);
        }
        Ok(changed)
    }

    /// Let a factory make a contract it deployed a relay target.
    pub fn register_child(env: Env, factory: Address, child: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        factory.require_auth();
        access::require_role(&env, &factory, Role::Factory)
            .map_err(|_| ContractError::NotFactory)?;

        access::grant_role(&env, &child, Role::AllowedContract);
        events::publish_child_registered(&env, factory, child);
        Ok(())
    }

    // ── Owner setters ───────────────────────────────────────────────────────

    pub fn set_gas_price(env: Env, caller: Address, gas_price: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        if gas_price < 0 {
            return Err(ContractError::InvalidInput);
        }

        env.storage().instance().set(&GAS_PRICE, &gas_price);
        events::publish_fee_set(&env, gas_price, Self::relay_gas(env.clone()));
        Ok(())
    }

    pub fn set_relay_gas(env: Env, caller: Address, relay_gas: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;
        if relay_gas < 0 {
            return Err(ContractError::InvalidInput);
        }

        env.storage().instance().set(&RELAY_GAS, &relay_gas);
        events::publish_fee_set(&env, Self::gas_price(env.clone()), relay_gas);
        Ok(())
    }

    pub fn set_trusted_forwarder(
        env: Env,
        caller: Address,
        forwarder: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let old = Self::trusted_forwarder(env.clone())?;
        env.storage().instance().set(&FORWARDER, &forwarder);
        events::publish_forwarder_set(&env, old, forwarder);
        Ok(())
    }

    pub fn set_governor(env: Env, caller: Address, governor: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::set_governor(&env, &caller, &governor)?;
        Ok(())
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    pub fn propose_owner(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::propose_owner(&env, &caller, &new_owner)?;
        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();
        access::accept_owner(&env, &new_owner)?;
        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::cancel_owner_transfer(&env, &caller)?;
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn balance_of(env: Env, account: Address) -> i128 {
        ledger::balance(&env, &account)
    }

    /// Nonce the signer's next meta-transaction must be signed with.
    pub fn get_nonce(env: Env, signer: EvmAddress) -> u64 {
        nonce::current_nonce(&env, &signer)
    }

    pub fn has_role(env: Env, account: Address, role: Role) -> bool {
        access::has_role(&env, &account, role)
    }

    pub fn domain_separator(env: Env) -> Result<BytesN<32>, ContractError> {
        Self::require_initialized(&env)?;
        Ok(Self::domain(&env))
    }

    pub fn linked_account(env: Env, signer: EvmAddress) -> Option<Address> {
        ledger::account_of(&env, &signer)
    }

    pub fn linked_signer(env: Env, account: Address) -> Option<EvmAddress> {
        ledger::signer_of(&env, &account)
    }

    /// Fee charged per relayed call.
    pub fn relay_fee(env: Env) -> Result<i128, ContractError> {
        Self::gas_price(env.clone())
            .checked_mul(Self::relay_gas(env))
            .ok_or(ContractError::ArithmeticError)
    }

    pub fn gas_price(env: Env) -> i128 {
        env.storage().instance().get(&GAS_PRICE).unwrap_or(0)
    }

    pub fn relay_gas(env: Env) -> i128 {
        env.storage().instance().get(&RELAY_GAS).unwrap_or(0)
    }

    pub fn trusted_forwarder(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&FORWARDER)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn token(env: Env) -> Result<Address, ContractError> {
        Self::token_address(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(access::owner(&env)?)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        access::pending_owner(&env)
    }

    pub fn get_governor(env: Env) -> Option<Address> {
        access::governor(&env)
    }

    // ── Internal: operations ────────────────────────────────────────────────

    fn do_deposit(env: &Env, account: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let new_balance = ledger::credit(env, account, amount)?;

        let this = env.current_contract_address();
        token::Client::new(env, &Self::token_address(env)?)
            .transfer_from(&this, account, &this, &amount);

        events::publish_deposit(env, account.clone(), amount, new_balance);
        Ok(())
    }

    fn do_withdraw(env: &Env, account: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let new_balance =
            ledger::debit(env, account, amount, ContractError::InsufficientBalance)?;

        token::Client::new(env, &Self::token_address(env)?).transfer(
            &env.current_contract_address(),
            account,
            &amount,
        );

        events::publish_withdraw(env, account.clone(), amount, new_balance);
        Ok(())
    }

    fn dispatch_local(env: &Env, account: &Address, call_data: &Bytes) -> Result<(), ContractError> {
        let call =
            RelayCall::from_xdr(env, call_data).map_err(|_| ContractError::InvalidCallData)?;
        match call {
            RelayCall::Deposit(amount) => Self::do_deposit(env, account, amount),
            RelayCall::Withdraw(amount) => Self::do_withdraw(env, account, amount),
        }
    }

    /// Moves the relay fee from `account` to the owner. Returns the fee.
    fn charge_fee(env: &Env, account: &Address) -> Result<i128, ContractError> {
        let fee = Self::relay_fee(env.clone())?;
        if fee == 0 {
            return Ok(0);
        }
        ledger::debit(env, account, fee, ContractError::InsufficientRelayBalance)?;
        ledger::credit(env, &access::owner(env)?, fee)?;
        Ok(fee)
    }

    // ── Internal: signatures ────────────────────────────────────────────────

    /// Verifies `sig` over the signer's current nonce and consumes that
    /// nonce. Returns the nonce that was used.
    fn consume_signature(
        env: &Env,
        signer: &EvmAddress,
        call_data: &Bytes,
        sig: &SignatureParts,
    ) -> Result<u64, ContractError> {
        let current = nonce::current_nonce(env, signer);
        let struct_hash = meta_tx::meta_tx_struct_hash(env, current, signer, call_data);
        let digest = meta_tx::typed_data_digest(env, &Self::domain(env), &struct_hash);
        signature::verify(env, &digest, sig, signer)?;
        nonce::validate_and_increment_nonce(env, signer, current)?;
        Ok(current)
    }

    fn domain(env: &Env) -> BytesN<32> {
        let name: Bytes = env
            .storage()
            .instance()
            .get(&DOMAIN_NAME)
            .unwrap_or_else(|| Bytes::new(env));
        let version: Bytes = env
            .storage()
            .instance()
            .get(&DOMAIN_VERSION)
            .unwrap_or_else(|| Bytes::new(env));
        let verifying_contract = signature::evm_identity(env, &env.current_contract_address());
        meta_tx::domain_separator(
            env,
            &name,
            &version,
            &verifying_contract,
            &env.ledger().network_id(),
        )
    }

    fn link_digest(env: &Env, account: &Address) -> soroban_sdk::crypto::Hash<32> {
        let mut msg = Bytes::new(env);
        msg.append(&signature::evm_identity(env, &env.current_contract_address()).into());
        msg.append(&signature::evm_identity(env, account).into());
        signature::eth_signed_message_hash(env, &meta_tx::keccak(env, &msg))
    }

    // ── Internal: helpers ───────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn token_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&TOKEN)
            .ok_or(ContractError::NotInitialized)
    }
}

#[cfg(test)]
mod test_forwarding;
