#![no_std]
use soroban_sdk::{contract, contractimpl, token, Address, Env};

mod access_control;
pub mod errors;
mod events;
pub mod fund;
pub mod storage;
mod whitelist;

pub use errors::FundError;
use events::Events;
pub use fund::{Fund, FundType};
use whitelist::Whitelist;

#[contract]
pub struct FundContract;

#[contractimpl]
impl FundContract {
    /// Program-level initialization. Safe to call more than once.
    pub fn initialize(env: Env) -> Result<(), FundError> {
        if storage::is_initialized(&env) {
            return Ok(());
        }
        storage::set_initialized(&env);

        #[cfg(feature = "logging")]
        soroban_sdk::log!(&env, "initialize", storage::VERSION);

        Events::initialized(&env, storage::VERSION, env.ledger().sequence());
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    pub fn version(env: Env) -> u32 {
        storage::version(&env)
    }

    /// Create a fund whose vault holds `token`. Returns the new fund id.
    pub fn create_fund(
        env: Env,
        owner: Address,
        authority: Address,
        token: Address,
        max_balance: i128,
        fund_type: FundType,
    ) -> Result<u64, FundError> {
        access_control::initialized(&env)?;
        owner.require_auth();
        access_control::amount(max_balance)?;

        let fund_id = storage::next_fund_id(&env);
        let fund = Fund::new(
            owner.clone(),
            authority,
            token,
            max_balance,
            fund_type.clone(),
            env.ledger().sequence(),
        );
        storage::save_fund(&env, fund_id, &fund);

        #[cfg(feature = "logging")]
        soroban_sdk::log!(&env, "create_fund", fund_id, max_balance);

        Events::fund_created(&env, fund_id, owner, fund_type, max_balance);
        Ok(fund_id)
    }

    /// Send tokens from `depositor` into the fund vault.
    pub fn deposit(env: Env, fund_id: u64, depositor: Address, amount: i128) -> Result<(), FundError> {
        depositor.require_auth();
        access_control::amount(amount)?;

        let mut fund = storage::load_fund(&env, fund_id)?;
        access_control::open(&fund)?;
        access_control::capacity(&fund, amount)?;
        access_control::depositor(&env, fund_id, &fund, &depositor)?;

        token::Client::new(&env, &fund.token).transfer(
            &depositor,
            &env.current_contract_address(),
            &amount,
        );

        fund.add(amount);
        if fund.fund_type.is_raise() {
            storage::add_shares(&env, fund_id, &depositor, amount);
        }
        storage::save_fund(&env, fund_id, &fund);

        #[cfg(feature = "logging")]
        soroban_sdk::log!(&env, "deposit", fund_id, amount);

        Events::deposited(&env, fund_id, depositor, amount, fund.balance);
        Ok(())
    }

    /// Move tokens from the vault of a closed fund to its owner.
    pub fn withdraw(env: Env, fund_id: u64, owner: Address, amount: i128) -> Result<(), FundError> {
        let mut fund = access_control::owner(&env, fund_id, &owner)?;
        access_control::closed(&fund)?;
        access_control::amount(amount)?;
        if amount > fund.balance {
            return Err(FundError::InsufficientBalance);
        }

        token::Client::new(&env, &fund.token).transfer(
            &env.current_contract_address(),
            &owner,
            &amount,
        );

        fund.deduct(amount);
        storage::save_fund(&env, fund_id, &fund);

        #[cfg(feature = "logging")]
        soroban_sdk::log!(&env, "withdraw", fund_id, amount);

        Events::withdrawn(&env, fund_id, owner, amount, fund.balance);
        Ok(())
    }

    /// Stop accepting deposits. Closing a closed fund is a no-op.
    pub fn close(env: Env, fund_id: u64, owner: Address) -> Result<(), FundError> {
        let mut fund = access_control::owner(&env, fund_id, &owner)?;
        if !fund.open {
            return Ok(());
        }
        fund.close();
        storage::save_fund(&env, fund_id, &fund);

        Events::fund_closed(&env, fund_id, fund.balance);
        Ok(())
    }

    pub fn whitelist_add(env: Env, fund_id: u64, owner: Address, entry: Address) -> Result<u32, FundError> {
        access_control::owner(&env, fund_id, &owner)?;

        let mut whitelist = Whitelist::new(storage::load_whitelist(&env, fund_id));
        let slot = whitelist.push(entry.clone())?;
        storage::save_whitelist(&env, fund_id, &whitelist.into_entries());

        Events::whitelist_added(&env, fund_id, entry, slot);
        Ok(slot)
    }

    pub fn whitelist_delete(env: Env, fund_id: u64, owner: Address, entry: Address) -> Result<u32, FundError> {
        access_control::owner(&env, fund_id, &owner)?;

        let mut whitelist = Whitelist::new(storage::load_whitelist(&env, fund_id));
        let slot = whitelist.delete(&entry)?;
        storage::save_whitelist(&env, fund_id, &whitelist.into_entries());

        Events::whitelist_deleted(&env, fund_id, entry, slot);
        Ok(slot)
    }

    /// Owner returns `amount` tokens to be shared among shareholders.
    /// Requires a closed fund, whose shares can no longer change.
    pub fn register_payback(env: Env, fund_id: u64, owner: Address, amount: i128) -> Result<(), FundError> {
        let mut fund = access_control::owner(&env, fund_id, &owner)?;
        access_control::raise(&fund)?;
        access_control::amount(amount)?;
        if fund.shares == 0 {
            return Err(FundError::InvalidFund);
        }
        access_control::closed(&fund)?;
        fund.add_payback(amount)?;

        token::Client::new(&env, &fund.token).transfer(
            &owner,
            &env.current_contract_address(),
            &amount,
        );

        storage::save_fund(&env, fund_id, &fund);

        Events::payback_registered(&env, fund_id, amount, fund.payback_total);
        Ok(())
    }

    /// Shareholder claims up to what they are owed from the payback.
    pub fn payback_withdraw(env: Env, fund_id: u64, holder: Address, amount: i128) -> Result<(), FundError> {
        holder.require_auth();
        access_control::amount(amount)?;

        let fund = storage::load_fund(&env, fund_id)?;
        access_control::raise(&fund)?;

        let owed = Self::owed(&env, fund_id, &fund, &holder)?;
        if amount > owed {
            return Err(FundError::WithdrawalSizeOverflow);
        }

        token::Client::new(&env, &fund.token).transfer(
            &env.current_contract_address(),
            &holder,
            &amount,
        );
        storage::add_claimed(&env, fund_id, &holder, amount);

        #[cfg(feature = "logging")]
        soroban_sdk::log!(&env, "payback_withdraw", fund_id, amount);

        Events::payback_withdrawn(&env, fund_id, holder, amount);
        Ok(())
    }

    pub fn get_fund(env: Env, fund_id: u64) -> Result<Fund, FundError> {
        storage::load_fund(&env, fund_id)
    }

    pub fn fund_count(env: Env) -> u64 {
        storage::fund_count(&env)
    }

    pub fn shares_of(env: Env, fund_id: u64, holder: Address) -> i128 {
        storage::shares_of(&env, fund_id, &holder)
    }

    pub fn is_whitelisted(env: Env, fund_id: u64, entry: Address) -> bool {
        storage::load_whitelist(&env, fund_id).contains(&entry)
    }

    pub fn payback_owed(env: Env, fund_id: u64, holder: Address) -> Result<i128, FundError> {
        let fund = storage::load_fund(&env, fund_id)?;
        Self::owed(&env, fund_id, &fund, &holder)
    }
}

impl FundContract {
    fn owed(env: &Env, fund_id: u64, fund: &Fund, holder: &Address) -> Result<i128, FundError> {
        let entitled = fund.payback_entitlement(env, storage::shares_of(env, fund_id, holder))?;
        Ok((entitled - storage::claimed(env, fund_id, holder)).max(0))
    }
}



#[cfg(test)]
mod payback_tests;
