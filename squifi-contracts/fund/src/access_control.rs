use soroban_sdk::{Address, Env};

use crate::errors::FundError;
use crate::fund::Fund;
use crate::storage;

/// Amount must be strictly positive.
pub fn amount(amount: i128) -> Result<(), FundError> {
    if amount <= 0 {
        return Err(FundError::InvalidAmount);
    }
    Ok(())
}

pub fn initialized(env: &Env) -> Result<(), FundError> {
    if !storage::is_initialized(env) {
        return Err(FundError::NotInitialized);
    }
    Ok(())
}

/// Loads the fund and checks `owner` is its owner and authorized the call.
pub fn owner(env: &Env, fund_id: u64, owner: &Address) -> Result<Fund, FundError> {
    let fund = storage::load_fund(env, fund_id)?;
    if fund.owner != *owner {
        return Err(FundError::Unauthorized);
    }
    owner.require_auth();
    Ok(fund)
}

pub fn open(fund: &Fund) -> Result<(), FundError> {
    if !fund.open {
        return Err(FundError::FundClosed);
    }
    Ok(())
}

pub fn closed(fund: &Fund) -> Result<(), FundError> {
    if fund.open {
        return Err(FundError::FundOpen);
    }
    Ok(())
}

pub fn raise(fund: &Fund) -> Result<(), FundError> {
    if !fund.fund_type.is_raise() {
        return Err(FundError::InvalidFund);
    }
    Ok(())
}

/// The deposit must fit under `max_balance`.
pub fn capacity(fund: &Fund, amount: i128) -> Result<(), FundError> {
    if amount > fund.remaining() {
        return Err(FundError::FundBalanceOverflow);
    }
    Ok(())
}

/// Private raises only accept whitelisted depositors.
pub fn depositor(env: &Env, fund_id: u64, fund: &Fund, depositor: &Address) -> Result<(), FundError> {
    if fund.fund_type.is_private() && !storage::load_whitelist(env, fund_id).contains(depositor) {
        return Err(FundError::NotWhitelisted);
    }
    Ok(())
}
