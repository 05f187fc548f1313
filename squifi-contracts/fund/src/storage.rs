use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::FundError;
use crate::fund::Fund;

/// Current layout version written by `initialize`.
pub const VERSION: u32 = 1;

#[contracttype]
pub enum DataKey {
    Initialized,
    Version,
    FundCount,
    Fund(u64),
    Whitelist(u64),
    Shares(u64, Address),
    Claimed(u64, Address),
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Initialized)
        .unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
    env.storage().instance().set(&DataKey::Version, &VERSION);
}

pub fn version(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Version).unwrap_or(0)
}

pub fn fund_count(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::FundCount).unwrap_or(0)
}

/// Reserves the next fund id.
pub fn next_fund_id(env: &Env) -> u64 {
    let id = fund_count(env);
    env.storage().instance().set(&DataKey::FundCount, &(id + 1));
    id
}

pub fn load_fund(env: &Env, fund_id: u64) -> Result<Fund, FundError> {
    env.storage()
        .persistent()
        .get(&DataKey::Fund(fund_id))
        .ok_or(FundError::FundNotFound)
}

pub fn save_fund(env: &Env, fund_id: u64, fund: &Fund) {
    env.storage().persistent().set(&DataKey::Fund(fund_id), fund);
}

pub fn load_whitelist(env: &Env, fund_id: u64) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Whitelist(fund_id))
        .unwrap_or(Vec::new(env))
}

pub fn save_whitelist(env: &Env, fund_id: u64, entries: &Vec<Address>) {
    env.storage()
        .persistent()
        .set(&DataKey::Whitelist(fund_id), entries);
}

pub fn shares_of(env: &Env, fund_id: u64, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Shares(fund_id, holder.clone()))
        .unwrap_or(0)
}

pub fn add_shares(env: &Env, fund_id: u64, holder: &Address, amount: i128) {
    let current = shares_of(env, fund_id, holder);
    env.storage()
        .persistent()
        .set(&DataKey::Shares(fund_id, holder.clone()), &(current + amount));
}

pub fn claimed(env: &Env, fund_id: u64, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Claimed(fund_id, holder.clone()))
        .unwrap_or(0)
}

pub fn add_claimed(env: &Env, fund_id: u64, holder: &Address, amount: i128) {
    let current = claimed(env, fund_id, holder);
    env.storage()
        .persistent()
        .set(&DataKey::Claimed(fund_id, holder.clone()), &(current + amount));
}
