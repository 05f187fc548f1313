use soroban_sdk::{Address, Env, Symbol};

use crate::fund::FundType;

pub struct Events;

impl Events {
    pub fn initialized(env: &Env, version: u32, ledger: u32) {
        env.events()
            .publish((Symbol::new(env, "Initialized"),), (version, ledger));
    }

    pub fn fund_created(
        env: &Env,
        fund_id: u64,
        owner: Address,
        fund_type: FundType,
        max_balance: i128,
    ) {
        env.events().publish(
            (Symbol::new(env, "FundCreated"), fund_id, owner),
            (fund_type, max_balance),
        );
    }

    pub fn deposited(env: &Env, fund_id: u64, depositor: Address, amount: i128, balance: i128) {
        env.events().publish(
            (Symbol::new(env, "Deposited"), fund_id, depositor),
            (amount, balance),
        );
    }

    pub fn withdrawn(env: &Env, fund_id: u64, owner: Address, amount: i128, balance: i128) {
        env.events().publish(
            (Symbol::new(env, "Withdrawn"), fund_id, owner),
            (amount, balance),
        );
    }

    pub fn fund_closed(env: &Env, fund_id: u64, balance: i128) {
        env.events()
            .publish((Symbol::new(env, "FundClosed"), fund_id), (balance,));
    }

    pub fn whitelist_added(env: &Env, fund_id: u64, entry: Address, slot: u32) {
        env.events().publish(
            (Symbol::new(env, "WhitelistAdded"), fund_id, entry),
            (slot,),
        );
    }

    pub fn whitelist_deleted(env: &Env, fund_id: u64, entry: Address, slot: u32) {
        env.events().publish(
            (Symbol::new(env, "WhitelistDeleted"), fund_id, entry),
            (slot,),
        );
    }

    pub fn payback_registered(env: &Env, fund_id: u64, amount: i128, payback_total: i128) {
        env.events().publish(
            (Symbol::new(env, "PaybackRegistered"), fund_id),
            (amount, payback_total),
        );
    }

    pub fn payback_withdrawn(env: &Env, fund_id: u64, holder: Address, amount: i128) {
        env.events().publish(
            (Symbol::new(env, "PaybackWithdrawn"), fund_id, holder),
            (amount,),
        );
    }
}
