use soroban_sdk::{contracttype, Address, Env, I256};

use crate::errors::FundError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FundType {
    /// Donations, similar to a gofundme. Deposits do not issue shares.
    FundMe,
    /// Deposits issue shares 1:1. A private raise only accepts whitelisted depositors.
    Raise(bool),
}

impl Default for FundType {
    fn default() -> Self {
        FundType::FundMe
    }
}

impl FundType {
    pub fn is_raise(&self) -> bool {
        matches!(self, FundType::Raise(_))
    }

    pub fn is_private(&self) -> bool {
        matches!(self, FundType::Raise(true))
    }
}

/// A fund account. The owner has the right to withdraw all or some of the
/// balance once the fund is closed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fund {
    /// open defines if a fund accepts deposits
    pub open: bool,
    pub fund_type: FundType,
    pub owner: Address,
    /// Owner delegate recorded at creation
    pub authority: Address,
    /// Token held in the vault
    pub token: Address,
    pub max_balance: i128,
    pub balance: i128,
    /// Increase with deposits into raise funds, never decrease on withdraw
    pub shares: i128,
    pub payback_total: i128,
    pub created_ledger: u32,
}

impl Fund {
    pub fn new(
        owner: Address,
        authority: Address,
        token: Address,
        max_balance: i128,
        fund_type: FundType,
        created_ledger: u32,
    ) -> Self {
        Self {
            open: true,
            fund_type,
            owner,
            authority,
            token,
            max_balance,
            balance: 0,
            shares: 0,
            payback_total: 0,
            created_ledger,
        }
    }

    /// Room left before the fund reaches `max_balance`.
    pub fn remaining(&self) -> i128 {
        self.max_balance - self.balance
    }

    /// Adds the deposit to the balance, and to the shares for raise funds.
    pub fn add(&mut self, amount: i128) {
        self.balance += amount;
        if self.fund_type.is_raise() {
            self.shares += amount;
        }
    }

    pub fn deduct(&mut self, amount: i128) {
        self.balance -= amount;
    }

    /// Called when the owner starts the withdrawal process.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn add_payback(&mut self, amount: i128) -> Result<(), FundError> {
        self.payback_total = self
            .payback_total
            .checked_add(amount)
            .ok_or(FundError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Total payback a holder of `holder_shares` is entitled to, before claims.
    /// The product is taken in 256 bits when it does not fit in an i128.
    pub fn payback_entitlement(&self, env: &Env, holder_shares: i128) -> Result<i128, FundError> {
        if self.shares == 0 {
            return Ok(0);
        }
        if let Some(product) = holder_shares.checked_mul(self.payback_total) {
            return Ok(product / self.shares);
        }
        I256::from_i128(env, holder_shares)
            .mul(&I256::from_i128(env, self.payback_total))
            .div(&I256::from_i128(env, self.shares))
            .to_i128()
            .ok_or(FundError::ArithmeticOverflow)
    }
}
