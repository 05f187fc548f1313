// fund/src/errors.rs
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FundError {
    NotInitialized = 1,          // initialize() has not been called
    Unauthorized = 2,            // Caller is not the fund owner
    FundNotFound = 3,            // No fund under this id
    FundClosed = 4,              // Fund no longer accepts deposits
    FundOpen = 5,                // Fund must be closed first
    FundBalanceOverflow = 6,     // Deposit would exceed max_balance
    InvalidAmount = 7,           // Zero or negative amount
    InsufficientBalance = 8,     // Withdraw larger than the fund balance
    InvalidFund = 9,             // Operation needs a raise fund with shares
    WhitelistFull = 10,          // All whitelist slots are taken
    PubKeyAlreadyExists = 11,    // Entry already whitelisted
    WhitelistNotFound = 12,      // Entry not in the whitelist
    NotWhitelisted = 13,         // Depositor not allowed in a private raise
    WithdrawalSizeOverflow = 14, // Payback claim larger than what is owed
    ArithmeticOverflow = 15,     // Payback total or entitlement out of i128 range
}
