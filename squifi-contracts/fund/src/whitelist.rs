use soroban_sdk::{Address, Vec};

use crate::errors::FundError;

/// Addresses allowed to deposit into a private raise.
pub struct Whitelist {
    entries: Vec<Address>,
}

impl Whitelist {
    /// Number of entries a whitelist can hold.
    pub const LEN: u32 = 50;

    pub fn new(entries: Vec<Address>) -> Self {
        Self { entries }
    }

    pub fn into_entries(self) -> Vec<Address> {
        self.entries
    }

    pub fn len(&self) -> u32 {
        self.entries.len()
    }

    pub fn contains(&self, entry: &Address) -> bool {
        self.entries.contains(entry)
    }

    /// Appends `entry`, returning the slot it was stored at.
    pub fn push(&mut self, entry: Address) -> Result<u32, FundError> {
        if self.contains(&entry) {
            return Err(FundError::PubKeyAlreadyExists);
        }
        if self.entries.len() >= Self::LEN {
            return Err(FundError::WhitelistFull);
        }
        self.entries.push_back(entry);
        Ok(self.entries.len() - 1)
    }

    /// Removes `entry`, returning the slot it occupied.
    pub fn delete(&mut self, entry: &Address) -> Result<u32, FundError> {
        let idx = self
            .entries
            .first_index_of(entry)
            .ok_or(FundError::WhitelistNotFound)?;
        self.entries.remove(idx);
        Ok(idx)
    }
}
