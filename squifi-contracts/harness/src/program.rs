//! Client handle for a deployed program.

use crate::cluster::FundAccount;
use crate::config::ProgramKind;
use crate::error::{HarnessError, Result};
use crate::provider::Provider;
use crate::transaction::{FundKind, Instruction, Outcome, Receipt, TransactionSignature};

#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    kind: ProgramKind,
    provider: Provider,
}

impl Program {
    pub(crate) fn new(name: String, kind: ProgramKind, provider: Provider) -> Self {
        Self {
            name,
            kind,
            provider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Id the program is deployed under on the provider's cluster.
    pub fn program_id(&self) -> Result<String> {
        Ok(self.provider.connection().program_id(&self.name)?)
    }

    /// Transaction builders, one per program method.
    pub fn rpc(&self) -> Rpc<'_> {
        Rpc { program: self }
    }

    pub fn receipt(&self, signature: &TransactionSignature) -> Result<Receipt> {
        Ok(self.provider.connection().get_transaction(signature)?)
    }

    /// Id of the fund created by a confirmed `create_fund` transaction.
    pub fn created_fund(&self, signature: &TransactionSignature) -> Result<u64> {
        match self.receipt(signature)?.outcome {
            Outcome::FundId(id) => Ok(id),
            _ => Err(HarnessError::UnexpectedOutcome(signature.to_string())),
        }
    }

    pub fn fetch_fund(&self, fund_id: u64) -> Result<FundAccount> {
        let validator = self.provider.connection().validator()?;
        Ok(validator.fetch_fund(&self.name, fund_id)?)
    }

    pub fn shares_of(&self, fund_id: u64, holder: &str) -> Result<i128> {
        let validator = self.provider.connection().validator()?;
        Ok(validator.shares_of(&self.name, fund_id, holder)?)
    }

    pub fn is_whitelisted(&self, fund_id: u64, entry: &str) -> Result<bool> {
        let validator = self.provider.connection().validator()?;
        Ok(validator.is_whitelisted(&self.name, fund_id, entry)?)
    }

    pub fn payback_owed(&self, fund_id: u64, holder: &str) -> Result<i128> {
        let validator = self.provider.connection().validator()?;
        Ok(validator.payback_owed(&self.name, fund_id, holder)?)
    }

    fn send(&self, instruction: Instruction) -> Result<TransactionSignature> {
        let program_id = self.program_id()?;
        self.provider.send(&program_id, instruction)
    }
}

/// Builds, signs and submits one transaction per call. Accounts and tokens
/// are named; the cluster resolves them.
pub struct Rpc<'a> {
    program: &'a Program,
}

impl Rpc<'_> {
    pub fn initialize(&self) -> Result<TransactionSignature> {
        self.program.send(Instruction::Initialize)
    }

    pub fn create_fund(
        &self,
        owner: &str,
        token: &str,
        max_balance: i128,
        fund_type: FundKind,
    ) -> Result<TransactionSignature> {
        self.program.send(Instruction::CreateFund {
            owner: owner.to_string(),
            authority: owner.to_string(),
            token: token.to_string(),
            max_balance,
            fund_type,
        })
    }

    pub fn deposit(&self, fund_id: u64, depositor: &str, amount: i128) -> Result<TransactionSignature> {
        self.program.send(Instruction::Deposit {
            fund_id,
            depositor: depositor.to_string(),
            amount,
        })
    }

    pub fn withdraw(&self, fund_id: u64, owner: &str, amount: i128) -> Result<TransactionSignature> {
        self.program.send(Instruction::Withdraw {
            fund_id,
            owner: owner.to_string(),
            amount,
        })
    }

    pub fn close(&self, fund_id: u64, owner: &str) -> Result<TransactionSignature> {
        self.program.send(Instruction::Close {
            fund_id,
            owner: owner.to_string(),
        })
    }

    pub fn whitelist_add(&self, fund_id: u64, owner: &str, entry: &str) -> Result<TransactionSignature> {
        self.program.send(Instruction::WhitelistAdd {
            fund_id,
            owner: owner.to_string(),
            entry: entry.to_string(),
        })
    }

    pub fn whitelist_delete(&self, fund_id: u64, owner: &str, entry: &str) -> Result<TransactionSignature> {
        self.program.send(Instruction::WhitelistDelete {
            fund_id,
            owner: owner.to_string(),
            entry: entry.to_string(),
        })
    }

    pub fn register_payback(&self, fund_id: u64, owner: &str, amount: i128) -> Result<TransactionSignature> {
        self.program.send(Instruction::RegisterPayback {
            fund_id,
            owner: owner.to_string(),
            amount,
        })
    }

    pub fn payback_withdraw(&self, fund_id: u64, holder: &str, amount: i128) -> Result<TransactionSignature> {
        self.program.send(Instruction::PaybackWithdraw {
            fund_id,
            holder: holder.to_string(),
            amount,
        })
    }
}
