use crate::error::Result;
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fund flavour as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundKind {
    FundMe,
    Raise { private: bool },
}

impl From<FundKind> for squifi_fund::FundType {
    fn from(kind: FundKind) -> Self {
        match kind {
            FundKind::FundMe => squifi_fund::FundType::FundMe,
            FundKind::Raise { private } => squifi_fund::FundType::Raise(private),
        }
    }
}

impl From<squifi_fund::FundType> for FundKind {
    fn from(fund_type: squifi_fund::FundType) -> Self {
        match fund_type {
            squifi_fund::FundType::FundMe => FundKind::FundMe,
            squifi_fund::FundType::Raise(private) => FundKind::Raise { private },
        }
    }
}

/// One program call. Accounts and tokens are referenced by name and resolved
/// by the cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Instruction {
    Initialize,
    CreateFund {
        owner: String,
        authority: String,
        token: String,
        max_balance: i128,
        fund_type: FundKind,
    },
    Deposit {
        fund_id: u64,
        depositor: String,
        amount: i128,
    },
    Withdraw {
        fund_id: u64,
        owner: String,
        amount: i128,
    },
    Close {
        fund_id: u64,
        owner: String,
    },
    WhitelistAdd {
        fund_id: u64,
        owner: String,
        entry: String,
    },
    WhitelistDelete {
        fund_id: u64,
        owner: String,
        entry: String,
    },
    RegisterPayback {
        fund_id: u64,
        owner: String,
        amount: i128,
    },
    PaybackWithdraw {
        fund_id: u64,
        holder: String,
        amount: i128,
    },
}

impl Instruction {
    pub fn method(&self) -> &'static str {
        match self {
            Instruction::Initialize => "initialize",
            Instruction::CreateFund { .. } => "create_fund",
            Instruction::Deposit { .. } => "deposit",
            Instruction::Withdraw { .. } => "withdraw",
            Instruction::Close { .. } => "close",
            Instruction::WhitelistAdd { .. } => "whitelist_add",
            Instruction::WhitelistDelete { .. } => "whitelist_delete",
            Instruction::RegisterPayback { .. } => "register_payback",
            Instruction::PaybackWithdraw { .. } => "payback_withdraw",
        }
    }

    /// Account whose authorization the program call requires.
    pub fn signer(&self) -> Option<&str> {
        match self {
            Instruction::Initialize => None,
            Instruction::CreateFund { owner, .. }
            | Instruction::Withdraw { owner, .. }
            | Instruction::Close { owner, .. }
            | Instruction::WhitelistAdd { owner, .. }
            | Instruction::WhitelistDelete { owner, .. }
            | Instruction::RegisterPayback { owner, .. } => Some(owner),
            Instruction::Deposit { depositor, .. } => Some(depositor),
            Instruction::PaybackWithdraw { holder, .. } => Some(holder),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub program_id: String,
    pub fee_payer: String,
    /// Ledger the transaction was built against; bounds its lifetime.
    pub recent_ledger: u32,
    pub instruction: Instruction,
}

impl Transaction {
    /// Bytes covered by the signature.
    pub fn message(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn sign(self, wallet: &Wallet) -> Result<SignedTransaction> {
        let signature = TransactionSignature::from_bytes(&wallet.sign(&self.message()?));
        Ok(SignedTransaction {
            transaction: self,
            signature,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: TransactionSignature,
}

/// Base58 encoded fee payer signature. Identifies the transaction on the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionSignature(String);

impl TransactionSignature {
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        bs58::decode(&self.0).into_vec().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a processed transaction returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unit,
    FundId(u64),
    Slot(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub signature: TransactionSignature,
    pub ledger: u32,
    pub program: String,
    pub method: &'static str,
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(recent_ledger: u32) -> Transaction {
        Transaction {
            program_id: "prog".to_string(),
            fee_payer: "payer".to_string(),
            recent_ledger,
            instruction: Instruction::Initialize,
        }
    }

    #[test]
    fn signature_is_deterministic_per_message() {
        let wallet = Wallet::from_seed([1u8; 32]);
        let a = tx(5).sign(&wallet).unwrap();
        let b = tx(5).sign(&wallet).unwrap();
        let c = tx(6).sign(&wallet).unwrap();

        assert_eq!(a.signature, b.signature);
        assert_ne!(a.signature, c.signature);
        assert!(!a.signature.as_str().is_empty());
        assert_eq!(a.signature.to_bytes().map(|b| b.len()), Some(64));
    }

    #[test]
    fn message_names_the_method() {
        let deposit = Transaction {
            instruction: Instruction::Deposit {
                fund_id: 3,
                depositor: "alice".to_string(),
                amount: 250,
            },
            ..tx(1)
        };
        let text = String::from_utf8(deposit.message().unwrap()).unwrap();
        assert!(text.contains(r#""method":"deposit""#));
        assert_eq!(deposit.instruction.method(), "deposit");
    }

    #[test]
    fn fund_kind_maps_to_program_type() {
        let raise: squifi_fund::FundType = FundKind::Raise { private: true }.into();
        assert_eq!(raise, squifi_fund::FundType::Raise(true));
        assert_eq!(FundKind::from(squifi_fund::FundType::FundMe), FundKind::FundMe);
    }
}
