//! In-process local cluster.
//!
//! A [`LocalValidator`] wraps a Soroban test `Env` and plays the role of a
//! local test validator: programs are deployed into it by name, transactions
//! are verified against their fee payer and executed, and every processed
//! transaction advances the ledger by one. Account names belong to the first
//! wallet that signs for them, and a call only carries authorization for the
//! account its fee payer owns. Validators register under their
//! endpoint on the current thread; a [`Connection`] to an endpoint with no
//! running validator fails with [`ClusterError::Unreachable`].

use crate::config::{ProgramKind, WorkspaceConfig};
use crate::error::{ClusterError, HarnessError, Result};
use crate::transaction::{FundKind, Instruction, Outcome, Receipt, SignedTransaction, TransactionSignature};
use crate::wallet;
use rand::RngCore as _;
use soroban_sdk::testutils::{Address as _, Ledger as _, MockAuth, MockAuthInvoke};
use soroban_sdk::{token, Address, Env, IntoVal, Val};
use squifi_fund::{FundContract, FundContractClient, FundError};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Default endpoint of the local validator.
pub const LOCALNET_URL: &str = "http://127.0.0.1:8899";

/// Transactions built against a ledger older than this are rejected.
pub const MAX_LEDGER_AGE: u32 = 150;

/// Seconds the ledger clock advances per processed transaction.
const LEDGER_CLOSE_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    Localnet,
    Custom(String),
}

impl Cluster {
    pub fn url(&self) -> &str {
        match self {
            Cluster::Localnet => LOCALNET_URL,
            Cluster::Custom(url) => url,
        }
    }

    /// Key used for this cluster in the workspace `[programs.<name>]` tables.
    pub fn name(&self) -> String {
        match self {
            Cluster::Localnet => "localnet".to_string(),
            Cluster::Custom(url) => url.clone(),
        }
    }
}

impl FromStr for Cluster {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "localnet" | "l" => Ok(Cluster::Localnet),
            url if url == LOCALNET_URL => Ok(Cluster::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Cluster::Custom(url.to_string()))
            }
            other => Err(HarnessError::config(format!("unknown cluster `{other}`"))),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// Deployment metadata for one program.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub name: String,
    pub kind: ProgramKind,
    pub program_id: String,
    pub ledger: u32,
    address: Address,
}

/// Fund account state as returned to clients.
#[derive(Debug, Clone, PartialEq)]
pub struct FundAccount {
    pub open: bool,
    pub fund_type: FundKind,
    /// Account name of the owner, if the validator knows it.
    pub owner: Option<String>,
    pub max_balance: i128,
    pub balance: i128,
    pub shares: i128,
    pub payback_total: i128,
}

struct State {
    programs: BTreeMap<String, Deployment>,
    accounts: BTreeMap<String, Address>,
    /// account name -> pubkey of the wallet that owns it
    signers: BTreeMap<String, String>,
    tokens: BTreeMap<String, Address>,
    receipts: HashMap<TransactionSignature, Receipt>,
}

pub struct LocalValidator {
    endpoint: String,
    env: Env,
    token_admin: Address,
    state: RefCell<State>,
}

thread_local! {
    static VALIDATORS: RefCell<HashMap<String, Rc<LocalValidator>>> = RefCell::new(HashMap::new());
}

impl LocalValidator {
    /// Boot a validator and register it under `cluster`'s endpoint.
    pub fn start(cluster: &Cluster, config: &WorkspaceConfig) -> Result<Rc<Self>> {
        let endpoint = cluster.url().to_string();
        if VALIDATORS.with(|v| v.borrow().contains_key(&endpoint)) {
            return Err(HarnessError::config(format!(
                "a validator is already running at {endpoint}"
            )));
        }

        let env = Env::default();
        env.ledger()
            .set_sequence_number(config.test.startup_ledger.unwrap_or(1));

        let token_admin = Address::generate(&env);
        let validator = Rc::new(Self {
            endpoint: endpoint.clone(),
            env,
            token_admin,
            state: RefCell::new(State {
                programs: BTreeMap::new(),
                accounts: BTreeMap::new(),
                signers: BTreeMap::new(),
                tokens: BTreeMap::new(),
                receipts: HashMap::new(),
            }),
        });

        VALIDATORS.with(|v| v.borrow_mut().insert(endpoint.clone(), validator.clone()));
        tracing::info!(%endpoint, ledger = validator.latest_ledger(), "local validator started");
        Ok(validator)
    }

    /// Unregister the validator. Connections to its endpoint become unreachable.
    pub fn shutdown(&self) {
        VALIDATORS.with(|v| v.borrow_mut().remove(&self.endpoint));
        tracing::info!(endpoint = %self.endpoint, "local validator stopped");
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn latest_ledger(&self) -> u32 {
        self.env.ledger().sequence()
    }

    /// Deploy a program under `name`. Returns its program id.
    pub fn deploy(&self, name: &str, kind: ProgramKind) -> Result<String> {
        let mut state = self.state.borrow_mut();
        if state.programs.contains_key(name) {
            return Err(HarnessError::config(format!("program `{name}` already deployed")));
        }

        let address = match kind {
            ProgramKind::Fund => self.env.register(FundContract, ()),
        };
        let mut key = [0u8; 32];
        rand::rng().fill_bytes(&mut key);
        let deployment = Deployment {
            name: name.to_string(),
            kind,
            program_id: bs58::encode(key).into_string(),
            ledger: self.latest_ledger(),
            address,
        };
        let program_id = deployment.program_id.clone();
        state.programs.insert(name.to_string(), deployment);

        tracing::info!(program = name, %program_id, "deployed program");
        Ok(program_id)
    }

    pub fn deployments(&self) -> Vec<Deployment> {
        self.state.borrow().programs.values().cloned().collect()
    }

    pub fn deployment(&self, name: &str) -> std::result::Result<Deployment, ClusterError> {
        self.state
            .borrow()
            .programs
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::ProgramNotDeployed(name.to_string()))
    }

    /// Address behind an account name, created on first use.
    pub fn account(&self, name: &str) -> Address {
        let mut state = self.state.borrow_mut();
        state
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| Address::generate(&self.env))
            .clone()
    }

    /// Give `name` to the wallet with `pubkey`. Names are otherwise claimed
    /// by the first fee payer whose transaction signs for them.
    pub fn bind_account(&self, name: &str, pubkey: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.signers.get(name) {
            Some(owner) if owner != pubkey => Err(HarnessError::config(format!(
                "account `{name}` already belongs to {owner}"
            ))),
            _ => {
                state.signers.insert(name.to_string(), pubkey.to_string());
                Ok(())
            }
        }
    }

    /// Pubkey of the wallet that owns `name`, if any.
    pub fn signer_of(&self, name: &str) -> Option<String> {
        self.state.borrow().signers.get(name).cloned()
    }

    fn may_sign(&self, name: &str, pubkey: &str) -> bool {
        self.state
            .borrow()
            .signers
            .get(name)
            .map_or(true, |owner| owner == pubkey)
    }

    fn account_name(&self, address: &Address) -> Option<String> {
        self.state
            .borrow()
            .accounts
            .iter()
            .find(|(_, a)| *a == address)
            .map(|(name, _)| name.clone())
    }

    /// Create a token the validator can mint.
    pub fn create_token(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.tokens.contains_key(name) {
            return Err(HarnessError::config(format!("token `{name}` already exists")));
        }
        let sac = self
            .env
            .register_stellar_asset_contract_v2(self.token_admin.clone());
        state.tokens.insert(name.to_string(), sac.address());
        tracing::debug!(token = name, "created token");
        Ok(())
    }

    fn token(&self, name: &str) -> std::result::Result<Address, ClusterError> {
        self.state
            .borrow()
            .tokens
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::UnknownToken(name.to_string()))
    }

    /// Mint `amount` of `token` to `account`.
    pub fn airdrop(&self, account: &str, token: &str, amount: i128) -> Result<()> {
        let token = self.token(token)?;
        let to = self.account(account);
        // minting is signed by the token admin, which the validator holds
        self.env.mock_all_auths();
        token::StellarAssetClient::new(&self.env, &token).mint(&to, &amount);
        Ok(())
    }

    pub fn token_balance(&self, account: &str, token: &str) -> Result<i128> {
        let token = self.token(token)?;
        let of = self.account(account);
        Ok(token::Client::new(&self.env, &token).balance(&of))
    }

    /// Token held by a program's vault.
    pub fn vault_balance(&self, program: &str, token: &str) -> Result<i128> {
        let token = self.token(token)?;
        let deployment = self.deployment(program)?;
        Ok(token::Client::new(&self.env, &token).balance(&deployment.address))
    }

    pub fn receipt(&self, signature: &TransactionSignature) -> Option<Receipt> {
        self.state.borrow().receipts.get(signature).cloned()
    }

    /// Verify, execute and record a transaction.
    pub fn process(&self, signed: &SignedTransaction) -> std::result::Result<TransactionSignature, ClusterError> {
        let tx = &signed.transaction;
        let signature = &signed.signature;

        let message = serde_json::to_vec(tx)
            .map_err(|_| ClusterError::InvalidSignature(tx.fee_payer.clone()))?;
        let sig_bytes = signature
            .to_bytes()
            .ok_or_else(|| ClusterError::InvalidSignature(tx.fee_payer.clone()))?;
        if !wallet::verify(&tx.fee_payer, &message, &sig_bytes) {
            return Err(ClusterError::InvalidSignature(tx.fee_payer.clone()));
        }

        let current = self.latest_ledger();
        if tx.recent_ledger > current || current - tx.recent_ledger > MAX_LEDGER_AGE {
            return Err(ClusterError::LedgerExpired {
                recent: tx.recent_ledger,
                current,
            });
        }
        if self.state.borrow().receipts.contains_key(signature) {
            return Err(ClusterError::AlreadyProcessed(signature.to_string()));
        }

        let deployment = self
            .deployments()
            .into_iter()
            .find(|d| d.program_id == tx.program_id)
            .ok_or_else(|| ClusterError::ProgramNotDeployed(tx.program_id.clone()))?;

        let method = tx.instruction.method();
        self.authorize(&deployment, &tx.instruction, &tx.fee_payer)?;
        let outcome = self.execute(&deployment, &tx.instruction)?;
        if let Some(account) = tx.instruction.signer() {
            self.state
                .borrow_mut()
                .signers
                .entry(account.to_string())
                .or_insert_with(|| tx.fee_payer.clone());
        }

        let receipt = Receipt {
            signature: signature.clone(),
            ledger: current,
            program: deployment.name.clone(),
            method,
            outcome,
        };
        self.state
            .borrow_mut()
            .receipts
            .insert(signature.clone(), receipt);
        self.advance();

        tracing::debug!(program = %deployment.name, method, %signature, ledger = current, "processed transaction");
        Ok(signature.clone())
    }

    /// Authorize the next call for the instruction's signing account, and only
    /// when `fee_payer` owns it. Otherwise the call runs without authorization
    /// and any `require_auth` in the program aborts it.
    fn authorize(
        &self,
        deployment: &Deployment,
        instruction: &Instruction,
        fee_payer: &str,
    ) -> std::result::Result<(), ClusterError> {
        let Some(signer) = instruction.signer() else {
            self.env.mock_auths(&[]);
            return Ok(());
        };
        if !self.may_sign(signer, fee_payer) {
            tracing::debug!(account = signer, %fee_payer, "fee payer does not own signing account");
            self.env.mock_auths(&[]);
            return Ok(());
        }

        let env = &self.env;
        let contract = &deployment.address;
        let address = self.account(signer);
        // (token, amount) the signer sends to the vault inside the call
        let (args, transfer): (soroban_sdk::Vec<Val>, Option<(u64, i128)>) = match instruction {
            Instruction::Initialize => (soroban_sdk::Vec::new(env), None),
            Instruction::CreateFund {
                authority,
                token,
                max_balance,
                fund_type,
                ..
            } => {
                let fund_type: squifi_fund::FundType = (*fund_type).into();
                let args = (
                    address.clone(),
                    self.account(authority),
                    self.token(token)?,
                    *max_balance,
                    fund_type,
                )
                    .into_val(env);
                (args, None)
            }
            Instruction::Deposit { fund_id, amount, .. } => {
                ((*fund_id, address.clone(), *amount).into_val(env), Some((*fund_id, *amount)))
            }
            Instruction::RegisterPayback { fund_id, amount, .. } => {
                ((*fund_id, address.clone(), *amount).into_val(env), Some((*fund_id, *amount)))
            }
            Instruction::Withdraw { fund_id, amount, .. }
            | Instruction::PaybackWithdraw { fund_id, amount, .. } => {
                ((*fund_id, address.clone(), *amount).into_val(env), None)
            }
            Instruction::Close { fund_id, .. } => ((*fund_id, address.clone()).into_val(env), None),
            Instruction::WhitelistAdd { fund_id, entry, .. }
            | Instruction::WhitelistDelete { fund_id, entry, .. } => {
                ((*fund_id, address.clone(), self.account(entry)).into_val(env), None)
            }
        };

        let transfers: Vec<(Address, soroban_sdk::Vec<Val>)> = transfer
            .and_then(|(fund_id, amount)| {
                let client = FundContractClient::new(env, contract);
                match client.try_get_fund(&fund_id) {
                    Ok(Ok(fund)) => Some((fund.token, (address.clone(), contract.clone(), amount).into_val(env))),
                    _ => None,
                }
            })
            .into_iter()
            .collect();
        let sub_invokes: Vec<MockAuthInvoke> = transfers
            .iter()
            .map(|(token, args)| MockAuthInvoke {
                contract: token,
                fn_name: "transfer",
                args: args.clone(),
                sub_invokes: &[],
            })
            .collect();

        env.mock_auths(&[MockAuth {
            address: &address,
            invoke: &MockAuthInvoke {
                contract,
                fn_name: instruction.method(),
                args,
                sub_invokes: &sub_invokes,
            },
        }]);
        Ok(())
    }

    fn advance(&self) {
        let ledger = self.env.ledger();
        ledger.set_sequence_number(ledger.sequence() + 1);
        ledger.set_timestamp(ledger.timestamp() + LEDGER_CLOSE_SECS);
    }

    fn execute(&self, deployment: &Deployment, instruction: &Instruction) -> std::result::Result<Outcome, ClusterError> {
        let client = FundContractClient::new(&self.env, &deployment.address);
        let finish = |outcome| settle(&deployment.name, instruction.method(), outcome);

        let outcome = match instruction {
            Instruction::Initialize => {
                let result = client.try_initialize();
                finish(result.map(|r| r.map(|_| Outcome::Unit).map_err(|_| ())))?
            }
            Instruction::CreateFund {
                owner,
                authority,
                token,
                max_balance,
                fund_type,
            } => {
                let token = self.token(token)?;
                let fund_type: squifi_fund::FundType = (*fund_type).into();
                let result = client.try_create_fund(
                    &self.account(owner),
                    &self.account(authority),
                    &token,
                    max_balance,
                    &fund_type,
                );
                finish(result.map(|r| r.map(Outcome::FundId).map_err(|_| ())))?
            }
            Instruction::Deposit {
                fund_id,
                depositor,
                amount,
            } => {
                let result = client.try_deposit(fund_id, &self.account(depositor), amount);
                finish(result.map(|r| r.map(|_| Outcome::Unit).map_err(|_| ())))?
            }
            Instruction::Withdraw {
                fund_id,
                owner,
                amount,
            } => {
                let result = client.try_withdraw(fund_id, &self.account(owner), amount);
                finish(result.map(|r| r.map(|_| Outcome::Unit).map_err(|_| ())))?
            }
            Instruction::Close { fund_id, owner } => {
                let result = client.try_close(fund_id, &self.account(owner));
                finish(result.map(|r| r.map(|_| Outcome::Unit).map_err(|_| ())))?
            }
            Instruction::WhitelistAdd {
                fund_id,
                owner,
                entry,
            } => {
                let result =
                    client.try_whitelist_add(fund_id, &self.account(owner), &self.account(entry));
                finish(result.map(|r| r.map(Outcome::Slot).map_err(|_| ())))?
            }
            Instruction::WhitelistDelete {
                fund_id,
                owner,
                entry,
            } => {
                let result = client.try_whitelist_delete(
                    fund_id,
                    &self.account(owner),
                    &self.account(entry),
                );
                finish(result.map(|r| r.map(Outcome::Slot).map_err(|_| ())))?
            }
            Instruction::RegisterPayback {
                fund_id,
                owner,
                amount,
            } => {
                let result = client.try_register_payback(fund_id, &self.account(owner), amount);
                finish(result.map(|r| r.map(|_| Outcome::Unit).map_err(|_| ())))?
            }
            Instruction::PaybackWithdraw {
                fund_id,
                holder,
                amount,
            } => {
                let result = client.try_payback_withdraw(fund_id, &self.account(holder), amount);
                finish(result.map(|r| r.map(|_| Outcome::Unit).map_err(|_| ())))?
            }
        };
        Ok(outcome)
    }

    pub fn fetch_fund(&self, program: &str, fund_id: u64) -> std::result::Result<FundAccount, ClusterError> {
        let deployment = self.deployment(program)?;
        let client = FundContractClient::new(&self.env, &deployment.address);
        let fund = settle(program, "get_fund", client.try_get_fund(&fund_id).map(|r| r.map_err(|_| ())))?;
        Ok(FundAccount {
            open: fund.open,
            fund_type: fund.fund_type.into(),
            owner: self.account_name(&fund.owner),
            max_balance: fund.max_balance,
            balance: fund.balance,
            shares: fund.shares,
            payback_total: fund.payback_total,
        })
    }

    pub fn shares_of(&self, program: &str, fund_id: u64, holder: &str) -> std::result::Result<i128, ClusterError> {
        let deployment = self.deployment(program)?;
        let client = FundContractClient::new(&self.env, &deployment.address);
        Ok(client.shares_of(&fund_id, &self.account(holder)))
    }

    pub fn is_whitelisted(&self, program: &str, fund_id: u64, entry: &str) -> std::result::Result<bool, ClusterError> {
        let deployment = self.deployment(program)?;
        let client = FundContractClient::new(&self.env, &deployment.address);
        Ok(client.is_whitelisted(&fund_id, &self.account(entry)))
    }

    pub fn payback_owed(&self, program: &str, fund_id: u64, holder: &str) -> std::result::Result<i128, ClusterError> {
        let deployment = self.deployment(program)?;
        let client = FundContractClient::new(&self.env, &deployment.address);
        let result = client.try_payback_owed(&fund_id, &self.account(holder));
        settle(program, "payback_owed", result.map(|r| r.map_err(|_| ())))
    }
}

/// Map a generated client `try_` result onto a cluster outcome. Program errors
/// keep their code; traps and conversion failures abort the call.
fn settle<T, I>(
    program: &str,
    method: &str,
    outcome: std::result::Result<std::result::Result<T, ()>, std::result::Result<FundError, I>>,
) -> std::result::Result<T, ClusterError> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(ClusterError::Rejected {
            program: program.to_string(),
            method: method.to_string(),
            code: err as u32,
        }),
        Ok(Err(())) | Err(Err(_)) => Err(ClusterError::Aborted {
            program: program.to_string(),
            method: method.to_string(),
        }),
    }
}

/// Handle to a cluster endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    endpoint: String,
}

impl Connection {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The validator serving this endpoint, if one is running.
    pub fn validator(&self) -> std::result::Result<Rc<LocalValidator>, ClusterError> {
        VALIDATORS
            .with(|v| v.borrow().get(&self.endpoint).cloned())
            .ok_or_else(|| ClusterError::Unreachable(self.endpoint.clone()))
    }

    pub fn latest_ledger(&self) -> std::result::Result<u32, ClusterError> {
        Ok(self.validator()?.latest_ledger())
    }

    pub fn program_id(&self, name: &str) -> std::result::Result<String, ClusterError> {
        Ok(self.validator()?.deployment(name)?.program_id)
    }

    pub fn send_transaction(&self, signed: &SignedTransaction) -> std::result::Result<TransactionSignature, ClusterError> {
        self.validator()?.process(signed)
    }

    pub fn get_transaction(&self, signature: &TransactionSignature) -> std::result::Result<Receipt, ClusterError> {
        self.validator()?
            .receipt(signature)
            .ok_or_else(|| ClusterError::UnknownTransaction(signature.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;
    use crate::wallet::Wallet;

    fn validator(endpoint: &str) -> Rc<LocalValidator> {
        let cluster = Cluster::Custom(endpoint.to_string());
        LocalValidator::start(&cluster, &WorkspaceConfig::default()).unwrap()
    }

    fn initialize(program_id: &str, wallet: &Wallet, recent_ledger: u32) -> SignedTransaction {
        Transaction {
            program_id: program_id.to_string(),
            fee_payer: wallet.pubkey(),
            recent_ledger,
            instruction: Instruction::Initialize,
        }
        .sign(wallet)
        .unwrap()
    }

    #[test]
    fn parses_cluster_names() {
        assert_eq!("localnet".parse::<Cluster>().unwrap(), Cluster::Localnet);
        assert_eq!("l".parse::<Cluster>().unwrap(), Cluster::Localnet);
        assert_eq!(LOCALNET_URL.parse::<Cluster>().unwrap(), Cluster::Localnet);
        assert_eq!(
            "http://10.0.0.1:8000".parse::<Cluster>().unwrap(),
            Cluster::Custom("http://10.0.0.1:8000".to_string())
        );
        assert!("devnet?".parse::<Cluster>().is_err());
    }

    #[test]
    fn connection_without_validator_is_unreachable() {
        let connection = Connection::new("http://127.0.0.1:1");
        assert_eq!(
            connection.latest_ledger(),
            Err(ClusterError::Unreachable("http://127.0.0.1:1".to_string()))
        );
    }

    #[test]
    fn shutdown_makes_endpoint_unreachable() {
        let v = validator("http://cluster.test:1");
        let connection = Connection::new(v.endpoint());
        assert!(connection.latest_ledger().is_ok());

        v.shutdown();
        assert!(matches!(
            connection.latest_ledger(),
            Err(ClusterError::Unreachable(_))
        ));
    }

    #[test]
    fn second_validator_on_same_endpoint_is_refused() {
        let v = validator("http://cluster.test:2");
        let again = LocalValidator::start(
            &Cluster::Custom("http://cluster.test:2".to_string()),
            &WorkspaceConfig::default(),
        );
        assert!(again.is_err());
        v.shutdown();
    }

    #[test]
    fn processed_transaction_advances_ledger_and_is_recorded() {
        let v = validator("http://cluster.test:3");
        let program_id = v.deploy("squifi", ProgramKind::Fund).unwrap();
        let wallet = Wallet::generate();
        let before = v.latest_ledger();

        let signed = initialize(&program_id, &wallet, before);
        let sig = v.process(&signed).unwrap();

        assert_eq!(v.latest_ledger(), before + 1);
        let receipt = v.receipt(&sig).unwrap();
        assert_eq!(receipt.method, "initialize");
        assert_eq!(receipt.ledger, before);
        assert_eq!(receipt.outcome, Outcome::Unit);

        assert_eq!(
            v.process(&signed),
            Err(ClusterError::AlreadyProcessed(sig.to_string()))
        );
        v.shutdown();
    }

    #[test]
    fn tampered_transaction_fails_signature_check() {
        let v = validator("http://cluster.test:4");
        let program_id = v.deploy("squifi", ProgramKind::Fund).unwrap();
        let wallet = Wallet::generate();

        let mut signed = initialize(&program_id, &wallet, v.latest_ledger());
        signed.transaction.fee_payer = Wallet::generate().pubkey();
        assert!(matches!(
            v.process(&signed),
            Err(ClusterError::InvalidSignature(_))
        ));
        v.shutdown();
    }

    #[test]
    fn stale_and_future_ledgers_are_rejected() {
        let config = WorkspaceConfig {
            test: crate::config::TestConfig {
                startup_ledger: Some(500),
            },
            ..WorkspaceConfig::default()
        };
        let v = LocalValidator::start(&Cluster::Custom("http://cluster.test:5".to_string()), &config)
            .unwrap();
        let program_id = v.deploy("squifi", ProgramKind::Fund).unwrap();
        let wallet = Wallet::generate();

        let stale = initialize(&program_id, &wallet, 500 - MAX_LEDGER_AGE - 1);
        assert!(matches!(
            v.process(&stale),
            Err(ClusterError::LedgerExpired { .. })
        ));
        let future = initialize(&program_id, &wallet, 501);
        assert!(matches!(
            v.process(&future),
            Err(ClusterError::LedgerExpired { .. })
        ));
        let oldest_allowed = initialize(&program_id, &wallet, 500 - MAX_LEDGER_AGE);
        assert!(v.process(&oldest_allowed).is_ok());
        v.shutdown();
    }

    #[test]
    fn unknown_program_id_is_not_deployed() {
        let v = validator("http://cluster.test:6");
        let wallet = Wallet::generate();
        let signed = initialize("missing", &wallet, v.latest_ledger());
        assert_eq!(
            v.process(&signed),
            Err(ClusterError::ProgramNotDeployed("missing".to_string()))
        );
        v.shutdown();
    }

    #[test]
    fn program_error_keeps_its_code() {
        let v = validator("http://cluster.test:7");
        let program_id = v.deploy("squifi", ProgramKind::Fund).unwrap();
        v.create_token("usdc").unwrap();
        let wallet = Wallet::generate();

        // create_fund before initialize
        let signed = Transaction {
            program_id,
            fee_payer: wallet.pubkey(),
            recent_ledger: v.latest_ledger(),
            instruction: Instruction::CreateFund {
                owner: "owner".to_string(),
                authority: "owner".to_string(),
                token: "usdc".to_string(),
                max_balance: 100,
                fund_type: FundKind::FundMe,
            },
        }
        .sign(&wallet)
        .unwrap();

        assert_eq!(
            v.process(&signed),
            Err(ClusterError::Rejected {
                program: "squifi".to_string(),
                method: "create_fund".to_string(),
                code: FundError::NotInitialized as u32,
            })
        );
        v.shutdown();
    }

    #[test]
    fn bound_accounts_keep_their_owner() {
        let v = validator("http://cluster.test:9");
        let a = Wallet::generate();
        let b = Wallet::generate();

        v.bind_account("owner", &a.pubkey()).unwrap();
        assert!(v.bind_account("owner", &a.pubkey()).is_ok());
        assert!(v.bind_account("owner", &b.pubkey()).is_err());
        assert_eq!(v.signer_of("owner"), Some(a.pubkey()));
        assert_eq!(v.signer_of("alice"), None);
        v.shutdown();
    }

    #[test]
    fn signing_for_another_wallets_account_aborts() {
        let v = validator("http://cluster.test:10");
        let program_id = v.deploy("squifi", ProgramKind::Fund).unwrap();
        v.create_token("usdc").unwrap();
        let owner = Wallet::generate();
        let other = Wallet::generate();
        let create_fund = |wallet: &Wallet| {
            Transaction {
                program_id: program_id.clone(),
                fee_payer: wallet.pubkey(),
                recent_ledger: v.latest_ledger(),
                instruction: Instruction::CreateFund {
                    owner: "owner".to_string(),
                    authority: "owner".to_string(),
                    token: "usdc".to_string(),
                    max_balance: 100,
                    fund_type: FundKind::FundMe,
                },
            }
            .sign(wallet)
            .unwrap()
        };

        v.process(&initialize(&program_id, &owner, v.latest_ledger()))
            .unwrap();
        v.process(&create_fund(&owner)).unwrap();
        assert_eq!(v.signer_of("owner"), Some(owner.pubkey()));

        assert_eq!(
            v.process(&create_fund(&other)),
            Err(ClusterError::Aborted {
                program: "squifi".to_string(),
                method: "create_fund".to_string(),
            })
        );
        assert_eq!(v.signer_of("owner"), Some(owner.pubkey()));
        v.shutdown();
    }

    #[test]
    fn airdrop_mints_to_named_accounts() {
        let v = validator("http://cluster.test:8");
        v.create_token("usdc").unwrap();
        v.airdrop("alice", "usdc", 1_000).unwrap();

        assert_eq!(v.token_balance("alice", "usdc").unwrap(), 1_000);
        assert_eq!(v.token_balance("bob", "usdc").unwrap(), 0);
        assert!(v.airdrop("alice", "btc", 1).is_err());
        v.shutdown();
    }
}
