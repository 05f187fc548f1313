//! Cluster connection plus the wallet that pays for transactions.
//!
//! One provider may be installed per thread with [`set_provider`]; program
//! clients built afterwards pick it up through [`provider`].

use crate::cluster::{Cluster, Connection};
use crate::config::WorkspaceConfig;
use crate::error::{HarnessError, Result};
use crate::transaction::{Instruction, Transaction, TransactionSignature};
use crate::wallet::Wallet;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Overrides the configured cluster.
pub const PROVIDER_URL_ENV: &str = "SQUIFI_PROVIDER_URL";
/// Overrides the configured wallet path.
pub const WALLET_ENV: &str = "SQUIFI_WALLET";

#[derive(Debug, Clone)]
pub struct Provider {
    connection: Connection,
    wallet: Wallet,
}

thread_local! {
    static PROVIDER: RefCell<Option<Provider>> = const { RefCell::new(None) };
}

impl Provider {
    pub fn new(connection: Connection, wallet: Wallet) -> Self {
        Self { connection, wallet }
    }

    /// Local cluster with a throwaway wallet.
    pub fn local() -> Self {
        Self::new(Connection::new(Cluster::Localnet.url()), Wallet::generate())
    }

    /// Build from the workspace file, letting `SQUIFI_PROVIDER_URL` and
    /// `SQUIFI_WALLET` override it.
    pub fn env(config: &WorkspaceConfig) -> Result<Self> {
        let cluster = std::env::var(PROVIDER_URL_ENV).ok();
        let wallet = std::env::var_os(WALLET_ENV).map(PathBuf::from);
        Self::configured(config, cluster.as_deref(), wallet.as_deref())
    }

    /// Build from the workspace file alone.
    pub fn from_config(config: &WorkspaceConfig) -> Result<Self> {
        Self::configured(config, None, None)
    }

    /// Build from the workspace file, with `cluster` and `wallet` taking
    /// precedence over its `[provider]` section.
    pub fn configured(config: &WorkspaceConfig, cluster: Option<&str>, wallet: Option<&Path>) -> Result<Self> {
        let cluster = match cluster {
            Some(url) => url.parse()?,
            None => config.cluster()?,
        };
        let wallet_path = match wallet {
            Some(path) => Some(crate::config::expand_home(path)),
            None => config.wallet_path(),
        };
        Self::from_parts(&cluster, wallet_path.as_deref())
    }

    fn from_parts(cluster: &Cluster, wallet: Option<&Path>) -> Result<Self> {
        let wallet = match wallet {
            Some(path) => Wallet::from_file(path)?,
            None => Wallet::generate(),
        };
        tracing::debug!(cluster = %cluster, payer = %wallet.pubkey(), "provider configured");
        Ok(Self::new(Connection::new(cluster.url()), wallet))
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Base58 public key of the fee payer.
    pub fn payer(&self) -> String {
        self.wallet.pubkey()
    }

    /// Sign `instruction` for `program_id` and submit it.
    pub fn send(&self, program_id: &str, instruction: Instruction) -> Result<TransactionSignature> {
        let method = instruction.method();
        let signed = Transaction {
            program_id: program_id.to_string(),
            fee_payer: self.payer(),
            recent_ledger: self.connection.latest_ledger()?,
            instruction,
        }
        .sign(&self.wallet)?;

        let signature = self.connection.send_transaction(&signed)?;
        tracing::debug!(method, %signature, "transaction confirmed");
        Ok(signature)
    }
}

/// Install `provider` as the ambient provider for this thread.
pub fn set_provider(provider: Provider) -> Result<()> {
    PROVIDER.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(HarnessError::ProviderAlreadySet);
        }
        tracing::debug!(endpoint = provider.connection.endpoint(), "provider set");
        *slot = Some(provider);
        Ok(())
    })
}

/// The ambient provider.
pub fn provider() -> Result<Provider> {
    PROVIDER.with(|slot| slot.borrow().clone().ok_or(HarnessError::ProviderNotSet))
}

/// Clear the ambient provider. Returns the one that was installed, if any.
pub fn reset_provider() -> Option<Provider> {
    PROVIDER.with(|slot| slot.borrow_mut().take())
}
