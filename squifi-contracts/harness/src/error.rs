use thiserror::Error;

/// Failures reported by a cluster while accepting or executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("cluster unreachable at {0}")]
    Unreachable(String),

    #[error("program `{0}` is not deployed on this cluster")]
    ProgramNotDeployed(String),

    #[error("unknown token `{0}`")]
    UnknownToken(String),

    #[error("transaction signature does not verify against fee payer {0}")]
    InvalidSignature(String),

    #[error("transaction references ledger {recent}, cluster is at {current}")]
    LedgerExpired { recent: u32, current: u32 },

    #[error("transaction {0} already processed")]
    AlreadyProcessed(String),

    #[error("{program}::{method} rejected with program error {code}")]
    Rejected {
        program: String,
        method: String,
        code: u32,
    },

    #[error("{program}::{method} aborted")]
    Aborted { program: String, method: String },

    #[error("no transaction {0}")]
    UnknownTransaction(String),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workspace file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("wallet error: {message}")]
    Wallet { message: String },

    #[error("provider not set; call set_provider first")]
    ProviderNotSet,

    #[error("provider already set for this process")]
    ProviderAlreadySet,

    #[error("program `{0}` not found in workspace")]
    ProgramNotFound(String),

    #[error("unexpected transaction outcome for {0}")]
    UnexpectedOutcome(String),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl HarnessError {
    pub fn config(message: impl Into<String>) -> Self {
        HarnessError::Config {
            message: message.into(),
        }
    }

    pub fn wallet(message: impl Into<String>) -> Self {
        HarnessError::Wallet {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
