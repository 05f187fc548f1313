//! Client and test harness for the Squifi fund program.
//!
//! Runs the program on an in-process local validator and drives it the way
//! an off-chain client would: a provider signs and submits transactions
//! built by a named program's `rpc` namespace.

pub mod cluster;
pub mod config;
pub mod error;
pub mod logger;
pub mod program;
pub mod provider;
pub mod smoke;
pub mod transaction;
pub mod wallet;
pub mod workspace;

pub use cluster::{Cluster, Connection, FundAccount, LocalValidator};
pub use config::{ProgramKind, WorkspaceConfig};
pub use error::{ClusterError, HarnessError, Result};
pub use program::{Program, Rpc};
pub use provider::{provider, reset_provider, set_provider, Provider};
pub use smoke::{run_smoke, SmokeOptions, SmokeReport};
pub use transaction::{FundKind, Instruction, Outcome, Receipt, TransactionSignature};
pub use wallet::Wallet;
pub use workspace::{program, Workspace};
