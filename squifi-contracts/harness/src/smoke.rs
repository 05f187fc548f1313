//! End-to-end smoke flow: boot localnet, deploy, call `initialize`.

use crate::cluster::{Cluster, LocalValidator};
use crate::config::WorkspaceConfig;
use crate::error::Result;
use crate::provider::{self, Provider};
use crate::transaction::TransactionSignature;
use crate::workspace::Workspace;
use std::path::PathBuf;

/// Program the smoke flow calls.
pub const SMOKE_PROGRAM: &str = "Squifi";

#[derive(Debug, Clone, Default)]
pub struct SmokeOptions {
    /// Endpoint the provider connects to instead of the configured cluster.
    pub cluster: Option<String>,
    /// Keypair file for the fee payer instead of the configured one.
    pub wallet: Option<PathBuf>,
    /// Start the validator without deploying workspace programs.
    pub skip_deploy: bool,
}

#[derive(Debug, Clone)]
pub struct SmokeReport {
    pub program: String,
    pub program_id: String,
    pub signature: TransactionSignature,
    pub ledger: u32,
}

/// Run the smoke flow against a fresh local validator. The validator and the
/// ambient provider are torn down whether or not the call succeeds.
pub fn run_smoke(config: &WorkspaceConfig, options: &SmokeOptions) -> Result<SmokeReport> {
    let validator = LocalValidator::start(&Cluster::Localnet, config)?;

    let result = smoke(&validator, config, options);

    provider::reset_provider();
    validator.shutdown();

    match &result {
        Ok(report) => tracing::info!(program = %report.program, ledger = report.ledger, "smoke test passed"),
        Err(err) => tracing::warn!(error = %err, "smoke test failed"),
    }
    result
}

fn smoke(validator: &LocalValidator, config: &WorkspaceConfig, options: &SmokeOptions) -> Result<SmokeReport> {
    if options.skip_deploy {
        tracing::info!("skipping program deployment");
    } else {
        for (name, kind) in config.programs_for(&Cluster::Localnet) {
            validator.deploy(&name, kind)?;
        }
    }

    provider::set_provider(Provider::configured(
        config,
        options.cluster.as_deref(),
        options.wallet.as_deref(),
    )?)?;

    let program = Workspace::new(provider::provider()?, config)?.program(SMOKE_PROGRAM)?;
    let signature = program.rpc().initialize()?;
    println!("Your transaction signature {signature}");

    let receipt = program.receipt(&signature)?;
    Ok(SmokeReport {
        program: program.name().to_string(),
        program_id: program.program_id()?,
        signature,
        ledger: receipt.ledger,
    })
}
