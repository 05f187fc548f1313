use crate::cluster::Cluster;
use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the workspace file looked up by [`WorkspaceConfig::discover`].
pub const WORKSPACE_FILE: &str = "Squifi.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    /// cluster name -> program name -> program kind
    #[serde(default)]
    pub programs: BTreeMap<String, BTreeMap<String, ProgramKind>>,
    #[serde(default)]
    pub test: TestConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_cluster")]
    pub cluster: String,
    pub wallet: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Ledger sequence the local validator starts at.
    pub startup_ledger: Option<u32>,
}

/// Programs the local validator knows how to deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    Fund,
}

fn default_cluster() -> String {
    "localnet".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            cluster: default_cluster(),
            wallet: None,
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        let mut localnet = BTreeMap::new();
        localnet.insert("squifi".to_string(), ProgramKind::Fund);
        let mut programs = BTreeMap::new();
        programs.insert(Cluster::Localnet.name(), localnet);
        Self {
            provider: ProviderConfig::default(),
            programs,
            test: TestConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    pub fn parse(content: &str) -> Result<Self> {
        let config: WorkspaceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loaded workspace file");
        Self::parse(&content)
    }

    /// Walk up from `start` looking for a workspace file.
    pub fn discover(start: impl AsRef<Path>) -> Result<Option<(PathBuf, Self)>> {
        for dir in start.as_ref().ancestors() {
            let candidate = dir.join(WORKSPACE_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    pub fn cluster(&self) -> Result<Cluster> {
        self.provider.cluster.parse()
    }

    /// Programs configured for `cluster`, in name order.
    pub fn programs_for(&self, cluster: &Cluster) -> Vec<(String, ProgramKind)> {
        self.programs
            .get(&cluster.name())
            .map(|programs| programs.iter().map(|(n, k)| (n.clone(), *k)).collect())
            .unwrap_or_default()
    }

    /// Wallet path with a leading `~` expanded.
    pub fn wallet_path(&self) -> Option<PathBuf> {
        self.provider.wallet.as_deref().map(expand_home)
    }

    fn validate(&self) -> Result<()> {
        self.cluster()?;
        for (cluster, programs) in &self.programs {
            for name in programs.keys() {
                if name.trim().is_empty() {
                    return Err(HarnessError::config(format!(
                        "empty program name under [programs.{cluster}]"
                    )));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_workspace_file() {
        let config = WorkspaceConfig::parse(
            r#"
            [provider]
            cluster = "localnet"
            wallet = "/tmp/id.json"

            [programs.localnet]
            squifi = "fund"

            [test]
            startup_ledger = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.cluster().unwrap(), Cluster::Localnet);
        assert_eq!(config.wallet_path(), Some(PathBuf::from("/tmp/id.json")));
        assert_eq!(config.test.startup_ledger, Some(10));
        assert_eq!(
            config.programs_for(&Cluster::Localnet),
            vec![("squifi".to_string(), ProgramKind::Fund)]
        );
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = WorkspaceConfig::parse("").unwrap();
        assert_eq!(config.provider, ProviderConfig::default());
        assert!(config.programs_for(&Cluster::Localnet).is_empty());
    }

    #[test]
    fn default_registers_squifi_on_localnet() {
        let config = WorkspaceConfig::default();
        assert_eq!(
            config.programs_for(&Cluster::Localnet),
            vec![("squifi".to_string(), ProgramKind::Fund)]
        );
    }

    #[test]
    fn rejects_unknown_program_kind() {
        let err = WorkspaceConfig::parse(
            r#"
            [programs.localnet]
            squifi = "lockup"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::Toml(_)));
    }

    #[test]
    fn rejects_bad_cluster() {
        let err = WorkspaceConfig::parse(
            r#"
            [provider]
            cluster = "mainnet-please"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::Config { .. }));
    }

    #[test]
    fn discover_walks_up_to_the_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(WORKSPACE_FILE),
            "[programs.localnet]\nsquifi = \"fund\"\n",
        )
        .unwrap();
        let nested = dir.path().join("tests").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = WorkspaceConfig::discover(&nested).unwrap().unwrap();
        assert_eq!(path, dir.path().join(WORKSPACE_FILE));
        assert_eq!(config.programs_for(&Cluster::Localnet).len(), 1);
    }
}
