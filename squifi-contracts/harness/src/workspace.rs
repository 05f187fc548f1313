//! Named program registry.

use crate::config::{ProgramKind, WorkspaceConfig};
use crate::error::{HarnessError, Result};
use crate::program::Program;
use crate::provider::{self, Provider};

#[derive(Debug, Clone)]
pub struct Workspace {
    provider: Provider,
    programs: Vec<(String, ProgramKind)>,
}

impl Workspace {
    /// Programs configured for the cluster `config` points at.
    pub fn new(provider: Provider, config: &WorkspaceConfig) -> Result<Self> {
        let programs = config.programs_for(&config.cluster()?);
        Ok(Self { provider, programs })
    }

    /// Workspace for the ambient provider, read from the nearest `Squifi.toml`
    /// above the current directory. Falls back to the default config.
    pub fn current() -> Result<Self> {
        let provider = provider::provider()?;
        let config = match WorkspaceConfig::discover(std::env::current_dir()?)? {
            Some((path, config)) => {
                tracing::debug!(path = %path.display(), "using workspace file");
                config
            }
            None => WorkspaceConfig::default(),
        };
        Self::new(provider, &config)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|(name, _)| name.as_str())
    }

    /// Resolve `name`. Matching ignores case, `_` and `-`.
    pub fn program(&self, name: &str) -> Result<Program> {
        let wanted = normalize(name);
        self.programs
            .iter()
            .find(|(candidate, _)| normalize(candidate) == wanted)
            .map(|(candidate, kind)| Program::new(candidate.clone(), *kind, self.provider.clone()))
            .ok_or_else(|| HarnessError::ProgramNotFound(name.to_string()))
    }
}

/// Resolve `name` in the current workspace using the ambient provider.
pub fn program(name: &str) -> Result<Program> {
    Workspace::current()?.program(name)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
