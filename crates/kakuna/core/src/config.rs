//! Project configuration: `kakuna.toml` at the project root.
//!
//! ```toml
//! [networks.development]
//! rpc_url = "http://127.0.0.1:8545"
//!
//! [test]
//! command = ["forge", "test"]
//! ```
//!
//! Without a `[test] command`, the build tool's own test runner is used.

use crate::error::ConfigError;
use kakuna_artifacts::ArtifactLayout;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::BTreeMap,
    path::{
        Path,
        PathBuf,
    },
};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "kakuna.toml";

/// Network used when none is named.
pub const DEFAULT_NETWORK: &str = "development";

/// JSON-RPC endpoint of a local development node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub networks: BTreeMap<String, NetworkConfig>,
    pub test: TestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Program followed by its arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            networks: BTreeMap::from([(
                DEFAULT_NETWORK.to_string(),
                NetworkConfig {
                    rpc_url: DEFAULT_RPC_URL.to_string(),
                },
            )]),
            test: TestConfig::default(),
        }
    }
}

impl ProjectConfig {
    pub fn read_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&raw).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Loads the project config.
    ///
    /// An explicit `path` must exist. Otherwise `<root>/kakuna.toml` is read
    /// when present, and built-in defaults apply when it is not.
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (root.join(CONFIG_FILE_NAME), false),
        };

        if !explicit && !path.is_file() {
            debug!(
                target: "kakuna::config",
                path = %path.display(),
                "No project config, using defaults"
            );
            return Ok(Self::default());
        }

        let config = Self::read_from_file(&path)?;
        debug!(
            target: "kakuna::config",
            path = %path.display(),
            networks = config.networks.len(),
            "Loaded project config"
        );
        Ok(config)
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks.get(name).ok_or_else(|| {
            ConfigError::UnknownNetwork {
                name: name.to_string(),
                known: self.networks.keys().cloned().collect(),
            }
        })
    }

    /// Splits the test command into program and arguments, falling back to
    /// the test runner of `layout`'s build tool.
    pub fn test_command(
        &self,
        layout: ArtifactLayout,
    ) -> Result<(String, Vec<String>), ConfigError> {
        let command = self
            .test
            .command
            .clone()
            .unwrap_or_else(|| default_test_command(layout));

        match command.split_first() {
            Some((program, args)) if !program.trim().is_empty() => {
                Ok((program.clone(), args.to_vec()))
            }
            _ => Err(ConfigError::EmptyTestCommand),
        }
    }
}

/// `forge test` or `truffle test`.
pub fn default_test_command(layout: ArtifactLayout) -> Vec<String> {
    let program = match layout {
        ArtifactLayout::Foundry => "forge",
        ArtifactLayout::Truffle => "truffle",
    };
    vec![program.to_string(), "test".to_string()]
}

/// Resolves the project root, defaulting to the working directory.
pub fn project_root(root: Option<&Path>) -> PathBuf {
    root.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
