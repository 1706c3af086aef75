//! Foundry artifacts: `out/<File>.sol/<Name>.json`.

use crate::{
    ArtifactError,
    ArtifactProvider,
    CompiledArtifact,
    decode_artifact,
    read_json,
    source_file_name,
};
use kakuna_common::ContractRef;
use serde::Deserialize;
use std::path::{
    Path,
    PathBuf,
};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForgeArtifact {
    #[serde(default)]
    bytecode: Option<BytecodeObject>,
    #[serde(default)]
    deployed_bytecode: Option<BytecodeObject>,
}

#[derive(Debug, Deserialize)]
struct BytecodeObject {
    #[serde(default)]
    object: Option<String>,
}

impl ForgeArtifact {
    fn init_code(&self) -> Option<&str> {
        self.bytecode.as_ref()?.object.as_deref()
    }

    fn runtime_code(&self) -> Option<&str> {
        self.deployed_bytecode.as_ref()?.object.as_deref()
    }
}

/// Reads artifacts from a Foundry `out/` directory.
#[derive(Debug, Clone)]
pub struct FoundryArtifacts {
    out_dir: PathBuf,
}

impl FoundryArtifacts {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Every artifact file that could hold `contract`, sorted.
    fn candidates(&self, contract: &ContractRef) -> Result<Vec<PathBuf>, ArtifactError> {
        let artifact_file = format!("{}.json", contract.contract_name());

        if let Some(file_name) = contract.file_name() {
            // forge names output directories after the source file alone
            let path = self
                .out_dir
                .join(source_file_name(file_name))
                .join(&artifact_file);
            return Ok(if path.is_file() { vec![path] } else { vec![] });
        }

        if !self.out_dir.is_dir() {
            return Ok(vec![]);
        }

        let entries = std::fs::read_dir(&self.out_dir).map_err(|source| {
            ArtifactError::Io {
                path: self.out_dir.clone(),
                source,
            }
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| {
                ArtifactError::Io {
                    path: self.out_dir.clone(),
                    source,
                }
            })?;
            let path = entry.path().join(&artifact_file);
            if path.is_file() {
                found.push(path);
            }
        }
        found.sort();
        Ok(found)
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.out_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

impl ArtifactProvider for FoundryArtifacts {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
        let mut candidates = self.candidates(contract)?;

        let path = match candidates.len() {
            0 => {
                return Err(ArtifactError::NotFound {
                    contract: contract.to_string(),
                    location: self.out_dir.display().to_string(),
                });
            }
            1 => candidates.remove(0),
            _ => {
                return Err(ArtifactError::Ambiguous {
                    contract: contract.contract_name().clone(),
                    candidates: candidates.iter().map(|p| self.relative(p)).collect(),
                });
            }
        };

        let artifact: ForgeArtifact = read_json(&path)?;
        debug!(
            target: "kakuna::artifacts",
            contract = %contract,
            path = %path.display(),
            "Loaded Foundry artifact"
        );

        decode_artifact(
            contract,
            artifact.init_code(),
            artifact.runtime_code(),
            &path,
        )
    }
}
