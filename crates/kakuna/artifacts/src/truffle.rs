//! Truffle artifacts: `build/contracts/<Name>.json`.

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
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TruffleArtifact {
    #[serde(default)]
    bytecode: Option<String>,
    #[serde(default)]
    deployed_bytecode: Option<String>,
    #[serde(default)]
    source_path: Option<String>,
}

impl TruffleArtifact {
    /// Whether the artifact was compiled from `file_name`. Artifacts without a
    /// recorded source path match any file.
    fn compiled_from(&self, file_name: &str) -> bool {
        // sourcePath is absolute on the machine that compiled it
        self.source_path
            .as_deref()
            .is_none_or(|source| source_file_name(source) == source_file_name(file_name))
    }
}

/// Reads artifacts from a Truffle `build/contracts/` directory.
#[derive(Debug, Clone)]
pub struct TruffleArtifacts {
    build_dir: PathBuf,
}

impl TruffleArtifacts {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }
}

impl ArtifactProvider for TruffleArtifacts {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
        let not_found = || {
            ArtifactError::NotFound {
                contract: contract.to_string(),
                location: self.build_dir.display().to_string(),
            }
        };

        let path = self
            .build_dir
            .join(format!("{}.json", contract.contract_name()));
        if !path.is_file() {
            return Err(not_found());
        }

        let artifact: TruffleArtifact = read_json(&path)?;
        if let Some(file_name) = contract.file_name()
            && !artifact.compiled_from(file_name)
        {
            debug!(
                target: "kakuna::artifacts",
                contract = %contract,
                source_path = ?artifact.source_path,
                "Truffle artifact compiled from a different source file"
            );
            return Err(not_found());
        }

        debug!(
            target: "kakuna::artifacts",
            contract = %contract,
            path = %path.display(),
            "Loaded Truffle artifact"
        );

        decode_artifact(
            contract,
            artifact.bytecode.as_deref(),
            artifact.deployed_bytecode.as_deref(),
            &path,
        )
    }
}
