use crate::{
    ArtifactError,
    ArtifactProvider,
    CompiledArtifact,
};
use kakuna_common::ContractRef;
use std::collections::HashMap;

/// Artifacts held in memory, for embedding the composer without a build
/// directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    artifacts: HashMap<ContractRef, CompiledArtifact>,
}

impl InMemoryArtifacts {
    pub fn insert(
        &mut self,
        contract: ContractRef,
        artifact: CompiledArtifact,
    ) -> Option<CompiledArtifact> {
        self.artifacts.insert(contract, artifact)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FromIterator<(ContractRef, CompiledArtifact)> for InMemoryArtifacts {
    fn from_iter<I: IntoIterator<Item = (ContractRef, CompiledArtifact)>>(iter: I) -> Self {
        Self {
            artifacts: iter.into_iter().collect(),
        }
    }
}

impl ArtifactProvider for InMemoryArtifacts {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
        if contract.is_qualified() {
            return self.artifacts.get(contract).cloned().ok_or_else(|| {
                ArtifactError::NotFound {
                    contract: contract.to_string(),
                    location: "memory".to_string(),
                }
            });
        }

        let mut matches = self
            .artifacts
            .iter()
            .filter(|(key, _)| key.contract_name() == contract.contract_name())
            .collect::<Vec<_>>();

        match matches.len() {
            0 => {
                Err(ArtifactError::NotFound {
                    contract: contract.to_string(),
                    location: "memory".to_string(),
                })
            }
            1 => Ok(matches.remove(0).1.clone()),
            _ => {
                let mut candidates = matches
                    .iter()
                    .map(|(key, _)| key.to_string())
                    .collect::<Vec<_>>();
                candidates.sort();
                Err(ArtifactError::Ambiguous {
                    contract: contract.contract_name().clone(),
                    candidates,
                })
            }
        }
    }
}
