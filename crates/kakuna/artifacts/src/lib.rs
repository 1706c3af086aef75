//! Read-only access to compiled contract artifacts.
//!
//! Compilation is owned by the project's build tool. This crate only locates
//! the artifacts that tool wrote to disk and decodes their init and runtime
//! bytecode. Each on-disk convention is an [`ArtifactProvider`]; callers pick
//! one with [`ArtifactLayout`] or inject their own.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod bytecode;
pub mod foundry;
pub mod memory;
pub mod truffle;

pub use bytecode::{
    BytecodeError,
    decode_bytecode,
};
pub use foundry::FoundryArtifacts;
pub use memory::InMemoryArtifacts;
pub use truffle::TruffleArtifacts;

use alloy_primitives::Bytes;
use kakuna_common::ContractRef;
use serde::de::DeserializeOwned;
use std::{
    fmt,
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
};

/// Compiler output for a single contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Deployment bytecode, executed once at creation.
    pub init_code: Bytes,
    /// Bytecode left on-chain after construction.
    pub runtime_code: Bytes,
    /// File the artifact was read from, if it came from disk.
    pub path: Option<PathBuf>,
}

impl CompiledArtifact {
    pub fn new(init_code: impl Into<Bytes>, runtime_code: impl Into<Bytes>) -> Self {
        Self {
            init_code: init_code.into(),
            runtime_code: runtime_code.into(),
            path: None,
        }
    }
}

/// Which bytecode section of an artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytecodeField {
    InitCode,
    RuntimeCode,
}

impl fmt::Display for BytecodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitCode => f.write_str("init code"),
            Self::RuntimeCode => f.write_str("runtime code"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("no compiled artifact for `{contract}` in {location}; did the build succeed?")]
    NotFound { contract: String, location: String },

    #[error(
        "`{contract}` matches {} artifacts ({}); qualify it as `File.sol:{contract}`",
        .candidates.len(),
        .candidates.join(", ")
    )]
    Ambiguous {
        contract: String,
        candidates: Vec<String>,
    },

    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed {field} in artifact for `{contract}`: {source}")]
    Bytecode {
        contract: String,
        field: BytecodeField,
        #[source]
        source: BytecodeError,
    },
}

/// Source of compiled artifacts. Implementations are read-only and may be
/// shared across threads.
pub trait ArtifactProvider: Send + Sync {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError>;
}

impl<P: ArtifactProvider + ?Sized> ArtifactProvider for Box<P> {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
        (**self).lookup(contract)
    }
}

impl<P: ArtifactProvider + ?Sized> ArtifactProvider for Arc<P> {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
        (**self).lookup(contract)
    }
}

impl<P: ArtifactProvider + ?Sized> ArtifactProvider for &P {
    fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
        (**self).lookup(contract)
    }
}

/// On-disk artifact convention of a build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactLayout {
    /// `out/<File>.sol/<Name>.json`
    Foundry,
    /// `build/contracts/<Name>.json`
    Truffle,
}

impl ArtifactLayout {
    const FOUNDRY_MARKERS: &'static [&'static str] = &["foundry.toml"];
    const TRUFFLE_MARKERS: &'static [&'static str] = &["truffle-config.js", "truffle.js"];

    /// Guess the layout from the project's build configuration. Falls back to
    /// Foundry when neither tool's config file is present.
    pub fn detect(root: &Path) -> Self {
        let has_any = |markers: &[&str]| markers.iter().any(|m| root.join(m).is_file());

        if has_any(Self::FOUNDRY_MARKERS) {
            Self::Foundry
        } else if has_any(Self::TRUFFLE_MARKERS) {
            Self::Truffle
        } else {
            Self::Foundry
        }
    }

    /// Directory the build tool writes artifacts to, relative to `root`.
    pub fn default_dir(self, root: &Path) -> PathBuf {
        match self {
            Self::Foundry => root.join("out"),
            Self::Truffle => root.join("build").join("contracts"),
        }
    }

    pub fn provider(self, dir: PathBuf) -> Box<dyn ArtifactProvider> {
        match self {
            Self::Foundry => Box::new(FoundryArtifacts::new(dir)),
            Self::Truffle => Box::new(TruffleArtifacts::new(dir)),
        }
    }
}

/// Last component of a source path, e.g. `Token.sol` for `src/Token.sol`.
/// Both separators are accepted since artifacts may come from another OS.
pub(crate) fn source_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    serde_json::from_str(&raw).map_err(|source| {
        ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Decodes both bytecode sections. A missing section decodes to empty bytes;
/// rejecting empty code is left to the caller.
pub(crate) fn decode_artifact(
    contract: &ContractRef,
    init_code: Option<&str>,
    runtime_code: Option<&str>,
    path: &Path,
) -> Result<CompiledArtifact, ArtifactError> {
    let decode = |raw: Option<&str>, field| {
        decode_bytecode(raw.unwrap_or_default()).map_err(|source| {
            ArtifactError::Bytecode {
                contract: contract.to_string(),
                field,
                source,
            }
        })
    };

    Ok(CompiledArtifact {
        init_code: decode(init_code, BytecodeField::InitCode)?,
        runtime_code: decode(runtime_code, BytecodeField::RuntimeCode)?,
        path: Some(path.to_path_buf()),
    })
}
