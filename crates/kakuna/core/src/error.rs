use kakuna_artifacts::{
    ArtifactError,
    BytecodeField,
};
use std::path::PathBuf;

/// Malformed prelude input. Always user-correctable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexFormatError {
    #[error("prelude `{input}` must be a `0x`-prefixed hex string, e.g. `0xc0de...`")]
    MissingPrefix { input: String },

    #[error("prelude has {digits} hex digits after `0x`; every byte needs exactly two")]
    OddLength { digits: usize },

    #[error("prelude has invalid hex digit `{digit}` at position {position}")]
    InvalidDigit { digit: char, position: usize },

    #[error("prelude is empty; pass at least one byte after `0x`")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    InvalidHexFormat(#[from] HexFormatError),

    /// No artifact, or more than one, matches the contract name.
    #[error(transparent)]
    ArtifactNotFound(ArtifactError),

    #[error(
        "compiled {field} for `{contract}` is empty{}; the contract may be abstract or its build failed",
        read_from(.path)
    )]
    EmptyArtifact {
        contract: String,
        field: BytecodeField,
        /// Artifact file, when it came from disk.
        path: Option<PathBuf>,
    },

    /// The artifact exists but could not be read or decoded.
    #[error(transparent)]
    MalformedArtifact(ArtifactError),
}

impl From<ArtifactError> for ComposeError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound { .. } | ArtifactError::Ambiguous { .. } => {
                Self::ArtifactNotFound(err)
            }
            ArtifactError::Io { .. } | ArtifactError::Json { .. } | ArtifactError::Bytecode { .. } => {
                Self::MalformedArtifact(err)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown network `{name}`; configured networks: {}", .known.join(", "))]
    UnknownNetwork { name: String, known: Vec<String> },

    #[error("test command is empty; set `[test] command` in the project config")]
    EmptyTestCommand,
}

#[derive(Debug, thiserror::Error)]
pub enum TestRunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("test suite failed on network `{network}` ({})", exit_description(.code))]
    Failed { network: String, code: Option<i32> },
}

fn read_from(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" (read from {})", path.display()))
        .unwrap_or_default()
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
