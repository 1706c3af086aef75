//! Prelude injection into compiled contract bytecode.
//!
//! The composer never mutates artifact bytes. It only concatenates: the
//! prelude runs first at construction time, and every original byte follows
//! it unchanged.

use crate::{
    error::{
        ComposeError,
        HexFormatError,
    },
    prelude::{
        Prelude,
        decode_prelude,
    },
};
use alloy_primitives::Bytes;
use kakuna_artifacts::{
    ArtifactProvider,
    BytecodeField,
    CompiledArtifact,
};
use kakuna_common::ContractRef;
use tracing::debug;

/// Which bytecode sections receive the prelude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InjectionPolicy {
    /// Prepend to init code; runtime code passes through.
    #[default]
    InitCodeOnly,
    /// Prepend to both init code and runtime code.
    InitAndRuntime,
}

/// Whether a zero-length prelude is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreludePolicy {
    #[default]
    AllowEmpty,
    RequireNonEmpty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposerConfig {
    pub injection: InjectionPolicy,
    pub prelude: PreludePolicy,
}

/// Deployable bytecode produced by [`Composer::compose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedArtifact {
    pub init_code: Bytes,
    pub runtime_code: Bytes,
}

/// Builds [`ComposedArtifact`]s from artifacts served by `P`.
#[derive(Debug, Clone)]
pub struct Composer<P> {
    provider: P,
    config: ComposerConfig,
}

impl<P: ArtifactProvider> Composer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ComposerConfig::default())
    }

    pub const fn with_config(provider: P, config: ComposerConfig) -> Self {
        Self { provider, config }
    }

    /// Validates `prelude_hex`, loads the artifact for `contract` and injects
    /// the prelude.
    ///
    /// The prelude is fully validated before the artifact store is touched.
    pub fn compose(
        &self,
        contract: &ContractRef,
        prelude_hex: &str,
    ) -> Result<ComposedArtifact, ComposeError> {
        let prelude = decode_prelude(prelude_hex)?;
        self.compose_prelude(contract, &prelude)
    }

    /// Same as [`Composer::compose`] for an already decoded prelude.
    pub fn compose_prelude(
        &self,
        contract: &ContractRef,
        prelude: &Prelude,
    ) -> Result<ComposedArtifact, ComposeError> {
        if self.config.prelude == PreludePolicy::RequireNonEmpty && prelude.is_empty() {
            return Err(HexFormatError::Empty.into());
        }

        let artifact = self.provider.lookup(contract)?;
        ensure_not_empty(contract, &artifact)?;

        debug!(
            target: "kakuna::compose",
            contract = %contract,
            prelude_len = prelude.len(),
            init_code_len = artifact.init_code.len(),
            runtime_code_len = artifact.runtime_code.len(),
            injection = ?self.config.injection,
            path = ?artifact.path,
            "Composing artifact"
        );

        Ok(inject(&artifact, prelude, self.config.injection))
    }
}

fn ensure_not_empty(contract: &ContractRef, artifact: &CompiledArtifact) -> Result<(), ComposeError> {
    let empty_field = if artifact.init_code.is_empty() {
        Some(BytecodeField::InitCode)
    } else if artifact.runtime_code.is_empty() {
        Some(BytecodeField::RuntimeCode)
    } else {
        None
    };

    match empty_field {
        Some(field) => {
            Err(ComposeError::EmptyArtifact {
                contract: contract.to_string(),
                field,
                path: artifact.path.clone(),
            })
        }
        None => Ok(()),
    }
}

/// Prepends `prelude` to the sections selected by `policy`.
pub fn inject(
    artifact: &CompiledArtifact,
    prelude: &Prelude,
    policy: InjectionPolicy,
) -> ComposedArtifact {
    let runtime_code = match policy {
        InjectionPolicy::InitCodeOnly => artifact.runtime_code.clone(),
        InjectionPolicy::InitAndRuntime => prepend(prelude, &artifact.runtime_code),
    };

    ComposedArtifact {
        init_code: prepend(prelude, &artifact.init_code),
        runtime_code,
    }
}

fn prepend(prelude: &Prelude, code: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(prelude.len() + code.len());
    out.extend_from_slice(prelude.as_bytes());
    out.extend_from_slice(code);
    out.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kakuna_artifacts::{
        ArtifactError,
        InMemoryArtifacts,
    };
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    const TOKEN_INIT: &[u8] = &[0x60, 0x01];
    const TOKEN_RUNTIME: &[u8] = &[0x60, 0x00, 0xf3];

    fn token_artifacts() -> InMemoryArtifacts {
        let mut artifacts = InMemoryArtifacts::default();
        artifacts.insert(
            "Token".parse().unwrap(),
            CompiledArtifact::new(TOKEN_INIT.to_vec(), TOKEN_RUNTIME.to_vec()),
        );
        artifacts
    }

    fn token() -> ContractRef {
        "Token".parse().unwrap()
    }

    /// Counts lookups so tests can assert the store was never consulted.
    #[derive(Default)]
    struct CountingProvider {
        inner: InMemoryArtifacts,
        lookups: AtomicUsize,
    }

    impl ArtifactProvider for CountingProvider {
        fn lookup(&self, contract: &ContractRef) -> Result<CompiledArtifact, ArtifactError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup(contract)
        }
    }

    #[test]
    fn token_prelude_is_prepended_to_init_code() {
        let composer = Composer::new(token_artifacts());
        let composed = composer.compose(&token(), "0x6002").unwrap();

        assert_eq!(composed.init_code.to_vec(), vec![0x60, 0x02, 0x60, 0x01]);
        assert_eq!(composed.runtime_code.to_vec(), TOKEN_RUNTIME.to_vec());
    }

    #[test]
    fn init_code_is_prelude_followed_by_original_bytes() {
        let composer = Composer::new(token_artifacts());
        let prelude = Prelude::new(vec![0x5b, 0x60, 0x80, 0x60, 0x40, 0x52]);
        let composed = composer.compose_prelude(&token(), &prelude).unwrap();

        let (head, tail) = composed.init_code.split_at(prelude.len());
        assert_eq!(head, prelude.as_bytes());
        assert_eq!(tail, TOKEN_INIT);
    }

    #[test]
    fn empty_prelude_is_identity() {
        let composer = Composer::new(token_artifacts());
        let composed = composer.compose(&token(), "0x").unwrap();

        assert_eq!(composed.init_code.to_vec(), TOKEN_INIT.to_vec());
        assert_eq!(composed.runtime_code.to_vec(), TOKEN_RUNTIME.to_vec());
    }

    #[test]
    fn compose_is_deterministic() {
        let composer = Composer::new(token_artifacts());
        let first = composer.compose(&token(), "0xdeadbeef").unwrap();
        let second = composer.compose(&token(), "0xdeadbeef").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn runtime_injection_prepends_to_both_sections() {
        let config = ComposerConfig {
            injection: InjectionPolicy::InitAndRuntime,
            ..Default::default()
        };
        let composer = Composer::with_config(token_artifacts(), config);
        let composed = composer.compose(&token(), "0xfe").unwrap();

        assert_eq!(composed.init_code.to_vec(), vec![0xfe, 0x60, 0x01]);
        assert_eq!(composed.runtime_code.to_vec(), vec![0xfe, 0x60, 0x00, 0xf3]);
    }

    #[test]
    fn missing_prefix_fails_before_lookup() {
        let provider = CountingProvider {
            inner: token_artifacts(),
            ..Default::default()
        };
        let composer = Composer::new(&provider);

        let err = composer.compose(&token(), "c0de").unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidHexFormat(HexFormatError::MissingPrefix { .. })
        ));
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn odd_length_fails_before_lookup() {
        let provider = CountingProvider {
            inner: token_artifacts(),
            ..Default::default()
        };
        let composer = Composer::new(&provider);

        let err = composer.compose(&token(), "0xabc").unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidHexFormat(HexFormatError::OddLength { digits: 3 })
        ));
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_contract_is_not_found() {
        let provider = CountingProvider {
            inner: token_artifacts(),
            ..Default::default()
        };
        let composer = Composer::new(&provider);

        let err = composer
            .compose(&"Missing".parse().unwrap(), "0x6002")
            .unwrap_err();
        assert!(matches!(err, ComposeError::ArtifactNotFound(_)));
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_init_code_is_rejected() {
        let mut artifacts = InMemoryArtifacts::default();
        artifacts.insert(
            "Iface".parse().unwrap(),
            CompiledArtifact::new(Vec::new(), Vec::new()),
        );
        let composer = Composer::new(artifacts);

        match composer.compose(&"Iface".parse().unwrap(), "0x6002") {
            Err(ComposeError::EmptyArtifact {
                contract,
                field,
                path,
            }) => {
                assert_eq!(contract, "Iface");
                assert_eq!(field, BytecodeField::InitCode);
                assert_eq!(path, None);
            }
            other => panic!("expected empty artifact, got {other:?}"),
        }
    }

    #[test]
    fn empty_runtime_code_is_rejected() {
        let mut artifacts = InMemoryArtifacts::default();
        artifacts.insert(
            "Token".parse().unwrap(),
            CompiledArtifact::new(TOKEN_INIT.to_vec(), Vec::new()),
        );
        let composer = Composer::new(artifacts);

        assert!(matches!(
            composer.compose(&token(), "0x6002"),
            Err(ComposeError::EmptyArtifact {
                field: BytecodeField::RuntimeCode,
                ..
            })
        ));
    }

    #[test]
    fn required_prelude_rejects_empty_input() {
        let provider = CountingProvider {
            inner: token_artifacts(),
            ..Default::default()
        };
        let config = ComposerConfig {
            prelude: PreludePolicy::RequireNonEmpty,
            ..Default::default()
        };
        let composer = Composer::with_config(&provider, config);

        assert!(matches!(
            composer.compose(&token(), "0x"),
            Err(ComposeError::InvalidHexFormat(HexFormatError::Empty))
        ));
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 0);
        assert!(composer.compose(&token(), "0x00").is_ok());
    }

    #[test]
    fn inject_does_not_touch_the_artifact() {
        let artifact = CompiledArtifact::new(TOKEN_INIT.to_vec(), TOKEN_RUNTIME.to_vec());
        let before = artifact.clone();
        let _ = inject(
            &artifact,
            &Prelude::new(vec![0x01, 0x02]),
            InjectionPolicy::InitAndRuntime,
        );
        assert_eq!(artifact, before);
    }
}
