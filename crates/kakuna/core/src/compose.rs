//! The `compose` command: inject a prelude into a compiled contract and print
//! the resulting init and runtime code.

use crate::{
    composer::{
        ComposedArtifact,
        Composer,
        ComposerConfig,
        InjectionPolicy,
        PreludePolicy,
    },
    config::project_root,
    error::ComposeError,
    prelude::encode_hex,
};
use clap::{
    Parser,
    ValueHint,
};
use kakuna_artifacts::{
    ArtifactLayout,
    ArtifactProvider,
};
use kakuna_common::{
    ContractRef,
    args::CliArgs,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

const COMPOSE_AFTER_HELP: &str = "The contract must already be compiled; kakuna reads the build tool's artifacts and never invokes the compiler.\n\
Example: kakuna compose Token 0x6002";

/// Command-line arguments for composing prelude-injected bytecode.
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "compose",
    about = "Inject prelude bytecode ahead of a compiled contract's init code.",
    after_help = COMPOSE_AFTER_HELP
)]
pub struct ComposeArgs {
    /// Compiled contract to compose
    #[clap(
        value_name = "CONTRACT",
        help = "Name of the compiled contract, optionally qualified as `File.sol:Name`."
    )]
    pub contract: ContractRef,

    /// Prelude bytecode
    #[clap(
        value_name = "PRELUDE",
        allow_hyphen_values = true,
        help = "Prelude bytecode as a 0x-prefixed hex string, e.g. `0xc0de`."
    )]
    pub prelude: String,

    /// Root directory of the contracts project
    #[clap(long, env = "KAKUNA_ROOT", value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Artifact layout, detected from the project when omitted
    #[clap(long, value_enum)]
    pub layout: Option<ArtifactLayout>,

    /// Directory holding compiled artifacts, overriding the layout's default
    #[clap(long = "artifacts", value_hint = ValueHint::DirPath)]
    pub artifacts_dir: Option<PathBuf>,

    /// Prepend the prelude to the runtime code as well
    #[clap(long)]
    pub inject_runtime: bool,

    /// Reject an empty prelude (`0x`)
    #[clap(long)]
    pub require_prelude: bool,
}

impl ComposeArgs {
    fn composer_config(&self) -> ComposerConfig {
        ComposerConfig {
            injection: if self.inject_runtime {
                InjectionPolicy::InitAndRuntime
            } else {
                InjectionPolicy::InitCodeOnly
            },
            prelude: if self.require_prelude {
                PreludePolicy::RequireNonEmpty
            } else {
                PreludePolicy::AllowEmpty
            },
        }
    }

    /// Provider for the configured project layout.
    fn provider(&self) -> Box<dyn ArtifactProvider> {
        let root = project_root(self.root.as_deref());
        let layout = self
            .layout
            .unwrap_or_else(|| ArtifactLayout::detect(&root));
        let dir = self
            .artifacts_dir
            .clone()
            .unwrap_or_else(|| layout.default_dir(&root));

        info!(
            target: "kakuna::compose",
            ?layout,
            artifacts = %dir.display(),
            "Reading compiled artifacts"
        );
        layout.provider(dir)
    }

    /// Renders the composed artifact the way the pipeline scripts expect it.
    pub fn render_text(composed: &ComposedArtifact) -> String {
        format!(
            "INIT CODE: {}\n\nRUNTIME CODE: {}",
            encode_hex(&composed.init_code),
            encode_hex(&composed.runtime_code)
        )
    }

    pub fn render_json(&self, composed: &ComposedArtifact) -> serde_json::Value {
        json!({
            "status": "success",
            "contract": self.contract.to_string(),
            "init_code": encode_hex(&composed.init_code),
            "runtime_code": encode_hex(&composed.runtime_code),
        })
    }

    fn display(&self, composed: &ComposedArtifact, json_output: bool) {
        if json_output {
            println!("{:#}", self.render_json(composed));
        } else {
            println!("{}", Self::render_text(composed));
        }
    }

    /// Composes with an explicit provider. Nothing is printed.
    pub fn compose_with<P: ArtifactProvider>(
        &self,
        provider: P,
    ) -> Result<ComposedArtifact, ComposeError> {
        Composer::with_config(provider, self.composer_config())
            .compose(&self.contract, &self.prelude)
    }

    /// Executes the compose command.
    ///
    /// # Errors
    /// * `InvalidHexFormat` if the prelude is not `0x`-prefixed, even-length hex
    /// * `ArtifactNotFound` if the contract has no unique compiled artifact
    /// * `EmptyArtifact` if the compiled bytecode is empty
    pub fn run(&self, cli_args: &CliArgs) -> Result<ComposedArtifact, ComposeError> {
        let composed = self.compose_with(self.provider())?;
        self.display(&composed, cli_args.json_output());
        Ok(composed)
    }
}
