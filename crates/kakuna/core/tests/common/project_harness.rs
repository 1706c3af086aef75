use clap::Parser;
use kakuna_artifacts::ArtifactLayout;
use kakuna_common::args::CliArgs;
use kakuna_core::{
    ComposeError,
    ComposedArtifact,
    compose::ComposeArgs,
};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway contracts project with compiled artifacts on disk.
pub struct TestProject {
    dir: TempDir,
    layout: ArtifactLayout,
}

impl TestProject {
    pub fn new(layout: ArtifactLayout) -> Self {
        let dir = TempDir::new().expect("failed to create project dir");
        let marker = match layout {
            ArtifactLayout::Foundry => ("foundry.toml", "[profile.default]\n"),
            ArtifactLayout::Truffle => ("truffle-config.js", "module.exports = {};\n"),
        };
        std::fs::write(dir.path().join(marker.0), marker.1).expect("failed to write marker");
        Self { dir, layout }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes an artifact for `name`, compiled from `<source>`.
    pub fn add_contract(&self, source: &str, name: &str, init_code: &str, runtime_code: &str) {
        let artifacts = self.layout.default_dir(self.root());
        match self.layout {
            ArtifactLayout::Foundry => {
                let dir = artifacts.join(source);
                std::fs::create_dir_all(&dir).expect("failed to create out dir");
                let body = json!({
                    "abi": [],
                    "bytecode": { "object": init_code },
                    "deployedBytecode": { "object": runtime_code },
                });
                std::fs::write(dir.join(format!("{name}.json")), body.to_string())
                    .expect("failed to write artifact");
            }
            ArtifactLayout::Truffle => {
                std::fs::create_dir_all(&artifacts).expect("failed to create build dir");
                let body = json!({
                    "contractName": name,
                    "abi": [],
                    "bytecode": init_code,
                    "deployedBytecode": runtime_code,
                    "sourcePath": format!("/project/contracts/{source}"),
                });
                std::fs::write(artifacts.join(format!("{name}.json")), body.to_string())
                    .expect("failed to write artifact");
            }
        }
    }

    /// Runs `compose` from the project root with layout auto-detection.
    pub fn compose(
        &self,
        contract: &str,
        prelude: &str,
        flags: &[&str],
    ) -> Result<ComposedArtifact, ComposeError> {
        let mut argv = vec!["compose", contract, prelude];
        argv.extend_from_slice(flags);
        let root = self.root().to_str().expect("temp path is not utf-8");
        argv.extend_from_slice(&["--root", root]);

        ComposeArgs::try_parse_from(argv)
            .expect("compose args should parse")
            .run(&CliArgs::default())
    }
}
