//! The `test` command: run the project's integration suite against a
//! configured network.

use crate::{
    config::{
        DEFAULT_NETWORK,
        NetworkConfig,
        ProjectConfig,
        project_root,
    },
    error::TestRunError,
};
use clap::{
    Parser,
    ValueHint,
};
use colored::Colorize;
use kakuna_artifacts::ArtifactLayout;
use kakuna_common::args::CliArgs;
use serde_json::json;
use std::{
    path::{
        Path,
        PathBuf,
    },
    process::Stdio,
};
use tokio::process::Command;
use tracing::{
    debug,
    info,
};

/// Environment variable carrying the network's JSON-RPC URL to the suite.
pub const RPC_URL_ENV: &str = "ETH_RPC_URL";
/// Environment variable carrying the network name to the suite.
pub const NETWORK_ENV: &str = "KAKUNA_NETWORK";

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "test",
    about = "Run the integration test suite against a configured network.",
    after_help = "Networks and the test command are read from kakuna.toml; without one, the build tool's test runner (`forge test` or `truffle test`) runs against http://127.0.0.1:8545."
)]
pub struct TestArgs {
    /// Network to test against
    #[clap(long, short = 'n', env = NETWORK_ENV, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Root directory of the contracts project
    #[clap(long, env = "KAKUNA_ROOT", value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Build tool whose test runner is the default command, detected from the
    /// project when omitted
    #[clap(long, value_enum)]
    pub layout: Option<ArtifactLayout>,

    /// Extra arguments passed through to the test command
    #[clap(last = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}

/// A single resolved test invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    pub network: String,
    pub rpc_url: String,
    pub program: String,
    pub args: Vec<String>,
    pub root: PathBuf,
}

impl TestPlan {
    pub fn new(
        network: &str,
        network_config: &NetworkConfig,
        config: &ProjectConfig,
        layout: ArtifactLayout,
        extra_args: &[String],
        root: &Path,
    ) -> Result<Self, TestRunError> {
        let (program, mut args) = config.test_command(layout)?;
        args.extend_from_slice(extra_args);
        Ok(Self {
            network: network.to_string(),
            rpc_url: network_config.rpc_url.clone(),
            program,
            args,
            root: root.to_path_buf(),
        })
    }

    /// Runs the suite to completion. With `quiet`, the suite's stdout is
    /// redirected to stderr so ours stays machine-readable.
    pub async fn execute(&self, quiet: bool) -> Result<(), TestRunError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.root)
            .env(RPC_URL_ENV, &self.rpc_url)
            .env(NETWORK_ENV, &self.network)
            .stdin(Stdio::null());
        if quiet {
            command.stdout(Stdio::from(std::io::stderr()));
        }

        debug!(
            target: "kakuna::test",
            program = %self.program,
            args = ?self.args,
            root = %self.root.display(),
            "Spawning test suite"
        );

        let status = command.status().await.map_err(|source| {
            TestRunError::Spawn {
                program: self.program.clone(),
                source,
            }
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(TestRunError::Failed {
                network: self.network.clone(),
                code: status.code(),
            })
        }
    }
}

impl TestArgs {
    /// Resolves the network and test command from the project config.
    pub fn plan(&self, cli_args: &CliArgs) -> Result<TestPlan, TestRunError> {
        let root = project_root(self.root.as_deref());
        let config = ProjectConfig::load(&root, cli_args.config.as_deref())?;
        let network = config.network(&self.network)?;
        let layout = self
            .layout
            .unwrap_or_else(|| ArtifactLayout::detect(&root));
        TestPlan::new(
            &self.network,
            network,
            &config,
            layout,
            &self.extra_args,
            &root,
        )
    }

    fn display_success(plan: &TestPlan, json_output: bool) {
        if json_output {
            let output = json!({
                "status": "success",
                "network": plan.network,
                "rpc_url": plan.rpc_url,
            });
            println!("{output:#}");
        } else {
            println!(
                "\n{} on network {} ({})",
                "✅ Test suite passed".bold().green(),
                plan.network.cyan().bold(),
                plan.rpc_url
            );
        }
    }

    /// Executes the test command.
    ///
    /// # Errors
    /// * `Config` if the project config is unreadable or the network unknown
    /// * `Spawn` if the test command cannot be started
    /// * `Failed` if the suite exits non-zero
    pub async fn run(&self, cli_args: &CliArgs) -> Result<(), TestRunError> {
        let plan = self.plan(cli_args)?;
        info!(
            target: "kakuna::test",
            network = %plan.network,
            rpc_url = %plan.rpc_url,
            "Running test suite"
        );

        plan.execute(cli_args.json_output()).await?;
        Self::display_success(&plan, cli_args.json_output());
        Ok(())
    }
}
