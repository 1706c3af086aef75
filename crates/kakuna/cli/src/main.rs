mod cli;

use crate::cli::{
    Cli,
    Commands,
};
use clap::Parser;
use color_eyre::{
    Result,
    eyre::Report,
};
use kakuna_core::TestRunError;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so composed bytecode on stdout can be piped.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Error envelope printed to stderr under `--json`.
fn error_envelope(err: &Report) -> serde_json::Value {
    json!({
        "status": "error",
        "error": {
            "message": err.to_string(),
        }
    })
}

/// A failing suite exits with the suite's own status; every other error with 1.
fn exit_code(err: &Report) -> i32 {
    match err.downcast_ref::<TestRunError>() {
        Some(TestRunError::Failed {
            code: Some(code), ..
        }) if *code != 0 => *code,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configure color_eyre to hide location information and backtrace messages
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    init_tracing();

    let cli = Cli::parse();

    let result = async {
        match &cli.command {
            Commands::Compose(compose) => {
                debug!(
                    target: "kakuna::cli",
                    contract = %compose.contract,
                    "Dispatching compose"
                );
                compose.run(&cli.args)?;
            }
            Commands::Test(test) => {
                debug!(target: "kakuna::cli", network = %test.network, "Dispatching test");
                test.run(&cli.args).await?;
            }
        }
        Ok::<_, Report>(())
    }
    .await;

    if let Err(err) = result {
        if cli.args.json_output() {
            eprintln!("{}", error_envelope(&err));
        } else {
            eprintln!("Error: {err:?}");
        }
        std::process::exit(exit_code(&err));
    }

    Ok(())
}
