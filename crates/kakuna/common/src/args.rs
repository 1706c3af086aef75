use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, Default)]
pub struct CliArgs {
    /// Print results and errors as JSON
    #[clap(short, long, global = true)]
    pub json: bool,
    /// Path of the project configuration file (defaults to `<root>/kakuna.toml`)
    #[clap(long, global = true, env = "KAKUNA_CONFIG", hide = true)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    pub fn json_output(&self) -> bool {
        self.json
    }
}
