use clap::Parser;
use kakuna_common::args::CliArgs;
use kakuna_core::{
    compose::ComposeArgs,
    test_runner::TestArgs,
};

#[derive(Parser)]
#[command(
    name = "kakuna",
    version,
    about = "Compose prelude-injected contract bytecode and run integration suites"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub args: CliArgs,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    #[command(name = "compose")]
    Compose(ComposeArgs),
    #[command(name = "test")]
    Test(TestArgs),
}
