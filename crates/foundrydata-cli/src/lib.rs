//! The `foundrydata` binary's argument parsing and presentation layer.
//! Everything that actually generates data lives in
//! `foundrydata_orchestrator`; this crate only translates CLI flags into
//! a `PipelineOptions` and a `PipelineResult` back into stdout/stderr/an
//! exit code.

mod args;
mod run;
mod snapshot;

pub use args::{Cli, Command, GenerateArgs};
use clap::Parser;
use foundrydata_utils::ExitCode;

/// Parse `std::env::args()` and run the requested command.
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    foundrydata_utils::logging::init_tracing(cli.verbose).ok();
    match cli.command {
        Command::Generate(args) => run::run_generate(args),
    }
}
