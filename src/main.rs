//! `platform-config` binary.
use anyhow::Result;
use clap::Parser;

use platform_config_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = match &args.command {
        cli::Command::Apply(_) => "apply",
        cli::Command::Properties(_) => "properties",
        cli::Command::Version => {
            commands::version::run();
            return Ok(());
        }
    };
    logging::init_subscriber(args.verbose, command);
    let log = logging::Logger::new(command);

    match args.command {
        cli::Command::Apply(opts) => commands::apply::run(&args.global, &opts, &log),
        cli::Command::Properties(opts) => commands::properties::run(&opts, &log),
        cli::Command::Version => Ok(()),
    }
}
