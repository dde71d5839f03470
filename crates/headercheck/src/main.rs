use std::process::ExitCode;

use clap::Parser;
use headercheck::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    run(&cli)
}
