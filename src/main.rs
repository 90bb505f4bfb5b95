use std::process::ExitCode;

use clap::Parser;
use tysnap::cli::{Arguments, run_cli};

fn main() -> ExitCode {
    let args = Arguments::parse();
    run_cli(args).into()
}
