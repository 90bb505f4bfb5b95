use colored::Colorize;

pub mod args;
pub mod exit_status;
mod report;
mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;

use crate::core::SnapshotError;

pub fn run_cli(args: Arguments) -> ExitStatus {
    let verbose = args.common.verbose;

    match run::run(&args) {
        Ok(summary) => {
            report::print(&summary, verbose);
            ExitStatus::Success
        }
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            match err.downcast_ref::<SnapshotError>() {
                // A verification failure is a bug in the emitter, not bad input.
                Some(SnapshotError::EmissionFormat(_)) => ExitStatus::Error,
                _ => ExitStatus::Failure,
            }
        }
    }
}
