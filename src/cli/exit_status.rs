use std::process::ExitCode;

/// Exit status for the CLI, following common conventions for codegen tools.
///
/// - `Success` (0): Snapshot written
/// - `Failure` (1): Input problem (bad locator, unknown module or type)
/// - `Error` (2): Internal error (generated output failed verification)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Snapshot written successfully.
    Success,
    /// The requested extraction could not be performed from the given input.
    Failure,
    /// The tool itself failed.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
