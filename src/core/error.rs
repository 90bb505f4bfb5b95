use std::fmt;

/// Failures specific to the snapshot pipeline. Everything else (I/O, parse
/// errors) travels as plain `anyhow` context.
#[derive(Debug)]
pub enum SnapshotError {
    /// The requested root declaration does not exist in the named module.
    RootNotFound { scope: String, name: String },
    /// The generated output failed to re-parse. Always a bug in the emitter;
    /// the payload is the parser's complaint.
    EmissionFormat(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::RootNotFound { scope, name } => {
                write!(f, "no type declaration named `{name}` in {scope}")
            }
            SnapshotError::EmissionFormat(detail) => {
                write!(f, "generated output is not valid TypeScript: {detail}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
