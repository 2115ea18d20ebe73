use gavel_common::config::ConfigError;
use thiserror::Error;

/// Error taxonomy of the judging core.
///
/// `MalformedSignature` and configuration errors abort the submission
/// before any execution. `ArgumentCountMismatch` is scoped to one test
/// case and recorded on its result. `Cancelled` means the submission
/// was abandoned mid-flight and carries no verdict. Compilation
/// failure is not an error here at all: it is a verdict, produced on
/// the success path.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCountMismatch { expected: usize, found: usize },

    #[error("judging cancelled")]
    Cancelled,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("source code exceeds {limit} bytes")]
    SourceTooLarge { limit: usize },

    #[error("sandbox i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
