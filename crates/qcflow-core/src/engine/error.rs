use crate::core::io::FileFormatError;
use crate::core::methods::MethodError;
use std::io;
use thiserror::Error;

/// Errors arising while building or executing jobs.
///
/// Configuration problems ([`EngineError::Method`],
/// [`EngineError::RedundantMethod`]) surface at job construction, before any
/// I/O. Everything else is attached to the failing job by the runner; it
/// never aborts the rest of the queue.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Format(#[from] FileFormatError),

    #[error(transparent)]
    Method(#[from] MethodError),

    #[error("method '{name}' is derived from '{parent}' and cannot be submitted directly")]
    RedundantMethod { name: String, parent: String },

    #[error("job '{name}' has an empty command")]
    EmptyCommand { name: String },

    #[error("input rendering failed: {0}")]
    Render(String),

    #[error("job '{name}' has no output file to post-process")]
    MissingOutput { name: String },

    #[error("failed to spawn '{command}': {source}")]
    Spawn { command: String, source: io::Error },

    #[error("process exceeded the {seconds} s timeout and was killed")]
    Timeout { seconds: u64 },
}
