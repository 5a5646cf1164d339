use std::fmt;
use std::io;

use crate::status::PathStatus;

/// Misuse of a [`Path`](crate::Path) or failure to start its worker.
///
/// Search outcomes are not errors; they are reported as
/// [`PathStatus::PathNotFound`].
#[derive(Debug)]
pub enum PathError {
    /// The background worker thread could not be spawned.
    Spawn(io::Error),
    /// A background computation is already in flight.
    AlreadyRunning,
    /// The search already finished with the given status.
    NotCalculating(PathStatus),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to spawn path worker: {e}"),
            Self::AlreadyRunning => f.write_str("path search is already running in the background"),
            Self::NotCalculating(status) => write!(f, "path search already finished ({status})"),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
