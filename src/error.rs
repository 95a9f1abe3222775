use thiserror::Error;

use crate::tape::TapeId;
use crate::tools::ToolKind;

/// Errors from canvas operations that a caller may want to report.
///
/// Stale targets and out-of-order pointer events are not errors; those are
/// plain no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Attempted to transition between incompatible gesture states
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Tape strip {0} is locked")]
    Locked(TapeId),

    #[error("No tape strip with id {0} on the active page")]
    UnknownTape(TapeId),

    #[error("Operation needs the select tool, but {0:?} is active")]
    WrongTool(ToolKind),
}

pub type SessionResult<T> = Result<T, SessionError>;
