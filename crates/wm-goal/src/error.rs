use std::fmt;

use thiserror::Error;

/// Why a queue refused a new goal.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RejectReason {
    /// The bounded queue has no free slot.
    QueueFull,
    /// An exclusive, non-overridable goal of equal or higher priority is
    /// already queued.
    ExclusiveConflict,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectReason::QueueFull         => "queue full",
            RejectReason::ExclusiveConflict => "exclusive conflict",
        })
    }
}

#[derive(Debug, Error)]
pub enum GoalError {
    #[error("goal rejected: {reason}")]
    Rejected { reason: RejectReason },

    #[error("order parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GoalResult<T> = Result<T, GoalError>;
