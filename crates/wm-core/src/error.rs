//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::{AgentId, ObjectId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("skill profile error: {0}")]
    Profile(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `wm-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
