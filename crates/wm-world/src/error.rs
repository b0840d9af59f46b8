use thiserror::Error;

use wm_core::{ObjectId, PathId};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("object {0} added twice to one snapshot")]
    DuplicateObject(ObjectId),

    #[error("path {0} added twice to one snapshot")]
    DuplicatePath(PathId),

    #[error("object {0} has a non-finite position or velocity")]
    InvalidGeometry(ObjectId),
}

pub type WorldResult<T> = Result<T, WorldError>;
