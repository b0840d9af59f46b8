use thiserror::Error;

use wm_core::{AgentId, CoreError, ObjectId, SkillLevel};
use wm_goal::GoalError;

use crate::Mode;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no skill profile for level {0}")]
    MissingProfile(SkillLevel),

    #[error("mode {0} cannot be forced")]
    InvalidOverride(Mode),

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("object {0} is already controlled by an agent")]
    AlreadyControlled(ObjectId),

    #[error(transparent)]
    Goal(#[from] GoalError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AgentResult<T> = Result<T, AgentError>;
