use thiserror::Error;

use wm_agent::AgentError;
use wm_core::{CoreError, GoalId, ObjectId};
use wm_goal::GoalError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent slot count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("no agent controls ship {0}")]
    UnknownShip(ObjectId),

    #[error("ship {ship} has no goal {goal}")]
    UnknownGoal { ship: ObjectId, goal: GoalId },

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Goal(#[from] GoalError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
