//! Agent events reported to observers.

use std::fmt;

use wm_agent::Mode;
use wm_core::{AgentId, GoalId, ObjectId, Tick};
use wm_goal::{GoalKind, InvalidReason, RejectReason};

/// Something observable that happened to one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentEvent {
    pub tick:   Tick,
    pub agent:  AgentId,
    pub object: ObjectId,
    pub kind:   AgentEventKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AgentEventKind {
    GoalRejected    { kind: GoalKind, reason: RejectReason },
    GoalInvalidated { goal: GoalId, kind: GoalKind, reason: InvalidReason },
    GoalAchieved    { goal: GoalId, kind: GoalKind },
    GoalSuperseded  { goal: GoalId, kind: GoalKind },
    ModeEntered     { mode: Mode, submode: &'static str },
    ModeAborted     { mode: Mode, reason: &'static str },
    TargetChanged   { from: Option<ObjectId>, to: Option<ObjectId> },
    AgentRetired,
}

impl AgentEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            AgentEventKind::GoalRejected { .. }    => "goal_rejected",
            AgentEventKind::GoalInvalidated { .. } => "goal_invalidated",
            AgentEventKind::GoalAchieved { .. }    => "goal_achieved",
            AgentEventKind::GoalSuperseded { .. }  => "goal_superseded",
            AgentEventKind::ModeEntered { .. }     => "mode_entered",
            AgentEventKind::ModeAborted { .. }     => "mode_aborted",
            AgentEventKind::TargetChanged { .. }   => "target_changed",
            AgentEventKind::AgentRetired           => "agent_retired",
        }
    }
}

/// Short human-readable detail, used as the `detail` column of event output.
impl fmt::Display for AgentEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentEventKind::GoalRejected { kind, reason } => {
                write!(f, "{} ({reason})", kind.as_str())
            }
            AgentEventKind::GoalInvalidated { goal, kind, reason } => {
                write!(f, "{goal} {} ({})", kind.as_str(), reason.as_str())
            }
            AgentEventKind::GoalAchieved { goal, kind }
            | AgentEventKind::GoalSuperseded { goal, kind } => write!(f, "{goal} {}", kind.as_str()),
            AgentEventKind::ModeEntered { mode, submode } => write!(f, "{mode}/{submode}"),
            AgentEventKind::ModeAborted { mode, reason } => write!(f, "{mode} ({reason})"),
            AgentEventKind::TargetChanged { from, to } => {
                let show = |o: &Option<ObjectId>| o.map_or_else(|| "-".to_owned(), |id| id.to_string());
                write!(f, "{} -> {}", show(from), show(to))
            }
            AgentEventKind::AgentRetired => Ok(()),
        }
    }
}
