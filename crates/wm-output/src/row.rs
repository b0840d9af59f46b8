//! Plain data row types written by output backends.

use wm_agent::AgentTelemetry;
use wm_core::Tick;
use wm_decision::AgentEvent;

/// One agent's decision state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTelemetryRow {
    pub tick:      u64,
    pub agent_id:  u32,
    pub object_id: u32,
    pub mode:      &'static str,
    pub submode:   &'static str,
    /// `u32::MAX` when no goal is active.
    pub goal_id:   u32,
    /// Empty when no goal is active.
    pub goal_kind: &'static str,
    /// `u32::MAX` without a target.
    pub target_id: u32,
}

impl AgentTelemetryRow {
    pub fn new(tick: Tick, t: &AgentTelemetry) -> Self {
        Self {
            tick:      tick.0,
            agent_id:  t.agent.0,
            object_id: t.object.0,
            mode:      t.mode.as_str(),
            submode:   t.submode,
            goal_id:   t.goal.map_or(u32::MAX, |g| g.0),
            goal_kind: t.goal_kind.unwrap_or(""),
            target_id: t.target.map_or(u32::MAX, |o| o.0),
        }
    }
}

/// One entry of the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:      u64,
    pub agent_id:  u32,
    pub object_id: u32,
    pub event:     &'static str,
    pub detail:    String,
}

impl From<&AgentEvent> for EventRow {
    fn from(e: &AgentEvent) -> Self {
        Self {
            tick:      e.tick.0,
            agent_id:  e.agent.0,
            object_id: e.object.0,
            event:     e.kind.name(),
            detail:    e.kind.to_string(),
        }
    }
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:        u64,
    pub sim_time_ms: u64,
    /// Agents whose intent reached the sink.
    pub acted:       u64,
    pub events:      u64,
}
