//! The `Brain` trait — the seam between the orchestrator and the engine.

use wm_agent::{AgentContext, Mode};
use wm_core::{AgentRng, Tick};
use wm_goal::{GoalKind, Selection};
use wm_perception::TargetQuery;

use crate::modes::GUARD_RADIUS;
use crate::{ActionIntent, AgentEventKind, DecisionContext, engine, intent};

/// Pluggable per-agent decision logic.
///
/// # Thread safety
///
/// The orchestrator calls both methods for many agents in parallel, so
/// implementations must be `Send + Sync`.  Per-agent state belongs in the
/// `AgentContext` passed in, never in the brain itself.
///
/// # Example
///
/// ```rust,ignore
/// struct Sitting;
///
/// impl Brain for Sitting {
///     fn target_query(&self, _agent: &AgentContext, _now: Tick) -> TargetQuery {
///         TargetQuery::NoTargets
///     }
///
///     fn think(&self, _agent: &mut AgentContext, ctx: &DecisionContext<'_>,
///              _sel: &Selection, _rng: &mut AgentRng,
///              _events: &mut Vec<AgentEventKind>) -> ActionIntent {
///         ActionIntent::hold(ctx.ship)
///     }
/// }
/// ```
pub trait Brain: Send + Sync + 'static {
    /// Which objects this tick's perception scan should consider.
    ///
    /// Called in phase A, after goal selection.
    fn target_query(&self, agent: &AgentContext, now: Tick) -> TargetQuery;

    /// Decide this tick's action.
    ///
    /// `selection` is the outcome of this tick's goal revalidation.  Events
    /// pushed to `events` are reported after the tick in agent order.
    fn think(
        &self,
        agent:     &mut AgentContext,
        ctx:       &DecisionContext<'_>,
        selection: &Selection,
        rng:       &mut AgentRng,
        events:    &mut Vec<AgentEventKind>,
    ) -> ActionIntent;
}

/// Query implied by the agent's override or active goal.
pub fn target_query(agent: &AgentContext, now: Tick) -> TargetQuery {
    if agent.mode.is_disabled() {
        return TargetQuery::NoTargets;
    }
    if let Some(o) = agent.active_override(now) {
        return match o.mode {
            Mode::Chase => TargetQuery::AnyHostile,
            _ => TargetQuery::NoTargets,
        };
    }
    match agent.active_goal_kind() {
        Some(GoalKind::Attack { target }) => TargetQuery::Specific(target),
        Some(GoalKind::AttackAny) => TargetQuery::AnyHostile,
        Some(GoalKind::Guard { target }) => TargetQuery::NearAnchor { anchor: target, radius: GUARD_RADIUS },
        _ => TargetQuery::NoTargets,
    }
}

// ── StandardBrain ─────────────────────────────────────────────────────────────

/// The mode/submode engine followed by the action-intent builder.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardBrain;

impl Brain for StandardBrain {
    fn target_query(&self, agent: &AgentContext, now: Tick) -> TargetQuery {
        target_query(agent, now)
    }

    fn think(
        &self,
        agent:     &mut AgentContext,
        ctx:       &DecisionContext<'_>,
        selection: &Selection,
        rng:       &mut AgentRng,
        events:    &mut Vec<AgentEventKind>,
    ) -> ActionIntent {
        let directive = engine::update(agent, ctx, selection, rng, events);
        if agent.mode.is_disabled() {
            return ActionIntent::from_directive(&directive);
        }
        let intent = intent::build(&directive, ctx.perception, agent, ctx.now, rng);
        intent::commit_cooldowns(agent, &intent, ctx.now, ctx.clock);
        intent
    }
}

// ── PassiveBrain ──────────────────────────────────────────────────────────────

/// Never acts: holds position and looks for nothing.
///
/// Useful for target drones and for populations that only occupy space.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassiveBrain;

impl Brain for PassiveBrain {
    fn target_query(&self, _agent: &AgentContext, _now: Tick) -> TargetQuery {
        TargetQuery::NoTargets
    }

    fn think(
        &self,
        _agent:     &mut AgentContext,
        ctx:        &DecisionContext<'_>,
        _selection: &Selection,
        _rng:       &mut AgentRng,
        _events:    &mut Vec<AgentEventKind>,
    ) -> ActionIntent {
        ActionIntent::hold(ctx.ship)
    }
}
