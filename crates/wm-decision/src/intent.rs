//! Directives and action intents.
//!
//! A mode produces a [`Directive`]: where to steer, how fast, and whether it
//! wants to engage.  [`build`] turns it into the [`ActionIntent`] handed to
//! the actuation sink by applying the weapon gates: range, cooldown, lock,
//! and a skill-dependent accuracy roll.  Nothing here touches the world; the
//! only side effect is on the agent's RNG, and [`commit_cooldowns`] is the
//! only function that writes agent state.

use wm_agent::{AgentContext, WeaponBank};
use wm_core::{AgentRng, ObjectId, Tick, TickClock, Vec3};
use wm_perception::PerceptionResult;
use wm_world::{ObjectKind, ObjectState};

// ── Directive ─────────────────────────────────────────────────────────────────

/// A mode's movement and engagement request for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub steer:    Vec3,
    pub facing:   Option<Vec3>,
    /// `0..=1` fraction of maximum speed.
    pub throttle: f32,
    /// The mode wants its weapons considered this tick.
    pub engage:   bool,
    pub target:   Option<ObjectId>,
}

impl Directive {
    /// Stay where the ship is.
    pub fn hold(ship: &ObjectState) -> Self {
        Self::toward(ship.position, 0.0)
    }

    pub fn toward(point: Vec3, throttle: f32) -> Self {
        Self {
            steer:    point,
            facing:   None,
            throttle: throttle.clamp(0.0, 1.0),
            engage:   false,
            target:   None,
        }
    }

    pub fn facing(mut self, point: Vec3) -> Self {
        self.facing = Some(point);
        self
    }

    /// Engage `target`, keeping the nose on it.
    pub fn engaging(mut self, target: &ObjectState) -> Self {
        self.engage = true;
        self.target = Some(target.id);
        self.facing.get_or_insert(target.position);
        self
    }
}

// ── ActionIntent ──────────────────────────────────────────────────────────────

/// What the agent asks its ship to do this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionIntent {
    pub steer:    Vec3,
    pub facing:   Option<Vec3>,
    pub throttle: f32,
    /// Primary bank to fire.
    pub fire_primary:   Option<usize>,
    /// Secondary bank to fire.
    pub fire_secondary: Option<usize>,
    pub deploy_countermeasure: bool,
    pub target:   Option<ObjectId>,
}

impl ActionIntent {
    /// Movement only, no weapons.
    pub fn from_directive(d: &Directive) -> Self {
        Self {
            steer:    d.steer,
            facing:   d.facing,
            throttle: d.throttle,
            fire_primary:   None,
            fire_secondary: None,
            deploy_countermeasure: false,
            target:   d.target,
        }
    }

    pub fn hold(ship: &ObjectState) -> Self {
        Self::from_directive(&Directive::hold(ship))
    }

    pub fn fires(&self) -> bool {
        self.fire_primary.is_some() || self.fire_secondary.is_some()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Apply the weapon and countermeasure gates to `directive`.
///
/// Deterministic for a given RNG state.  An accuracy roll is drawn only
/// when a bank passes the range and cooldown gates, so ticks where nothing
/// could fire leave the RNG untouched.
pub fn build(
    directive:  &Directive,
    perception: &PerceptionResult,
    agent:      &AgentContext,
    now:        Tick,
    rng:        &mut AgentRng,
) -> ActionIntent {
    let mut intent = ActionIntent::from_directive(directive);
    let profile = &agent.profile;

    let engaged = perception
        .target_candidate()
        .filter(|c| directive.engage && directive.target == Some(c.id));

    if let Some(target) = engaged {
        let primary = agent
            .loadout
            .primary
            .iter()
            .enumerate()
            .find(|&(i, b)| b.range >= target.distance && agent.cooldowns.primary_ready(i, now))
            .map(|(i, _)| i);
        if let Some(bank) = primary {
            if rng.roll(profile.accuracy) {
                intent.fire_primary = Some(bank);
            }
        }

        let capital = target.kind == ObjectKind::Capital;
        let secondary = secondary_order(&agent.loadout.secondary, capital).find(|&(i, b)| {
            b.range >= target.distance
                && agent.cooldowns.secondary_ready(i, now)
                && (!b.requires_lock || perception.is_locked())
        });
        if let Some((bank, _)) = secondary {
            if rng.roll(profile.accuracy) {
                intent.fire_secondary = Some(bank);
            }
        }
    }

    if perception.missile_locked
        && agent.loadout.countermeasures
        && agent.cooldowns.countermeasure_ready(now)
        && rng.roll(profile.countermeasure_chance)
    {
        intent.deploy_countermeasure = true;
    }
    intent
}

/// Secondary banks in preference order: anti-capital banks first against
/// capital ships, never against anything else.
fn secondary_order(
    banks:   &[WeaponBank],
    capital: bool,
) -> impl Iterator<Item = (usize, &WeaponBank)> + '_ {
    let preferred = banks.iter().enumerate().filter(move |(_, b)| capital && b.anti_capital);
    let rest = banks.iter().enumerate().filter(|(_, b)| !b.anti_capital);
    preferred.chain(rest)
}

/// Start the cooldown of every bank `intent` fires.
pub fn commit_cooldowns(agent: &mut AgentContext, intent: &ActionIntent, now: Tick, clock: &TickClock) {
    let primary = intent
        .fire_primary
        .and_then(|i| agent.loadout.primary.get(i).map(|b| (i, b.cooldown_secs)));
    if let Some((bank, secs)) = primary {
        agent.cooldowns.commit_primary(bank, secs, now, clock);
    }
    let secondary = intent
        .fire_secondary
        .and_then(|i| agent.loadout.secondary.get(i).map(|b| (i, b.cooldown_secs)));
    if let Some((bank, secs)) = secondary {
        agent.cooldowns.commit_secondary(bank, secs, now, clock);
    }
    if intent.deploy_countermeasure {
        let secs = agent.profile.countermeasure_cooldown_secs;
        agent.cooldowns.commit_countermeasure(secs, now, clock);
    }
}
