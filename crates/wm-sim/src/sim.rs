//! The `Sim` struct and its tick loop.

use wm_agent::{AgentContext, AgentRngs, AgentSpec, AgentStore, AgentTelemetry, Mode};
use wm_core::{AgentId, AgentRng, GoalId, ObjectId, SimConfig, Tick, TickClock};
use wm_decision::{ActionIntent, AgentEvent, AgentEventKind, Brain, DecisionContext};
use wm_goal::{Goal, GoalError, GoalInbox, GoalOrder, GoalSchedule, Selection};
use wm_perception::{AttackerLedger, Observer, PerceptionResult, ScanContext, aspect};
use wm_world::{Iff, WorldSnapshot};

use crate::{ActuationSink, SimError, SimObserver, SimResult, WorldSource};

// ── Per-agent state carried between the phases ───────────────────────────────

/// What phase A hands to reconciliation and phase B for one agent.
struct Frame {
    selection:  Selection,
    perception: PerceptionResult,
    /// Events raised by this agent this tick, in order.
    events:     Vec<AgentEventKind>,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B>` holds every agent and drives the tick pipeline described in the
/// [crate docs](crate).  Agents never see each other's state during a tick:
/// phases A and B touch only the agent's own context and RNG, and the one
/// cross-agent decision (the attacker cap) is made sequentially in between.
///
/// Between ticks the host may issue goals, force modes, spawn agents and
/// report removed objects; all of it takes effect at the next sync point
/// or immediately on the agent's queue, never mid-tick.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: Brain> {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock: the next tick to process.
    pub clock: TickClock,

    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Decision logic.  Called once per live agent per tick.
    pub brain: B,

    /// Team relations.
    pub iff: Box<dyn Iff>,

    /// Orders from issuers outside the tick loop.
    pub inbox: GoalInbox,

    /// Mission orders keyed by the tick they are issued at.
    pub schedule: GoalSchedule,

    /// Objects the host reported removed since the last sync point.
    pub(crate) removals: Vec<ObjectId>,

    /// Events raised between ticks, reported with the next tick's events.
    pub(crate) pending_events: Vec<AgentEvent>,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<B: Brain> Sim<B> {
    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<S, K, O>(&mut self, source: &mut S, sink: &mut K, observer: &mut O) -> SimResult<()>
    where
        S: WorldSource,
        K: ActuationSink,
        O: SimObserver,
    {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(source, sink, observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and for hosts that own the frame loop.
    pub fn run_ticks<S, K, O>(&mut self, n: u64, source: &mut S, sink: &mut K, observer: &mut O) -> SimResult<()>
    where
        S: WorldSource,
        K: ActuationSink,
        O: SimObserver,
    {
        for _ in 0..n {
            self.step(source, sink, observer)?;
        }
        Ok(())
    }

    fn step<S, K, O>(&mut self, source: &mut S, sink: &mut K, observer: &mut O) -> SimResult<()>
    where
        S: WorldSource,
        K: ActuationSink,
        O: SimObserver,
    {
        let now = self.clock.current_tick;
        let span = tracing::debug_span!("tick", tick = now.0);
        let _enter = span.enter();

        observer.on_tick_start(now);
        let (acted, events) = self.process_tick(now, source, sink);
        if !events.is_empty() {
            observer.on_events(now, &events);
        }
        observer.on_tick_end(now, acted);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0 % interval == 0 {
            observer.on_snapshot(now, &self.telemetry());
        }

        self.clock.advance();
        Ok(())
    }

    // ── Host API ──────────────────────────────────────────────────────────

    /// The next tick to be processed.
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Queue `goal` on the agent controlling `ship`.
    ///
    /// A rejected goal is returned as `Err` and also reported as a
    /// `GoalRejected` event with the next tick's events.  Exclusive goals it
    /// supersedes are reported as `GoalSuperseded`.
    pub fn add_goal(&mut self, ship: ObjectId, goal: Goal) -> SimResult<GoalId> {
        let now = self.clock.current_tick;
        let ctx = self.agent_mut(ship)?;
        let (agent, kind) = (ctx.id, goal.kind);

        match ctx.goals.add_goal(goal) {
            Ok(id) => {
                let superseded = ctx.goals.drain_superseded();
                self.pending_events.extend(superseded.into_iter().map(|old| AgentEvent {
                    tick:   now,
                    agent,
                    object: ship,
                    kind:   AgentEventKind::GoalSuperseded { goal: old.id, kind: old.goal.kind },
                }));
                Ok(id)
            }
            Err(GoalError::Rejected { reason }) => {
                self.pending_events.push(AgentEvent {
                    tick:   now,
                    agent,
                    object: ship,
                    kind:   AgentEventKind::GoalRejected { kind, reason },
                });
                Err(GoalError::Rejected { reason }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a queued goal.  If it was active, the next selection picks
    /// another one.
    pub fn remove_goal(&mut self, ship: ObjectId, goal: GoalId) -> SimResult<Goal> {
        self.agent_mut(ship)?
            .goals
            .remove_goal(goal)
            .ok_or(SimError::UnknownGoal { ship, goal })
    }

    /// Force `mode` on the agent controlling `ship` until `until`.
    pub fn force_mode(&mut self, ship: ObjectId, mode: Mode, until: Tick) -> SimResult<()> {
        self.agent_mut(ship)?.force_mode(mode, until)?;
        tracing::debug!(%ship, %mode, %until, "mode override set");
        Ok(())
    }

    /// Drop a forced mode before it expires.  The goal's mode is re-entered
    /// on the next tick.
    pub fn clear_override(&mut self, ship: ObjectId) -> SimResult<()> {
        let ctx = self.agent_mut(ship)?;
        if let Some(o) = ctx.mode_override.as_mut() {
            o.until = Tick::ZERO;
        }
        Ok(())
    }

    /// Keep the agent controlling `ship` from targeting `object` until `until`.
    pub fn ignore_target(&mut self, ship: ObjectId, object: ObjectId, until: Tick) -> SimResult<()> {
        self.agent_mut(ship)?.ignore.add(object, until);
        Ok(())
    }

    pub fn unignore_target(&mut self, ship: ObjectId, object: ObjectId) -> SimResult<()> {
        self.agent_mut(ship)?.ignore.remove(object);
        Ok(())
    }

    /// Put a unit under AI control.  It runs from the next tick.
    pub fn spawn_agent(&mut self, spec: &AgentSpec) -> SimResult<AgentId> {
        let now = self.clock.current_tick;
        Ok(self.agents.spawn(spec, &mut self.rngs, now)?)
    }

    /// Report that `object` left the world.  Applied at the next sync point.
    pub fn notify_object_removed(&mut self, object: ObjectId) {
        self.removals.push(object);
    }

    /// State of every live agent in ascending id order.
    pub fn telemetry(&self) -> Vec<AgentTelemetry> {
        self.agents.iter().map(AgentContext::telemetry).collect()
    }

    /// A clone of the inbox handle, for issuers on other threads.
    pub fn inbox(&self) -> GoalInbox {
        self.inbox.clone()
    }

    fn agent_mut(&mut self, ship: ObjectId) -> SimResult<&mut AgentContext> {
        let agent = self.agents.agent_for(ship).ok_or(SimError::UnknownShip(ship))?;
        self.agents
            .get_mut(agent)
            .ok_or(SimError::UnknownShip(ship))
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<S, K>(&mut self, now: Tick, source: &mut S, sink: &mut K) -> (usize, Vec<AgentEvent>)
    where
        S: WorldSource,
        K: ActuationSink,
    {
        // ── ① Sync point ──────────────────────────────────────────────────
        self.take_orders(now);
        let removals = std::mem::take(&mut self.removals);
        self.remove_objects(removals, now);

        // ── ② Capture ─────────────────────────────────────────────────────
        let world = source.capture(now);
        if !world.removed.is_empty() {
            let removed = world.removed.clone();
            self.remove_objects(removed, now);
        }

        // ── ③–⑤ Per-agent phases ──────────────────────────────────────────
        let (intents, frames) = self.think_all(&world);

        // ── ⑥ Apply ───────────────────────────────────────────────────────
        //
        // Slot order is ascending AgentId, so sink calls and events come out
        // in the same order whether or not the phases ran in parallel.
        let mut events = std::mem::take(&mut self.pending_events);
        let mut acted = 0;
        for ((slot, intent), frame) in self.agents.slots().iter().zip(intents).zip(frames) {
            let (Some(agent), Some(intent), Some(frame)) = (slot, intent, frame) else {
                continue;
            };
            sink.apply(agent.id, agent.object, &intent);
            acted += 1;
            events.extend(frame.events.into_iter().map(|kind| AgentEvent {
                tick:   now,
                agent:  agent.id,
                object: agent.object,
                kind,
            }));
        }
        tracing::trace!(acted, events = events.len(), "tick applied");
        (acted, events)
    }

    /// Drain the inbox and every scheduled order that is due.
    fn take_orders(&mut self, now: Tick) {
        let mut orders = self.inbox.drain();
        orders.extend(self.schedule.release_due(now));
        for GoalOrder { ship, goal } in orders {
            if let Err(e) = self.add_goal(ship, goal) {
                tracing::debug!(%ship, error = %e, "order not queued");
            }
        }
    }

    /// Retire agents whose ship left and drop every reference to the objects.
    fn remove_objects(&mut self, objects: Vec<ObjectId>, now: Tick) {
        for object in objects {
            if let Some(agent) = self.agents.agent_for(object) {
                self.agents.retire(agent);
                self.pending_events.push(AgentEvent {
                    tick: now,
                    agent,
                    object,
                    kind: AgentEventKind::AgentRetired,
                });
            }
            for ctx in self.agents.iter_mut() {
                ctx.on_object_removed(object);
            }
        }
    }

    /// Phases A and B with reconciliation in between.
    ///
    /// Both returned vectors are index-aligned with the agent slots.
    fn think_all(&mut self, world: &WorldSnapshot) -> (Vec<Option<ActionIntent>>, Vec<Option<Frame>>) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let brain = &self.brain;
        let clock = &self.clock;
        let scan = ScanContext::new(world, self.iff.as_ref(), clock);
        let slots = self.agents.slots_mut();
        let rngs = self.rngs.inner.as_mut_slice();
        #[cfg(feature = "parallel")]
        let pool = self.pool.as_ref();

        // ── ③ Phase A ─────────────────────────────────────────────────────
        #[cfg(not(feature = "parallel"))]
        let mut frames: Vec<Option<Frame>> = slots
            .iter_mut()
            .zip(rngs.iter_mut())
            .map(|(slot, rng)| perceive(brain, slot.as_mut()?, rng, &scan))
            .collect();

        #[cfg(feature = "parallel")]
        let mut frames: Vec<Option<Frame>> = {
            use rayon::prelude::*;
            install(pool, || {
                slots
                    .par_iter_mut()
                    .zip(rngs.par_iter_mut())
                    .map(|(slot, rng)| perceive(brain, slot.as_mut()?, rng, &scan))
                    .collect()
            })
        };

        // ── ④ Reconcile ───────────────────────────────────────────────────
        let mut ledger = AttackerLedger::new();
        for (slot, frame) in slots.iter().zip(frames.iter_mut()) {
            if let (Some(agent), Some(frame)) = (slot, frame) {
                let cap = agent.profile.max_attackers;
                frame.perception.target = ledger.claim_sticky(&frame.perception.candidates, cap);
            }
        }
        for (slot, frame) in slots.iter().zip(frames.iter_mut()) {
            if let (Some(agent), Some(frame)) = (slot, frame) {
                if frame.perception.target.is_none() {
                    let cap = agent.profile.max_attackers;
                    frame.perception.target = ledger.claim_best(&frame.perception.candidates, cap);
                }
            }
        }

        // ── ⑤ Phase B ─────────────────────────────────────────────────────
        #[cfg(not(feature = "parallel"))]
        let intents: Vec<Option<ActionIntent>> = slots
            .iter_mut()
            .zip(rngs.iter_mut())
            .zip(frames.iter_mut())
            .map(|((slot, rng), frame)| decide(brain, slot.as_mut()?, rng, frame.as_mut()?, world, clock))
            .collect();

        #[cfg(feature = "parallel")]
        let intents: Vec<Option<ActionIntent>> = {
            use rayon::prelude::*;
            install(pool, || {
                slots
                    .par_iter_mut()
                    .zip(rngs.par_iter_mut())
                    .zip(frames.par_iter_mut())
                    .map(|((slot, rng), frame)| decide(brain, slot.as_mut()?, rng, frame.as_mut()?, world, clock))
                    .collect()
            })
        };

        (intents, frames)
    }
}

// ── Per-agent phase bodies ────────────────────────────────────────────────────

/// Phase A for one agent: goal selection, then the perception scan.
///
/// `None` when the agent's ship is not in the snapshot; such an agent sits
/// the tick out.
fn perceive<B: Brain>(brain: &B, agent: &mut AgentContext, rng: &mut AgentRng, scan: &ScanContext<'_>) -> Option<Frame> {
    let now = scan.now;
    let world = scan.world;
    let Some(ship) = world.get(agent.object) else {
        tracing::trace!(agent = %agent.id, ship = %agent.object, "ship missing from snapshot");
        return None;
    };

    let subject = agent.goal_subject(ship.flags);
    let mut selection = agent.goals.revalidate_and_select(world, &subject);
    let removed = std::mem::take(&mut agent.removed_goals);
    selection.invalidated.splice(0..0, removed);
    let events = selection
        .invalidated
        .iter()
        .map(|i| AgentEventKind::GoalInvalidated { goal: i.id, kind: i.goal.kind, reason: i.reason })
        .collect();

    agent.ignore.prune(now);
    let query = brain.target_query(agent, now);
    let observer = Observer::new(ship, &agent.profile);
    let perception = wm_perception::scan(scan, &observer, &query, &mut agent.memory, &agent.ignore, rng);
    tracing::trace!(
        agent = %agent.id,
        candidates = perception.candidates.len(),
        threats = perception.threats.len(),
        locked = perception.missile_locked,
        "perceived"
    );

    Some(Frame { selection, perception, events })
}

/// Phase B for one agent: aspect lock on the granted target, then the brain.
fn decide<B: Brain>(
    brain: &B,
    agent: &mut AgentContext,
    rng:   &mut AgentRng,
    frame: &mut Frame,
    world: &WorldSnapshot,
    clock: &TickClock,
) -> Option<ActionIntent> {
    let ship = world.get(agent.object)?;
    let visible = frame.perception.target_candidate().is_some();
    let target = frame.perception.target.and_then(|id| world.get(id));
    let lock_range = agent.loadout.lock_range();
    frame.perception.aspect_lock = aspect::track(
        &mut agent.memory.aspect,
        ship,
        target,
        visible,
        lock_range,
        &agent.profile,
        clock.tick_secs(),
    );

    let ctx = DecisionContext::new(world, &frame.perception, ship, clock);
    Some(brain.think(agent, &ctx, &frame.selection, rng, &mut frame.events))
}

/// Run `f` on the configured pool, or on Rayon's global pool.
#[cfg(feature = "parallel")]
fn install<R: Send>(pool: Option<&rayon::ThreadPool>, f: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(p) => p.install(f),
        None => f(),
    }
}
