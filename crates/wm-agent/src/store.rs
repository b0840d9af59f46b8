//! Agent slots (`AgentStore`) and their RNGs (`AgentRngs`).
//!
//! # Why two structs?
//!
//! The parallel decision phases need `&mut AgentContext` and `&mut AgentRng`
//! for the same agent at once, while other agents are processed on other
//! threads.  Keeping the RNGs in their own vector, index-aligned with the
//! slots, lets the orchestrator zip `slots_mut()` with `rngs.inner` and hand
//! each worker a disjoint pair.
//!
//! # Slot recycling
//!
//! When a unit leaves the world its slot is emptied and its `AgentId` goes
//! on a free list.  The next spawn reuses the lowest free id and reseeds the
//! slot's RNG for a new generation, so a recycled agent never replays the
//! random stream of its predecessor.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use wm_core::{AgentId, AgentRng, ObjectId, ProfileStore, Tick};

use crate::{AgentContext, AgentError, AgentResult, AgentSpec};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-slot deterministic RNG state, index-aligned with [`AgentStore`] slots.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
    seed: u64,
}

impl AgentRngs {
    pub(crate) fn new(seed: u64) -> Self {
        Self { inner: Vec::new(), seed }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentRng> {
        self.inner.get_mut(agent.index())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn seed_slot(&mut self, agent: AgentId, generation: u32) {
        let rng = AgentRng::for_generation(self.seed, agent, generation);
        match self.inner.get_mut(agent.index()) {
            Some(slot) => *slot = rng,
            None => self.inner.push(rng),
        }
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Recycling slot storage for every AI-controlled unit.
pub struct AgentStore {
    slots:         Vec<Option<AgentContext>>,
    generations:   Vec<u32>,
    free:          BTreeSet<AgentId>,
    by_object:     HashMap<ObjectId, AgentId>,
    profiles:      ProfileStore,
    goal_capacity: usize,
}

impl AgentStore {
    pub(crate) fn new(profiles: ProfileStore, goal_capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free: BTreeSet::new(),
            by_object: HashMap::new(),
            profiles,
            goal_capacity,
        }
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.by_object.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_object.is_empty()
    }

    /// Number of slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn goal_capacity(&self) -> usize {
        self.goal_capacity
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Put a unit under AI control.
    ///
    /// Fails if `spec.skill` has no profile.
    pub fn spawn(&mut self, spec: &AgentSpec, rngs: &mut AgentRngs, now: Tick) -> AgentResult<AgentId> {
        if self.by_object.contains_key(&spec.object) {
            return Err(AgentError::AlreadyControlled(spec.object));
        }
        let profile = self
            .profiles
            .get(spec.skill)
            .map_err(|_| AgentError::MissingProfile(spec.skill))?;

        let id = match self.free.pop_first() {
            Some(id) => id,
            None => {
                let id = AgentId::try_from(self.slots.len())
                    .map_err(|e| wm_core::CoreError::Config(format!("agent slots exhausted: {e}")))?;
                self.slots.push(None);
                self.generations.push(0);
                id
            }
        };
        rngs.seed_slot(id, self.generations[id.index()]);

        let ctx = AgentContext::new(id, spec, Arc::clone(&profile), self.goal_capacity, now);
        tracing::debug!(agent = %id, ship = %spec.object, skill = %spec.skill, "agent spawned");
        self.slots[id.index()] = Some(ctx);
        self.by_object.insert(spec.object, id);
        Ok(id)
    }

    /// Release an agent's slot.  Returns its final context.
    pub fn retire(&mut self, agent: AgentId) -> Option<AgentContext> {
        let ctx = self.slots.get_mut(agent.index())?.take()?;
        self.by_object.remove(&ctx.object);
        self.generations[agent.index()] = self.generations[agent.index()].wrapping_add(1);
        self.free.insert(agent);
        tracing::debug!(agent = %agent, ship = %ctx.object, "agent retired");
        Some(ctx)
    }

    pub fn get(&self, agent: AgentId) -> Option<&AgentContext> {
        self.slots.get(agent.index())?.as_ref()
    }

    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentContext> {
        self.slots.get_mut(agent.index())?.as_mut()
    }

    /// Agent controlling `object`, if any.
    pub fn agent_for(&self, object: ObjectId) -> Option<AgentId> {
        self.by_object.get(&object).copied()
    }

    /// Live agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentContext> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentContext> + '_ {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Ids of live agents in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.iter().map(|a| a.id)
    }

    /// All slots, index-aligned with [`AgentRngs::inner`].
    pub fn slots(&self) -> &[Option<AgentContext>] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Option<AgentContext>] {
        &mut self.slots
    }
}
