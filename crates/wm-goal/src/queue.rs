//! Bounded per-agent goal queue with tick-by-tick revalidation.

use wm_core::{GoalId, ObjectId};
use wm_world::{ObjectFlags, WorldSnapshot};

use crate::{Goal, GoalError, GoalKind, GoalResult, RejectReason};

// ── Public records ────────────────────────────────────────────────────────────

/// A goal as stored in the queue.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedGoal {
    pub id:   GoalId,
    /// Insertion sequence; breaks priority ties (lower wins).
    pub seq:  u64,
    pub goal: Goal,
}

/// Facts about the agent's own ship that decide whether a goal is permitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoalSubject {
    pub flags:       ObjectFlags,
    pub wing_leader: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    /// A referenced object is missing, destroyed or departed.
    TargetGone,
    /// The dock target has no such bay.
    BayMissing,
    /// The waypoint list or relative path is not in the snapshot.
    PathMissing,
    /// The subject ship may not pursue this kind of goal right now.
    NotPermitted,
}

impl InvalidReason {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidReason::TargetGone   => "target gone",
            InvalidReason::BayMissing   => "bay missing",
            InvalidReason::PathMissing  => "path missing",
            InvalidReason::NotPermitted => "not permitted",
        }
    }
}

/// A goal dropped during revalidation.
#[derive(Clone, Debug, PartialEq)]
pub struct Invalidation {
    pub id:     GoalId,
    pub goal:   Goal,
    pub reason: InvalidReason,
    /// `true` if this was the active goal when it was dropped.
    pub was_active: bool,
}

/// Outcome of [`GoalQueue::revalidate_and_select`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub active:      Option<GoalId>,
    /// The active goal differs from the one before this call.
    pub changed:     bool,
    pub invalidated: Vec<Invalidation>,
}

// ── GoalQueue ─────────────────────────────────────────────────────────────────

/// Prioritized, bounded set of goals for one agent.
///
/// Goals are kept in insertion order; selection sorts a view of them so the
/// result never depends on the order of removals.
#[derive(Clone, Debug)]
pub struct GoalQueue {
    capacity:    usize,
    entries:     Vec<QueuedGoal>,
    active:      Option<GoalId>,
    /// The active goal was removed since the last selection.
    active_lost: bool,
    next_id:     u32,
    next_seq:    u64,
    superseded:  Vec<QueuedGoal>,
}

impl GoalQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries:     Vec::with_capacity(capacity),
            active:      None,
            active_lost: false,
            next_id:     0,
            next_seq:    0,
            superseded:  Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedGoal> + '_ {
        self.entries.iter()
    }

    pub fn get(&self, id: GoalId) -> Option<&QueuedGoal> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn active_id(&self) -> Option<GoalId> {
        self.active
    }

    /// The active goal, if any.
    pub fn active(&self) -> Option<&QueuedGoal> {
        self.active.and_then(|id| self.get(id))
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Queue `goal`.
    ///
    /// Rejected with [`RejectReason::ExclusiveConflict`] when an exclusive,
    /// non-overridable goal of equal or higher priority is queued, and with
    /// [`RejectReason::QueueFull`] when no slot is free.  When `goal` is
    /// exclusive, every other exclusive goal it beats is removed; those are
    /// available from [`GoalQueue::drain_superseded`].  A rejected goal
    /// leaves the queue untouched.
    pub fn add_goal(&mut self, goal: Goal) -> GoalResult<GoalId> {
        let mut beaten = Vec::new();
        for e in self.entries.iter().filter(|e| e.goal.flags.exclusive) {
            if !e.goal.flags.overridable && e.goal.priority >= goal.priority {
                tracing::warn!(kind = goal.kind.as_str(), blocker = %e.id, "goal rejected: exclusive conflict");
                return Err(GoalError::Rejected { reason: RejectReason::ExclusiveConflict });
            }
            if goal.flags.exclusive {
                beaten.push(e.id);
            }
        }

        if self.entries.len() - beaten.len() >= self.capacity {
            tracing::warn!(kind = goal.kind.as_str(), capacity = self.capacity, "goal rejected: queue full");
            return Err(GoalError::Rejected { reason: RejectReason::QueueFull });
        }

        for id in beaten {
            if let Some(old) = self.take(id) {
                tracing::debug!(goal = %old.id, kind = old.goal.kind.as_str(), "goal superseded");
                self.superseded.push(old);
            }
        }

        let id = GoalId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!(goal = %id, kind = goal.kind.as_str(), priority = goal.priority, "goal queued");
        self.entries.push(QueuedGoal { id, seq, goal });
        Ok(id)
    }

    /// Goals removed by exclusive supersession since the last call.
    pub fn drain_superseded(&mut self) -> Vec<QueuedGoal> {
        std::mem::take(&mut self.superseded)
    }

    /// Remove a goal by id.  Removing the active goal leaves no goal active
    /// until the next selection.
    pub fn remove_goal(&mut self, id: GoalId) -> Option<Goal> {
        self.take(id).map(|e| e.goal)
    }

    /// Remove an achieved goal.
    pub fn complete(&mut self, id: GoalId) -> Option<Goal> {
        let goal = self.remove_goal(id)?;
        tracing::debug!(goal = %id, kind = goal.kind.as_str(), "goal achieved");
        Some(goal)
    }

    /// Drop every goal that references `object`.
    pub fn on_object_removed(&mut self, object: ObjectId) -> Vec<Invalidation> {
        let doomed: Vec<GoalId> = self
            .entries
            .iter()
            .filter(|e| e.goal.kind.referenced_object() == Some(object))
            .map(|e| e.id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.invalidate(id, InvalidReason::TargetGone))
            .collect()
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Drop goals that fail against `world`, then pick the active goal.
    pub fn revalidate_and_select(&mut self, world: &WorldSnapshot, subject: &GoalSubject) -> Selection {
        let failing: Vec<(GoalId, InvalidReason)> = self
            .entries
            .iter()
            .filter_map(|e| check(&e.goal, world, subject).err().map(|r| (e.id, r)))
            .collect();

        let invalidated: Vec<Invalidation> = failing
            .into_iter()
            .filter_map(|(id, reason)| self.invalidate(id, reason))
            .collect();

        let (active, changed) = self.select();
        Selection { active, changed, invalidated }
    }

    /// Pick the active goal among the queued ones without revalidating.
    ///
    /// Returns the new active id and whether it changed.
    pub fn reselect(&mut self) -> (Option<GoalId>, bool) {
        self.select()
    }

    fn select(&mut self) -> (Option<GoalId>, bool) {
        let previous = self.active;
        let lost = std::mem::take(&mut self.active_lost);
        let keep = self.active().filter(|e| e.goal.flags.must_complete).map(|e| e.id);
        self.active = keep.or_else(|| self.best().map(|e| e.id));
        (self.active, lost || self.active != previous)
    }

    /// Highest priority, earliest inserted.
    fn best(&self) -> Option<&QueuedGoal> {
        self.entries
            .iter()
            .min_by(|a, b| b.goal.priority.cmp(&a.goal.priority).then(a.seq.cmp(&b.seq)))
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn take(&mut self, id: GoalId) -> Option<QueuedGoal> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        if self.active == Some(id) {
            self.active = None;
            self.active_lost = true;
        }
        Some(self.entries.remove(pos))
    }

    fn invalidate(&mut self, id: GoalId, reason: InvalidReason) -> Option<Invalidation> {
        let was_active = self.active == Some(id);
        let e = self.take(id)?;
        tracing::debug!(goal = %id, kind = e.goal.kind.as_str(), reason = reason.as_str(), "goal invalidated");
        Some(Invalidation { id, goal: e.goal, reason, was_active })
    }
}

/// Liveness, reachability and permission for one goal.
fn check(goal: &Goal, world: &WorldSnapshot, subject: &GoalSubject) -> Result<(), InvalidReason> {
    if goal.flags.subordinate_only && subject.wing_leader {
        return Err(InvalidReason::NotPermitted);
    }
    if goal.kind.is_movement() && subject.flags.engines_disabled {
        return Err(InvalidReason::NotPermitted);
    }
    if goal.kind.is_attack() && subject.flags.weapons_disabled {
        return Err(InvalidReason::NotPermitted);
    }
    if let Some(obj) = goal.kind.referenced_object() {
        if !world.is_alive(obj) {
            return Err(InvalidReason::TargetGone);
        }
    }
    match goal.kind {
        GoalKind::Dock { target, bay } => {
            if world.get(target).and_then(|t| t.bay(bay)).is_none() {
                return Err(InvalidReason::BayMissing);
            }
        }
        GoalKind::Waypoints { path, .. } | GoalKind::FollowPath { path, .. } => {
            if world.path(path).is_none() {
                return Err(InvalidReason::PathMissing);
            }
        }
        _ => {}
    }
    Ok(())
}
