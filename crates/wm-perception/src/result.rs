//! Ephemeral per-tick perception output.

use wm_core::{ObjectId, Vec3};
use wm_world::ObjectKind;

/// One eligible target, in ranking order inside `PerceptionResult`.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub id:       ObjectId,
    pub kind:     ObjectKind,
    pub position: Vec3,
    pub distance: f32,
    /// This was the agent's target last tick.
    pub sticky:   bool,
}

/// An incoming munition.
#[derive(Clone, Debug, PartialEq)]
pub struct Threat {
    pub munition:       ObjectId,
    pub owner:          ObjectId,
    pub position:       Vec3,
    pub homing:         bool,
    /// Seconds to impact (homing) or to closest approach (dumbfire).
    pub time_to_impact: f32,
    pub dangerous:      bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollisionHazard {
    pub object: ObjectId,
    /// Where the obstacle's centre will be at closest approach.
    pub point:  Vec3,
    pub time:   f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShockwaveHazard {
    pub object:        ObjectId,
    pub center:        Vec3,
    /// Seconds until the blast front reaches the agent's hull.
    pub time_to_reach: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hazards {
    pub collision: Option<CollisionHazard>,
    pub shockwave: Option<ShockwaveHazard>,
}

/// Everything one agent perceived on one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerceptionResult {
    /// Eligible targets, best first.
    pub candidates:     Vec<Candidate>,
    /// Target granted by the attacker ledger; `None` until reconciliation.
    pub target:         Option<ObjectId>,
    pub threats:        Vec<Threat>,
    /// The dangerous threat with the smallest time-to-impact.
    pub danger:         Option<ObjectId>,
    /// A homing munition or a locking hostile has this agent as its target.
    pub missile_locked: bool,
    /// Stealthed objects visible this tick, ascending id.
    pub visible_stealth: Vec<ObjectId>,
    /// Aspect-lock progress on `target`, `0..=1`.
    pub aspect_lock:    f32,
    pub hazards:        Hazards,
}

impl PerceptionResult {
    pub fn candidate(&self, id: ObjectId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// The granted target's candidate record.
    pub fn target_candidate(&self) -> Option<&Candidate> {
        self.target.and_then(|id| self.candidate(id))
    }

    pub fn is_locked(&self) -> bool {
        self.aspect_lock >= 1.0
    }
}
