//! The host seams: where snapshots come from and where intents go.

use wm_core::{AgentId, ObjectId, Tick};
use wm_decision::ActionIntent;
use wm_world::WorldSnapshot;

/// Supplies the world state for each tick.
///
/// Called once per tick, after the sync point and before any agent runs.
/// The returned snapshot is read-only for the rest of the tick.
pub trait WorldSource {
    fn capture(&mut self, tick: Tick) -> WorldSnapshot;
}

/// Receives every agent's intent during the apply phase.
///
/// Calls arrive in ascending `AgentId` order.
pub trait ActuationSink {
    fn apply(&mut self, agent: AgentId, object: ObjectId, intent: &ActionIntent);
}

/// A world that never changes.  Each capture is the same snapshot with the
/// tick updated.
pub struct StaticWorld {
    snapshot: WorldSnapshot,
}

impl StaticWorld {
    pub fn new(snapshot: WorldSnapshot) -> Self {
        Self { snapshot }
    }

    /// Replace the snapshot returned from the next capture on.
    pub fn set(&mut self, snapshot: WorldSnapshot) {
        self.snapshot = snapshot;
    }
}

impl WorldSource for StaticWorld {
    fn capture(&mut self, tick: Tick) -> WorldSnapshot {
        let mut s = self.snapshot.clone();
        s.tick = tick;
        // Removals are reported once.
        self.snapshot.removed.clear();
        s
    }
}

/// Discards every intent.
pub struct NullSink;

impl ActuationSink for NullSink {
    fn apply(&mut self, _agent: AgentId, _object: ObjectId, _intent: &ActionIntent) {}
}

/// Keeps every intent it receives, in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    pub intents: Vec<(AgentId, ObjectId, ActionIntent)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents of one agent, oldest first.
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &ActionIntent> + '_ {
        self.intents.iter().filter(move |(a, _, _)| *a == agent).map(|(_, _, i)| i)
    }
}

impl ActuationSink for RecordingSink {
    fn apply(&mut self, agent: AgentId, object: ObjectId, intent: &ActionIntent) {
        self.intents.push((agent, object, intent.clone()));
    }
}
