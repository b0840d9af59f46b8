//! Goal value types.

use wm_core::{ObjectId, PathId};

// ── GoalKind ──────────────────────────────────────────────────────────────────

/// What the agent is asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GoalKind {
    /// Destroy one specific object.
    Attack { target: ObjectId },
    /// Engage whatever hostile is best.
    AttackAny,
    /// Stay near `target` and engage hostiles that threaten it.
    Guard { target: ObjectId },
    /// Dock with bay `bay` of `target`.
    Dock { target: ObjectId, bay: u8 },
    /// Fly a world-frame waypoint list, looping when `repeat` is set.
    Waypoints { path: PathId, repeat: bool },
    /// Fly a path expressed relative to `anchor`.
    FollowPath { anchor: ObjectId, path: PathId },
    /// Get away from `target`.
    EvadeShip { target: ObjectId },
    /// Hold position.
    StayStill,
}

impl GoalKind {
    /// The object this goal depends on, if any.
    pub fn referenced_object(&self) -> Option<ObjectId> {
        match *self {
            GoalKind::Attack { target }
            | GoalKind::Guard { target }
            | GoalKind::Dock { target, .. }
            | GoalKind::EvadeShip { target } => Some(target),
            GoalKind::FollowPath { anchor, .. } => Some(anchor),
            GoalKind::AttackAny | GoalKind::Waypoints { .. } | GoalKind::StayStill => None,
        }
    }

    /// Goals that need working engines.
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            GoalKind::Guard { .. }
                | GoalKind::Dock { .. }
                | GoalKind::Waypoints { .. }
                | GoalKind::FollowPath { .. }
                | GoalKind::EvadeShip { .. }
        )
    }

    /// Goals that need working weapons.
    pub fn is_attack(&self) -> bool {
        matches!(self, GoalKind::Attack { .. } | GoalKind::AttackAny)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Attack { .. }     => "attack",
            GoalKind::AttackAny         => "attack_any",
            GoalKind::Guard { .. }      => "guard",
            GoalKind::Dock { .. }       => "dock",
            GoalKind::Waypoints { .. }  => "waypoints",
            GoalKind::FollowPath { .. } => "follow_path",
            GoalKind::EvadeShip { .. }  => "evade_ship",
            GoalKind::StayStill         => "stay_still",
        }
    }
}

// ── Source and flags ──────────────────────────────────────────────────────────

/// Who issued a goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GoalSource {
    #[default]
    MissionScript,
    /// Raised by the simulation itself (e.g. a wingman reacting to an event).
    DynamicEvent,
    PlayerOrder,
}

impl GoalSource {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalSource::MissionScript => "mission",
            GoalSource::DynamicEvent  => "dynamic",
            GoalSource::PlayerOrder   => "player",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GoalFlags {
    /// At most one exclusive goal may be queued at a time.
    pub exclusive: bool,
    /// A newer exclusive goal may replace this one regardless of priority.
    pub overridable: bool,
    /// Only valid for agents that are not wing leaders.
    pub subordinate_only: bool,
    /// Once active, keeps the slot until achieved or invalid.
    pub must_complete: bool,
}

// ── Goal ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Goal {
    pub kind:     GoalKind,
    /// Higher wins.
    pub priority: i32,
    pub source:   GoalSource,
    pub flags:    GoalFlags,
}

impl Goal {
    pub fn new(kind: GoalKind, priority: i32) -> Self {
        Self { kind, priority, source: GoalSource::default(), flags: GoalFlags::default() }
    }

    pub fn with_source(mut self, source: GoalSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_flags(mut self, flags: GoalFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A goal addressed to the agent that controls `ship`.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalOrder {
    pub ship: ObjectId,
    pub goal: Goal,
}

impl GoalOrder {
    pub fn new(ship: ObjectId, goal: Goal) -> Self {
        Self { ship, goal }
    }
}
