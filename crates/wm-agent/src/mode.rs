//! Modes, submodes and the per-mode state an agent carries.
//!
//! A [`ModeState`] is a tagged union: each variant holds its own submode
//! and whatever timers or cursors only that mode needs.  Entering a mode
//! always builds a fresh variant, so nothing leaks from one activation to
//! the next.  The one exception is a route cursor: [`RouteProgress`] keeps
//! it across an interruption as long as the same goal stays active.

use std::fmt;

use wm_core::{GoalId, ObjectId, PathId, Tick};

// ── Mode ──────────────────────────────────────────────────────────────────────

/// Top-level behavior of an agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Mode {
    Idle,
    Chase,
    Evade,
    WaypointFollow,
    Guard,
    Dock,
    /// Attack runs against a capital ship.
    Strafe,
    PathFollow,
    /// Terminal.
    Disabled,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Idle,
        Mode::Chase,
        Mode::Evade,
        Mode::WaypointFollow,
        Mode::Guard,
        Mode::Dock,
        Mode::Strafe,
        Mode::PathFollow,
        Mode::Disabled,
    ];

    /// Modes an external override may force.
    #[inline]
    pub fn is_forceable(self) -> bool {
        matches!(self, Mode::Idle | Mode::Chase | Mode::Evade)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Idle           => "idle",
            Mode::Chase          => "chase",
            Mode::Evade          => "evade",
            Mode::WaypointFollow => "waypoint_follow",
            Mode::Guard          => "guard",
            Mode::Dock           => "dock",
            Mode::Strafe         => "strafe",
            Mode::PathFollow     => "path_follow",
            Mode::Disabled       => "disabled",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Submodes ──────────────────────────────────────────────────────────────────

/// Generate a submode enum with an `as_str` name table.
macro_rules! submode {
    ($(#[$attr:meta])* $name:ident { $first:ident => $first_s:literal $(, $v:ident => $s:literal)* $(,)? }) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
        pub enum $name {
            #[default]
            $first,
            $($v,)*
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$first => $first_s,
                    $($name::$v => $s,)*
                }
            }
        }
    };
}

submode! { IdleSub { Hold => "hold" } }

submode! {
    /// Pursuit tactics.  `Approach` is the entry submode; the others are
    /// picked when the engagement envelope is reached.
    ChaseSub {
        Approach      => "approach",
        GetBehind     => "get_behind",
        SuperAttack   => "super_attack",
        EvadeSquiggle => "evade_squiggle",
        CircleStrafe  => "circle_strafe",
        GlideAttack   => "glide_attack",
    }
}

submode! { EvadeSub { Break => "break", Weave => "weave", Flee => "flee" } }

submode! { WaypointSub { Travel => "travel", Arrived => "arrived" } }

submode! { GuardSub { Patrol => "patrol", Engage => "engage", Return => "return" } }

submode! {
    DockSub {
        Approach      => "approach",
        FinalApproach => "final_approach",
        Docked        => "docked",
    }
}

submode! {
    StrafeSub {
        Approach  => "approach",
        AttackRun => "attack_run",
        Retreat   => "retreat",
        Avoid     => "avoid",
    }
}

submode! { PathSub { FollowNode => "follow_node", EndOfPath => "end_of_path" } }

// ── ModeState ─────────────────────────────────────────────────────────────────

/// Current mode with its mode-local submode, timers and cursors.
#[derive(Clone, Debug, PartialEq)]
pub enum ModeState {
    Idle {
        sub: IdleSub,
    },
    Chase {
        sub:   ChaseSub,
        /// When `sub` was entered; patience is measured from here.
        since: Tick,
    },
    Evade {
        sub:   EvadeSub,
        since: Tick,
        /// Earliest tick at which an auxiliary evade may hand back.
        until: Tick,
        /// Ship being evaded, if any.
        from:  Option<ObjectId>,
    },
    WaypointFollow {
        sub:    WaypointSub,
        path:   PathId,
        index:  usize,
        repeat: bool,
    },
    Guard {
        sub:       GuardSub,
        protectee: ObjectId,
    },
    Dock {
        sub:    DockSub,
        target: ObjectId,
        bay:    u8,
    },
    Strafe {
        sub:   StrafeSub,
        since: Tick,
    },
    PathFollow {
        sub:    PathSub,
        anchor: ObjectId,
        path:   PathId,
        index:  usize,
    },
    Disabled,
}

impl Default for ModeState {
    fn default() -> Self {
        ModeState::Idle { sub: IdleSub::Hold }
    }
}

impl ModeState {
    pub fn mode(&self) -> Mode {
        match self {
            ModeState::Idle { .. }           => Mode::Idle,
            ModeState::Chase { .. }          => Mode::Chase,
            ModeState::Evade { .. }          => Mode::Evade,
            ModeState::WaypointFollow { .. } => Mode::WaypointFollow,
            ModeState::Guard { .. }          => Mode::Guard,
            ModeState::Dock { .. }           => Mode::Dock,
            ModeState::Strafe { .. }         => Mode::Strafe,
            ModeState::PathFollow { .. }     => Mode::PathFollow,
            ModeState::Disabled              => Mode::Disabled,
        }
    }

    /// Name of the current submode, `""` for `Disabled`.
    pub fn submode(&self) -> &'static str {
        match self {
            ModeState::Idle { sub }              => sub.as_str(),
            ModeState::Chase { sub, .. }         => sub.as_str(),
            ModeState::Evade { sub, .. }         => sub.as_str(),
            ModeState::WaypointFollow { sub, .. } => sub.as_str(),
            ModeState::Guard { sub, .. }         => sub.as_str(),
            ModeState::Dock { sub, .. }          => sub.as_str(),
            ModeState::Strafe { sub, .. }        => sub.as_str(),
            ModeState::PathFollow { sub, .. }    => sub.as_str(),
            ModeState::Disabled                  => "",
        }
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        matches!(self, ModeState::Disabled)
    }

    /// Path and cursor of a route-following mode.
    pub fn route(&self) -> Option<(PathId, usize)> {
        match self {
            ModeState::WaypointFollow { path, index, .. } | ModeState::PathFollow { path, index, .. } => {
                Some((*path, *index))
            }
            _ => None,
        }
    }

    fn set_route_index(&mut self, at: usize) {
        if let ModeState::WaypointFollow { index, .. } | ModeState::PathFollow { index, .. } = self {
            *index = at;
        }
    }
}

// ── Route progress ────────────────────────────────────────────────────────────

/// How far along its route the mode serving `goal` got.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RouteProgress {
    pub goal:  GoalId,
    pub path:  PathId,
    pub index: usize,
}

impl RouteProgress {
    /// Carry the cursor of the mode being left into the record.
    pub(crate) fn save(progress: &mut Option<RouteProgress>, leaving: &ModeState) {
        if let (Some(p), Some((path, index))) = (progress.as_mut(), leaving.route()) {
            if p.path == path {
                p.index = index;
            }
        }
    }

    /// Resume `entering` where the same goal left off on the same path, or
    /// start a fresh record for it.
    pub(crate) fn restore(progress: &mut Option<RouteProgress>, goal: Option<GoalId>, entering: &mut ModeState) {
        let Some((path, _)) = entering.route() else {
            return;
        };
        match *progress {
            Some(p) if Some(p.goal) == goal && p.path == path => entering.set_route_index(p.index),
            _ => *progress = goal.map(|goal| RouteProgress { goal, path, index: 0 }),
        }
    }
}

// ── Overrides ─────────────────────────────────────────────────────────────────

/// An externally forced mode, active until `until`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ModeOverride {
    pub mode:  Mode,
    pub until: Tick,
}

/// A steering override from collision or shockwave avoidance.
///
/// Replaces the mode's steering point only; the mode keeps running.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Avoidance {
    pub steer: wm_core::Vec3,
    pub until: Tick,
    /// Obstacle or shockwave being avoided.
    pub from:  ObjectId,
}
