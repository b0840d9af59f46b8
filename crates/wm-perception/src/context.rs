//! Shared per-tick scan inputs and the per-agent observer.

use wm_core::{SkillProfile, TeamId, Tick, TickClock, Vec3};
use wm_world::{Iff, ObjectKind, ObjectState, WorldSnapshot};

/// A friendly-to-someone AWACS bubble.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AwacsBubble {
    pub team:   TeamId,
    pub center: Vec3,
    pub radius: f32,
}

/// Read-only inputs shared by every agent's scan on one tick.
///
/// Built once after the snapshot is captured.  Sparse object classes that
/// every agent has to check (munitions, obstacles, shockwaves, AWACS,
/// locking ships) are pre-collected so a scan does not walk the whole
/// snapshot per agent.
pub struct ScanContext<'w> {
    pub world:     &'w WorldSnapshot,
    pub iff:       &'w dyn Iff,
    pub now:       Tick,
    pub clock:     &'w TickClock,
    pub(crate) munitions:  Vec<&'w ObjectState>,
    pub(crate) obstacles:  Vec<&'w ObjectState>,
    pub(crate) shockwaves: Vec<&'w ObjectState>,
    pub(crate) lockers:    Vec<&'w ObjectState>,
    pub(crate) awacs:      Vec<AwacsBubble>,
}

impl<'w> ScanContext<'w> {
    pub fn new(world: &'w WorldSnapshot, iff: &'w dyn Iff, clock: &'w TickClock) -> Self {
        let mut ctx = Self {
            world,
            iff,
            now: clock.current_tick,
            clock,
            munitions:  Vec::new(),
            obstacles:  Vec::new(),
            shockwaves: Vec::new(),
            lockers:    Vec::new(),
            awacs:      Vec::new(),
        };
        for o in world.objects().filter(|o| o.is_alive()) {
            match o.kind {
                ObjectKind::Munition if o.munition.is_some() => ctx.munitions.push(o),
                ObjectKind::Shockwave if o.shockwave.is_some() => ctx.shockwaves.push(o),
                k if k.is_obstacle() => ctx.obstacles.push(o),
                _ => {}
            }
            if o.locking_target.is_some() {
                ctx.lockers.push(o);
            }
            if o.awacs_radius > 0.0 {
                ctx.awacs.push(AwacsBubble { team: o.team, center: o.position, radius: o.awacs_radius });
            }
        }
        ctx
    }

    #[inline]
    pub fn tick_secs(&self) -> f32 {
        self.clock.tick_secs()
    }

    /// `true` if `pos` lies inside an AWACS bubble friendly to `team`.
    pub(crate) fn awacs_covers(&self, team: TeamId, pos: Vec3) -> bool {
        self.awacs.iter().any(|b| {
            self.iff.relation(team, b.team) == wm_world::Relation::Friendly
                && b.center.distance_sq(pos) <= b.radius * b.radius
        })
    }
}

/// The agent doing the looking.
#[derive(Clone, Copy)]
pub struct Observer<'a> {
    pub ship:    &'a ObjectState,
    pub profile: &'a SkillProfile,
}

impl<'a> Observer<'a> {
    pub fn new(ship: &'a ObjectState, profile: &'a SkillProfile) -> Self {
        Self { ship, profile }
    }

    /// Own sensor range after skill scaling.
    #[inline]
    pub fn sensor_range(&self) -> f32 {
        self.ship.sensor_range * self.profile.sensor_range_scale
    }
}
