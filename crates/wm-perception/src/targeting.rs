//! Target queries, the ignore list, and candidate search.

use wm_core::{AgentRng, ObjectId, Tick, Vec3};
use wm_world::{ObjectState, Relation};

use crate::sensors::{detects_directly, stealth_visible};
use crate::{Candidate, Observer, PerceptionMemory, ScanContext};

// ── TargetQuery ───────────────────────────────────────────────────────────────

/// Which objects the current goal wants considered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetQuery {
    /// Only this object (an ordered attack).
    Specific(ObjectId),
    /// Any detected hostile.
    AnyHostile,
    /// Detected hostiles within `radius` of `anchor` (guarding).
    NearAnchor { anchor: ObjectId, radius: f32 },
    /// The goal does not engage anything.
    NoTargets,
}

// ── IgnoreList ────────────────────────────────────────────────────────────────

/// Objects the agent will not pick as a target, each until an expiry tick.
#[derive(Clone, Debug, Default)]
pub struct IgnoreList {
    entries: Vec<(ObjectId, Tick)>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore `object` until `until` (exclusive).  Replaces an earlier entry.
    pub fn add(&mut self, object: ObjectId, until: Tick) {
        match self.entries.iter_mut().find(|(o, _)| *o == object) {
            Some(e) => e.1 = until,
            None => self.entries.push((object, until)),
        }
    }

    pub fn remove(&mut self, object: ObjectId) {
        self.entries.retain(|(o, _)| *o != object);
    }

    pub fn contains(&self, object: ObjectId, now: Tick) -> bool {
        self.entries.iter().any(|&(o, until)| o == object && now < until)
    }

    /// Drop expired entries.
    pub fn prune(&mut self, now: Tick) {
        self.entries.retain(|&(_, until)| now < until);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Candidate search ──────────────────────────────────────────────────────────

/// Objects worth testing for `query`, deduplicated, ascending id.
fn gather<'w>(
    ctx:      &ScanContext<'w>,
    observer: &Observer<'_>,
    query:    &TargetQuery,
    memory:   &PerceptionMemory,
) -> Vec<&'w ObjectState> {
    let world = ctx.world;
    let mut found: Vec<&ObjectState> = match *query {
        TargetQuery::NoTargets => return Vec::new(),
        TargetQuery::Specific(id) => return world.get(id).into_iter().collect(),
        TargetQuery::AnyHostile | TargetQuery::NearAnchor { .. } => {
            let reach = observer.sensor_range().max(observer.profile.stealth_detect_range);
            world.within(observer.ship.position, reach).collect()
        }
    };

    for bubble in ctx.awacs.iter().filter(|b| {
        ctx.iff.relation(observer.ship.team, b.team) == Relation::Friendly
    }) {
        found.extend(world.within(bubble.center, bubble.radius));
    }
    found.extend(memory.tracks.iter().filter_map(|t| world.get(t.object)));

    found.sort_unstable_by_key(|o| o.id);
    found.dedup_by_key(|o| o.id);

    if let TargetQuery::NearAnchor { anchor, radius } = *query {
        let Some(center) = world.get(anchor).map(|a| a.position) else {
            return Vec::new();
        };
        found.retain(|o| o.position.distance_sq(center) <= radius * radius);
    }
    found
}

/// Static eligibility: hostile, alive, attackable, not ignored.
fn eligible(ctx: &ScanContext<'_>, observer: &Observer<'_>, o: &ObjectState, ignore: &IgnoreList) -> bool {
    o.id != observer.ship.id
        && o.kind.is_targetable()
        && o.is_alive()
        && !o.flags.protected
        && ctx.iff.relation(observer.ship.team, o.team) == Relation::Hostile
        && !ignore.contains(o.id, ctx.now)
}

/// Ranked candidates plus the stealthed objects seen this tick.
pub(crate) fn candidates(
    ctx:      &ScanContext<'_>,
    observer: &Observer<'_>,
    query:    &TargetQuery,
    memory:   &mut PerceptionMemory,
    ignore:   &IgnoreList,
    rng:      &mut AgentRng,
) -> (Vec<Candidate>, Vec<ObjectId>) {
    let ordered = matches!(query, TargetQuery::Specific(_));
    let previous = memory.previous_target;
    let origin: Vec3 = observer.ship.position;

    let mut out = Vec::new();
    let mut stealth_seen = Vec::new();

    for o in gather(ctx, observer, query, memory) {
        if !eligible(ctx, observer, o, ignore) {
            continue;
        }
        let direct = detects_directly(ctx, observer, o, ordered);
        let visible = if o.flags.stealth && !o.flags.hidden {
            stealth_visible(ctx, observer, memory, o, direct, rng)
        } else {
            direct
        };
        if !visible {
            continue;
        }
        if o.flags.stealth {
            stealth_seen.push(o.id);
        }
        out.push(Candidate {
            id:       o.id,
            kind:     o.kind,
            position: o.position,
            distance: origin.distance(o.position),
            sticky:   previous == Some(o.id),
        });
    }

    rank(&mut out);
    (out, stealth_seen)
}

/// Sticky first, then nearest, then lowest id.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.sticky
            .cmp(&a.sticky)
            .then(a.distance.total_cmp(&b.distance))
            .then(a.id.cmp(&b.id))
    });
}
