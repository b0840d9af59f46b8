//! Incoming munitions, missile lock and flight hazards.

use wm_core::{ObjectId, Vec3};
use wm_world::{ObjectState, Relation};

use crate::{CollisionHazard, Hazards, Observer, ScanContext, ShockwaveHazard, Threat};

/// Output of [`assess`].
pub struct ThreatPicture {
    pub threats:        Vec<Threat>,
    pub danger:         Option<ObjectId>,
    pub missile_locked: bool,
}

/// Time of closest approach and miss distance for two straight-line paths.
///
/// `rel_pos` and `rel_vel` are the other object's position and velocity
/// relative to the observer.  Returns `None` if they are not closing.
fn closest_approach(rel_pos: Vec3, rel_vel: Vec3) -> Option<(f32, f32)> {
    let v2 = rel_vel.length_sq();
    if v2 <= f32::EPSILON {
        return None;
    }
    let t = -rel_pos.dot(rel_vel) / v2;
    if t <= 0.0 {
        return None;
    }
    Some((t, (rel_pos + rel_vel * t).length()))
}

/// Rank incoming munitions and decide whether the agent is being locked.
pub fn assess(ctx: &ScanContext<'_>, observer: &Observer<'_>) -> ThreatPicture {
    let me = observer.ship;
    let profile = observer.profile;
    let mut threats = Vec::new();
    let mut missile_locked = false;

    for m in &ctx.munitions {
        let Some(info) = m.munition else { continue };
        let rel_pos = m.position - me.position;
        let rel_vel = m.velocity - me.velocity;

        if info.target == Some(me.id) {
            missile_locked = true;
            let dist = rel_pos.length();
            let closing = -rel_vel.dot(rel_pos.normalized());
            let tti = if closing > 0.0 { dist / closing } else { f32::INFINITY };
            threats.push(Threat {
                munition:       m.id,
                owner:          info.owner,
                position:       m.position,
                homing:         true,
                time_to_impact: tti,
                dangerous:      tti < profile.missile_danger_secs,
            });
        } else if info.target.is_none()
            && ctx.iff.relation(me.team, info.owner_team) == Relation::Hostile
        {
            let Some((t, miss)) = closest_approach(rel_pos, rel_vel) else { continue };
            if miss > me.radius + m.radius {
                continue;
            }
            threats.push(Threat {
                munition:       m.id,
                owner:          info.owner,
                position:       m.position,
                homing:         false,
                time_to_impact: t,
                dangerous:      t < profile.dumbfire_danger_secs,
            });
        }
    }

    if !missile_locked {
        missile_locked = ctx.lockers.iter().any(|l| {
            l.locking_target == Some(me.id) && ctx.iff.relation(me.team, l.team) == Relation::Hostile
        });
    }

    threats.sort_by(|a, b| {
        a.time_to_impact
            .total_cmp(&b.time_to_impact)
            .then(a.munition.cmp(&b.munition))
    });
    let danger = threats.iter().find(|t| t.dangerous).map(|t| t.munition);

    ThreatPicture { threats, danger, missile_locked }
}

/// Nearest collision course and nearest incoming shockwave.
pub fn hazards(ctx: &ScanContext<'_>, observer: &Observer<'_>) -> Hazards {
    let me = observer.ship;
    let lookahead = observer.profile.collision_lookahead_secs;

    let collision = ctx
        .obstacles
        .iter()
        .filter(|o| o.id != me.id)
        .filter_map(|o| collision_with(me, o, lookahead))
        .min_by(|a, b| a.time.total_cmp(&b.time).then(a.object.cmp(&b.object)));

    let shockwave = ctx
        .shockwaves
        .iter()
        .filter_map(|s| {
            let wave = s.shockwave?;
            let gap = s.position.distance(me.position) - me.radius;
            if gap > wave.max_radius {
                return None;
            }
            let time_to_reach = if gap <= wave.radius {
                0.0
            } else if wave.expansion_speed > 0.0 {
                (gap - wave.radius) / wave.expansion_speed
            } else {
                return None;
            };
            Some(ShockwaveHazard { object: s.id, center: s.position, time_to_reach })
        })
        .min_by(|a, b| a.time_to_reach.total_cmp(&b.time_to_reach).then(a.object.cmp(&b.object)));

    Hazards { collision, shockwave }
}

fn collision_with(me: &ObjectState, o: &ObjectState, lookahead: f32) -> Option<CollisionHazard> {
    let rel_pos = o.position - me.position;
    let clearance = me.radius + o.radius;
    if rel_pos.length() <= clearance {
        return Some(CollisionHazard { object: o.id, point: o.position, time: 0.0 });
    }
    let (t, miss) = closest_approach(rel_pos, o.velocity - me.velocity)?;
    (t <= lookahead && miss <= clearance).then(|| CollisionHazard {
        object: o.id,
        point:  o.predicted(t),
        time:   t,
    })
}
