//! Small steering helpers shared by the modes.

use wm_core::Vec3;
use wm_world::ObjectState;

/// Longest lead the pursuit prediction uses.
const MAX_LEAD_SECS: f32 = 3.0;

/// Where `target` will be when `ship` could get there.
pub(crate) fn lead(ship: &ObjectState, target: &ObjectState) -> Vec3 {
    let dist = ship.position.distance(target.position);
    let speed = ship.max_speed.max(1.0);
    target.predicted((dist / speed).min(MAX_LEAD_SECS))
}

/// Unit vector from `from` to `to`, or `fallback` if they coincide.
pub(crate) fn direction(from: Vec3, to: Vec3, fallback: Vec3) -> Vec3 {
    let d = (to - from).normalized();
    if d == Vec3::ZERO { fallback.normalized() } else { d }
}

/// A point `dist` metres from `ship`, directly away from `from`.
pub(crate) fn away_from(ship: &ObjectState, from: Vec3, dist: f32) -> Vec3 {
    ship.position + direction(from, ship.position, ship.forward) * dist
}

/// A point `dist` metres behind `target`.
pub(crate) fn behind(target: &ObjectState, dist: f32) -> Vec3 {
    target.position - target.forward.normalized() * dist
}

/// `ship` sits in `target`'s rear cone.
pub(crate) fn is_behind(ship: &ObjectState, target: &ObjectState) -> bool {
    target.forward.angle_deg(ship.position - target.position) >= 120.0
}

/// A point on a circle of `radius` around `center`, `angle` radians along.
///
/// The circle lies in the plane perpendicular to `axis`.
pub(crate) fn orbit(center: Vec3, axis: Vec3, radius: f32, angle: f32) -> Vec3 {
    let u = axis.any_perpendicular();
    let v = axis.normalized().cross(u);
    center + (u * angle.cos() + v * angle.sin()) * radius
}

/// Throttle that eases off inside `slow_radius` of the destination.
pub(crate) fn arrive(dist: f32, slow_radius: f32) -> f32 {
    if slow_radius <= 0.0 {
        return 1.0;
    }
    (dist / slow_radius).clamp(0.1, 1.0)
}
