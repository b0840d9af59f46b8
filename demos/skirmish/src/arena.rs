//! A kinematic toy battlefield.
//!
//! Ships fly straight at their steering point at `throttle × max_speed`,
//! guns hit instantly when the AI fires within range, and missiles are real
//! objects that home on their target until they hit, run dry, or get decoyed
//! by a countermeasure.  Destroyed capital ships leave an expanding
//! shockwave behind.

use wm_core::{AgentId, ObjectId, PathId, SimRng, TeamId, Tick, Vec3};
use wm_decision::ActionIntent;
use wm_sim::{ActuationSink, WorldSource};
use wm_world::{DockBay, Munition, ObjectKind, ObjectState, Shockwave, WaypointPath, WorldSnapshot, WorldSnapshotBuilder};

// ── Tunables ──────────────────────────────────────────────────────────────────

pub const GUN_RANGE:        f32 = 800.0;
pub const MISSILE_RANGE:    f32 = 1_500.0;
const GUN_DAMAGE:           f32 = 0.04;
const MISSILE_DAMAGE:       f32 = 0.35;
const MISSILE_SPEED:        f32 = 260.0;
const MISSILE_FUEL_SECS:    f32 = 8.0;
const MISSILE_HIT_RADIUS:   f32 = 20.0;
const DECOY_CHANCE:         f32 = 0.6;
const SHOCKWAVE_MAX_RADIUS: f32 = 700.0;
const SHOCKWAVE_SPEED:      f32 = 140.0;

/// Patrol loop flown by wings with a `waypoints` order.
pub const PATROL: PathId = PathId(1);

struct Body {
    state: ObjectState,
    name:  String,
    /// Remaining flight time for munitions.
    fuel:  Option<f32>,
}

impl Body {
    fn ship(id: u32, name: &str, kind: ObjectKind, team: u8, pos: Vec3, max_speed: f32) -> Self {
        let mut state = ObjectState::new(ObjectId(id), kind, TeamId(team), pos);
        state.max_speed = max_speed;
        if kind == ObjectKind::Capital {
            state.radius = 120.0;
            state.sensor_range = 4_000.0;
            state.awacs_radius = 2_500.0;
        }
        Self { state, name: name.to_owned(), fuel: None }
    }
}

/// A destroyed object, as reported back to the host loop.
pub struct Kill {
    pub tick: Tick,
    pub id:   ObjectId,
    pub name: String,
    /// A ship rather than a spent munition or a faded shockwave.
    pub ship: bool,
}

pub struct Arena {
    bodies:  Vec<Body>,
    paths:   Vec<WaypointPath>,
    next_id: u32,
    dt:      f32,
    version: u64,
    now:     Tick,
    rng:     SimRng,
}

impl Arena {
    /// Alpha wing (team 0) around the carrier *Resolute*; Beta wing (team 1)
    /// escorting the cruiser *Marauder* 3 km away.
    pub fn skirmish(tick_secs: f32, seed: u64) -> Self {
        let mut carrier = Body::ship(10, "Resolute", ObjectKind::Capital, 0, Vec3::new(-800.0, 0.0, 0.0), 0.0);
        carrier.state.dock_bays.push(DockBay {
            index:   0,
            offset:  Vec3::new(0.0, -150.0, 0.0),
            outward: Vec3::new(0.0, -1.0, 0.0),
        });
        let cruiser = Body::ship(20, "Marauder", ObjectKind::Capital, 1, Vec3::new(2_600.0, 400.0, 0.0), 10.0);

        let bodies = vec![
            Body::ship(1, "Alpha 1", ObjectKind::Fighter, 0, Vec3::new(0.0, 0.0, 0.0), 120.0),
            Body::ship(2, "Alpha 2", ObjectKind::Bomber, 0, Vec3::new(0.0, 80.0, 0.0), 80.0),
            Body::ship(3, "Alpha 3", ObjectKind::Fighter, 0, Vec3::new(0.0, -80.0, 0.0), 120.0),
            carrier,
            Body::ship(11, "Beta 1", ObjectKind::Fighter, 1, Vec3::new(2_000.0, 300.0, 0.0), 120.0),
            Body::ship(12, "Beta 2", ObjectKind::Fighter, 1, Vec3::new(2_000.0, 500.0, 0.0), 120.0),
            Body::ship(13, "Beta 3", ObjectKind::Fighter, 1, Vec3::new(2_100.0, 400.0, 0.0), 120.0),
            cruiser,
        ];
        let patrol = WaypointPath::world(
            PATROL,
            vec![
                Vec3::new(1_800.0, 900.0, 0.0),
                Vec3::new(2_800.0, 900.0, 0.0),
                Vec3::new(2_800.0, -100.0, 0.0),
                Vec3::new(1_800.0, -100.0, 0.0),
            ],
        );

        Self {
            bodies,
            paths: vec![patrol],
            next_id: 100,
            dt: tick_secs,
            version: 0,
            now: Tick::ZERO,
            rng: SimRng::new(seed),
        }
    }

    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.body(id).map(|b| b.name.as_str())
    }

    /// Ships still flying, in id order.
    pub fn survivors(&self) -> impl Iterator<Item = (&str, &ObjectState)> + '_ {
        self.bodies
            .iter()
            .filter(|b| b.fuel.is_none() && b.state.kind.is_targetable())
            .map(|b| (b.name.as_str(), &b.state))
    }

    fn body(&self, id: ObjectId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.state.id == id)
    }

    fn body_mut(&mut self, id: ObjectId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.state.id == id)
    }

    fn spawn(&mut self, name: String, state: ObjectState, fuel: Option<f32>) {
        self.next_id += 1;
        self.bodies.push(Body { state, name, fuel });
    }

    // ── Physics step ──────────────────────────────────────────────────────

    /// Integrate one tick of the intents the agents just issued.
    ///
    /// Returns every object destroyed during the step.
    pub fn advance(&mut self, intents: Vec<(ObjectId, ActionIntent)>) -> Vec<Kill> {
        for (ship, intent) in &intents {
            self.fly(*ship, intent);
        }
        for (ship, intent) in &intents {
            self.fire(*ship, intent);
        }
        self.fly_munitions();
        self.grow_shockwaves();
        self.reap()
    }

    fn fly(&mut self, ship: ObjectId, intent: &ActionIntent) {
        let dt = self.dt;
        let Some(body) = self.body_mut(ship) else { return };
        let s = &mut body.state;

        let to = intent.steer - s.position;
        let dist = to.length();
        let speed = s.max_speed * intent.throttle.clamp(0.0, 1.0);
        // Never overshoot the steering point.
        let step = (speed * dt).min(dist);
        if dist > f32::EPSILON {
            let dir = to * (1.0 / dist);
            s.velocity = dir * (step / dt);
            s.position += dir * step;
            s.forward = dir;
        } else {
            s.velocity = Vec3::ZERO;
        }
        if let Some(facing) = intent.facing {
            let look = facing - s.position;
            if look.length_sq() > f32::EPSILON {
                s.forward = look.normalized();
            }
        }
        s.locking_target = intent.target;
    }

    fn fire(&mut self, ship: ObjectId, intent: &ActionIntent) {
        let Some(shooter) = self.body(ship).map(|b| b.state.clone()) else { return };

        if intent.deploy_countermeasure {
            self.decoy_missiles_on(ship);
        }
        let Some(target) = intent.target else { return };
        let Some(target_pos) = self.body(target).map(|b| b.state.position) else { return };
        let range = shooter.position.distance(target_pos);

        if intent.fire_primary.is_some() && range <= GUN_RANGE {
            if let Some(t) = self.body_mut(target) {
                t.state.hull -= GUN_DAMAGE;
            }
        }
        if intent.fire_secondary.is_some() && range <= MISSILE_RANGE {
            let id = ObjectId(self.next_id);
            let mut missile = ObjectState::new(id, ObjectKind::Munition, shooter.team, shooter.position)
                .with_velocity(shooter.forward * MISSILE_SPEED)
                .with_forward(shooter.forward)
                .with_radius(1.0)
                .with_munition(Munition { owner: ship, owner_team: shooter.team, target: Some(target) });
            missile.max_speed = MISSILE_SPEED;
            tracing::debug!(%ship, %target, missile = %id, "missile away");
            self.spawn(format!("missile {}", id.0), missile, Some(MISSILE_FUEL_SECS));
        }
    }

    /// Each missile homing on `ship` may lose its lock.
    fn decoy_missiles_on(&mut self, ship: ObjectId) {
        for b in &mut self.bodies {
            let Some(m) = b.state.munition.as_mut() else { continue };
            if m.target == Some(ship) && self.rng.unit() < DECOY_CHANCE {
                tracing::debug!(%ship, missile = %b.state.id, "missile decoyed");
                m.target = None;
            }
        }
    }

    fn fly_munitions(&mut self) {
        let dt = self.dt;
        let positions: Vec<(ObjectId, TeamId, Vec3)> = self
            .bodies
            .iter()
            .filter(|b| b.state.kind.is_targetable())
            .map(|b| (b.state.id, b.state.team, b.state.position))
            .collect();

        let mut hits = Vec::new();
        for b in self.bodies.iter_mut().filter(|b| b.fuel.is_some()) {
            let s = &mut b.state;
            let Some(m) = s.munition else { continue };
            if let Some(target) = m.target {
                if let Some(&(_, _, pos)) = positions.iter().find(|(id, _, _)| *id == target) {
                    let to = pos - s.position;
                    if to.length_sq() > f32::EPSILON {
                        s.forward = to.normalized();
                        s.velocity = s.forward * s.max_speed;
                    }
                }
            }
            s.position += s.velocity * dt;
            if let Some(fuel) = b.fuel.as_mut() {
                *fuel -= dt;
            }

            let struck = positions
                .iter()
                .filter(|(_, team, _)| *team != m.owner_team)
                .find(|(_, _, pos)| pos.distance(s.position) <= MISSILE_HIT_RADIUS);
            if let Some(&(victim, _, _)) = struck {
                hits.push(victim);
                b.fuel = Some(0.0);
            }
        }
        for victim in hits {
            if let Some(t) = self.body_mut(victim) {
                t.state.hull -= MISSILE_DAMAGE;
            }
        }
    }

    fn grow_shockwaves(&mut self) {
        let dt = self.dt;
        for b in &mut self.bodies {
            if let Some(w) = b.state.shockwave.as_mut() {
                w.radius += w.expansion_speed * dt;
            }
        }
    }

    /// Drop dead ships, spent munitions and finished shockwaves.
    fn reap(&mut self) -> Vec<Kill> {
        let now = self.now;
        let mut gone = Vec::new();
        let mut blasts = Vec::new();
        self.bodies.retain(|b| {
            let s = &b.state;
            let dead = match (b.fuel, s.shockwave) {
                (Some(fuel), _) => fuel <= 0.0,
                (None, Some(w)) => w.radius >= w.max_radius,
                (None, None) => !s.is_alive(),
            };
            if dead {
                if s.kind == ObjectKind::Capital {
                    blasts.push((b.name.clone(), s.team, s.position));
                }
                gone.push(Kill { tick: now, id: s.id, name: b.name.clone(), ship: s.kind.is_targetable() });
            }
            !dead
        });

        for (name, team, position) in blasts {
            let id = ObjectId(self.next_id);
            let mut wave = ObjectState::new(id, ObjectKind::Shockwave, team, position);
            wave.shockwave = Some(Shockwave {
                radius:          0.0,
                max_radius:      SHOCKWAVE_MAX_RADIUS,
                expansion_speed: SHOCKWAVE_SPEED,
            });
            tracing::info!(ship = %name, "capital ship destroyed, shockwave expanding");
            self.spawn(format!("{name} shockwave"), wave, None);
        }
        gone
    }
}

impl WorldSource for Arena {
    fn capture(&mut self, tick: Tick) -> WorldSnapshot {
        self.now = tick;
        self.version += 1;
        let mut b = WorldSnapshotBuilder::new(self.version, tick);
        for body in &self.bodies {
            if let Err(e) = b.add_object(body.state.clone()) {
                tracing::warn!(error = %e, "object left out of snapshot");
            }
        }
        for path in &self.paths {
            if let Err(e) = b.add_path(path.clone()) {
                tracing::warn!(error = %e, "path left out of snapshot");
            }
        }
        b.build()
    }
}

/// Collects intents during the apply phase for the next physics step.
#[derive(Default)]
pub struct Actuators {
    pending: Vec<(ObjectId, ActionIntent)>,
}

impl Actuators {
    pub fn take(&mut self) -> Vec<(ObjectId, ActionIntent)> {
        std::mem::take(&mut self.pending)
    }
}

impl ActuationSink for Actuators {
    fn apply(&mut self, _agent: AgentId, object: ObjectId, intent: &ActionIntent) {
        self.pending.push((object, intent.clone()));
    }
}
