//! Per-object state as captured in a snapshot.

use wm_core::{ObjectId, TeamId, Vec3};

/// What an object is, as far as targeting and threat assessment care.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ObjectKind {
    Fighter,
    Bomber,
    /// Cruisers, corvettes, freighters: anything attacked with strafing runs.
    Capital,
    Turret,
    /// Missile, torpedo or bolt in flight.
    Munition,
    Countermeasure,
    /// Expanding blast front.
    Shockwave,
    Debris,
}

impl ObjectKind {
    /// Kinds an agent may pick as a target.
    #[inline]
    pub fn is_targetable(self) -> bool {
        matches!(self, Self::Fighter | Self::Bomber | Self::Capital | Self::Turret)
    }

    /// Kinds big enough to be worth steering around.
    #[inline]
    pub fn is_obstacle(self) -> bool {
        matches!(self, Self::Capital | Self::Debris)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fighter        => "fighter",
            Self::Bomber         => "bomber",
            Self::Capital        => "capital",
            Self::Turret         => "turret",
            Self::Munition       => "munition",
            Self::Countermeasure => "countermeasure",
            Self::Shockwave      => "shockwave",
            Self::Debris         => "debris",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named status toggles.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ObjectFlags {
    /// Cannot maneuver; movement goals are not permitted.
    pub engines_disabled: bool,
    /// Cannot fire; attack goals are not permitted.
    pub weapons_disabled: bool,
    /// Mission logic forbids attacking this object.
    pub protected: bool,
    /// Only detectable at close range, by AWACS, or through a stealth track.
    pub stealth: bool,
    /// Never detectable by sensors.
    pub hidden: bool,
    /// Left the battlefield (jumped out, docked into a hangar…).
    pub departed: bool,
}

/// Extra data carried by munitions.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Munition {
    pub owner: ObjectId,
    pub owner_team: TeamId,
    /// Homing target; `None` for dumbfire munitions.
    pub target: Option<ObjectId>,
}

impl Munition {
    #[inline]
    pub fn is_homing(&self) -> bool {
        self.target.is_some()
    }
}

/// Extra data carried by shockwaves.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Shockwave {
    pub radius: f32,
    pub max_radius: f32,
    /// Growth of `radius` in metres per second.
    pub expansion_speed: f32,
}

/// A docking bay on a ship, in the owner's local frame.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DockBay {
    pub index: u8,
    /// Bay position relative to the owner's position.
    pub offset: Vec3,
    /// Unit direction pointing out of the bay; the approach comes along it.
    pub outward: Vec3,
}

/// Everything the AI may read about one object on one tick.
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectState {
    pub id:             ObjectId,
    pub kind:           ObjectKind,
    pub team:           TeamId,
    pub position:       Vec3,
    pub velocity:       Vec3,
    /// Unit nose direction.
    pub forward:        Vec3,
    pub radius:         f32,
    /// Hull integrity in `[0, 1]`; zero means destroyed / disabled.
    pub hull:           f32,
    pub max_speed:      f32,
    /// Own sensor range in metres, before skill scaling.
    pub sensor_range:   f32,
    /// Radius within which this object reveals hostiles to its team.
    pub awacs_radius:   f32,
    pub flags:          ObjectFlags,
    pub munition:       Option<Munition>,
    pub shockwave:      Option<Shockwave>,
    /// Object this one is currently trying to aspect-lock.
    pub locking_target: Option<ObjectId>,
    pub dock_bays:      Vec<DockBay>,
}

impl ObjectState {
    /// A stationary, fully intact object facing +X.
    pub fn new(id: ObjectId, kind: ObjectKind, team: TeamId, position: Vec3) -> Self {
        Self {
            id,
            kind,
            team,
            position,
            velocity:       Vec3::ZERO,
            forward:        Vec3::X,
            radius:         10.0,
            hull:           1.0,
            max_speed:      0.0,
            sensor_range:   2_000.0,
            awacs_radius:   0.0,
            flags:          ObjectFlags::default(),
            munition:       None,
            shockwave:      None,
            locking_target: None,
            dock_bays:      Vec::new(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.forward = forward.normalized();
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_munition(mut self, munition: Munition) -> Self {
        self.munition = Some(munition);
        self
    }

    /// `true` if the object is on the battlefield and not destroyed.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hull > 0.0 && !self.flags.departed
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn bay(&self, index: u8) -> Option<&DockBay> {
        self.dock_bays.iter().find(|b| b.index == index)
    }

    /// World position of a bay, if it exists.
    pub fn bay_position(&self, index: u8) -> Option<Vec3> {
        self.bay(index).map(|b| self.position + b.offset)
    }

    /// Position `secs` seconds ahead assuming constant velocity.
    #[inline]
    pub fn predicted(&self, secs: f32) -> Vec3 {
        self.position + self.velocity * secs
    }
}
