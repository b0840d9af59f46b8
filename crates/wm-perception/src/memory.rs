//! Perception state that persists across ticks.

use wm_core::{ObjectId, Tick, Vec3};

/// Last known whereabouts of a stealthed object.
#[derive(Clone, Debug, PartialEq)]
pub struct StealthTrack {
    pub object:     ObjectId,
    pub last_known: Vec3,
    /// Tick at which the track is dropped.
    pub deadline:   Tick,
    /// Length of the grace window in ticks; the sweep box shrinks over it.
    pub window:     u64,
}

impl StealthTrack {
    /// Half-extent of the sweep box at `now`.
    ///
    /// Shrinks linearly from `initial_half` when the track was refreshed to
    /// zero at the deadline.
    pub fn sweep_half(&self, now: Tick, initial_half: f32) -> f32 {
        if self.window == 0 {
            return 0.0;
        }
        let left = self.deadline.since(now) as f32 / self.window as f32;
        initial_half * left.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AspectLock {
    pub target:   Option<ObjectId>,
    /// `0..=1`; `1` means locked.
    pub progress: f32,
}

impl AspectLock {
    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}

#[derive(Clone, Debug, Default)]
pub struct PerceptionMemory {
    pub tracks:          Vec<StealthTrack>,
    pub aspect:          AspectLock,
    /// Target held at the end of the previous tick; ranked first if still
    /// eligible.
    pub previous_target: Option<ObjectId>,
}

impl PerceptionMemory {
    pub fn track(&self, object: ObjectId) -> Option<&StealthTrack> {
        self.tracks.iter().find(|t| t.object == object)
    }

    pub(crate) fn track_mut(&mut self, object: ObjectId) -> Option<&mut StealthTrack> {
        self.tracks.iter_mut().find(|t| t.object == object)
    }

    pub(crate) fn drop_track(&mut self, object: ObjectId) {
        self.tracks.retain(|t| t.object != object);
    }

    /// Forget everything about `object` (it left the world).
    pub fn forget(&mut self, object: ObjectId) {
        self.drop_track(object);
        if self.previous_target == Some(object) {
            self.previous_target = None;
        }
        if self.aspect.target == Some(object) {
            self.aspect = AspectLock::default();
        }
    }
}
