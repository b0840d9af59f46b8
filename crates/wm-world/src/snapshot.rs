//! Versioned, immutable world snapshot with a 3-D spatial index.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps object positions to their slot in
//! `objects`.  Perception uses it for every radius query (sensor sweeps,
//! threat scans, AWACS coverage), so a scan touches only the neighbourhood
//! of the agent instead of the whole object list.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use wm_core::{ObjectId, PathId, Tick, Vec3};

use crate::{ObjectState, WaypointPath, WorldError, WorldResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct ObjectEntry {
    point: [f32; 3],
    slot:  usize,
}

impl RTreeObject for ObjectEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for ObjectEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── WorldSnapshot ─────────────────────────────────────────────────────────────

/// Read-only view of every object for one tick.
///
/// Do not construct directly; use [`WorldSnapshotBuilder`].
#[derive(Clone)]
pub struct WorldSnapshot {
    /// Monotonic capture counter, bumped by the host for every capture.
    pub version: u64,
    /// Tick the snapshot was captured for.
    pub tick:    Tick,
    /// Objects removed from the world since the previous capture.
    pub removed: Vec<ObjectId>,

    objects: Vec<ObjectState>,
    index:   HashMap<ObjectId, usize>,
    paths:   HashMap<PathId, WaypointPath>,
    spatial: RTree<ObjectEntry>,
}

impl WorldSnapshot {
    /// A snapshot with no objects or paths.
    pub fn empty(tick: Tick) -> Self {
        WorldSnapshotBuilder::new(0, tick).build()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&ObjectState> {
        self.index.get(&id).map(|&slot| &self.objects[slot])
    }

    /// `true` if `id` exists, is not destroyed and has not departed.
    #[inline]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(ObjectState::is_alive)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectState> + '_ {
        self.objects.iter()
    }

    pub fn path(&self, id: PathId) -> Option<&WaypointPath> {
        self.paths.get(&id)
    }

    /// All objects whose centre lies within `radius` of `center`, in
    /// unspecified order.
    pub fn within(&self, center: Vec3, radius: f32) -> impl Iterator<Item = &ObjectState> + '_ {
        let r2 = if radius.is_finite() { radius.max(0.0) * radius.max(0.0) } else { f32::MAX };
        self.spatial
            .locate_within_distance(center.to_array(), r2)
            .map(|e| &self.objects[e.slot])
    }

    /// The object nearest to `center` that satisfies `pred`.
    pub fn nearest_where<F>(&self, center: Vec3, mut pred: F) -> Option<&ObjectState>
    where
        F: FnMut(&ObjectState) -> bool,
    {
        self.spatial
            .nearest_neighbor_iter(&center.to_array())
            .map(|e| &self.objects[e.slot])
            .find(|o| pred(o))
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Collects objects and paths, then bulk-loads the R-tree once.
pub struct WorldSnapshotBuilder {
    version: u64,
    tick:    Tick,
    objects: Vec<ObjectState>,
    index:   HashMap<ObjectId, usize>,
    paths:   HashMap<PathId, WaypointPath>,
    removed: Vec<ObjectId>,
}

impl WorldSnapshotBuilder {
    pub fn new(version: u64, tick: Tick) -> Self {
        Self {
            version,
            tick,
            objects: Vec::new(),
            index:   HashMap::new(),
            paths:   HashMap::new(),
            removed: Vec::new(),
        }
    }

    /// Add one object.  Ids must be unique and positions finite.
    pub fn add_object(&mut self, object: ObjectState) -> WorldResult<()> {
        if !object.position.is_finite() || !object.velocity.is_finite() {
            return Err(WorldError::InvalidGeometry(object.id));
        }
        if self.index.contains_key(&object.id) {
            return Err(WorldError::DuplicateObject(object.id));
        }
        self.index.insert(object.id, self.objects.len());
        self.objects.push(object);
        Ok(())
    }

    pub fn add_path(&mut self, path: WaypointPath) -> WorldResult<()> {
        if self.paths.contains_key(&path.id) {
            return Err(WorldError::DuplicatePath(path.id));
        }
        self.paths.insert(path.id, path);
        Ok(())
    }

    /// Record that `id` left the world since the previous capture.
    pub fn mark_removed(&mut self, id: ObjectId) {
        self.removed.push(id);
    }

    pub fn build(self) -> WorldSnapshot {
        let entries = self
            .objects
            .iter()
            .enumerate()
            .map(|(slot, o)| ObjectEntry { point: o.position.to_array(), slot })
            .collect();

        WorldSnapshot {
            version: self.version,
            tick:    self.tick,
            removed: self.removed,
            objects: self.objects,
            index:   self.index,
            paths:   self.paths,
            spatial: RTree::bulk_load(entries),
        }
    }
}
