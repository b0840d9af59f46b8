//! Waypoint lists and object-relative paths.

use wm_core::{PathId, Vec3};

/// Frame in which a path's points are expressed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathFrame {
    /// Absolute world positions (mission waypoint lists).
    World,
    /// Offsets from an anchor object's position (bay approach paths).
    Relative,
}

#[derive(Clone, PartialEq, Debug)]
pub struct WaypointPath {
    pub id:     PathId,
    pub frame:  PathFrame,
    pub points: Vec<Vec3>,
}

impl WaypointPath {
    pub fn world(id: PathId, points: Vec<Vec3>) -> Self {
        Self { id, frame: PathFrame::World, points }
    }

    pub fn relative(id: PathId, points: Vec<Vec3>) -> Self {
        Self { id, frame: PathFrame::Relative, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// World position of point `i`.  `anchor` is ignored for world paths.
    pub fn resolve(&self, i: usize, anchor: Vec3) -> Option<Vec3> {
        let p = *self.points.get(i)?;
        Some(match self.frame {
            PathFrame::World    => p,
            PathFrame::Relative => anchor + p,
        })
    }
}
