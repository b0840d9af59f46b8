//! Identification friend-or-foe.

use wm_core::TeamId;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Relation {
    Friendly,
    Hostile,
    Neutral,
}

/// Team relation lookup supplied by the host.
///
/// Shared by reference with every agent during the parallel phases.
pub trait Iff: Send + Sync {
    fn relation(&self, a: TeamId, b: TeamId) -> Relation;

    #[inline]
    fn is_hostile(&self, a: TeamId, b: TeamId) -> bool {
        self.relation(a, b) == Relation::Hostile
    }
}

/// Dense symmetric relation matrix.
///
/// A team is always friendly to itself.  Distinct teams start hostile;
/// unknown teams are neutral to everyone.
#[derive(Clone, Debug)]
pub struct IffTable {
    teams:  usize,
    matrix: Vec<Relation>,
}

impl IffTable {
    pub fn new(teams: usize) -> Self {
        let mut matrix = vec![Relation::Hostile; teams * teams];
        for t in 0..teams {
            matrix[t * teams + t] = Relation::Friendly;
        }
        Self { teams, matrix }
    }

    /// Set the relation between `a` and `b` in both directions.
    ///
    /// Ignored for unknown teams and for a team with itself.
    pub fn set(&mut self, a: TeamId, b: TeamId, relation: Relation) {
        let (a, b) = (a.index(), b.index());
        if a >= self.teams || b >= self.teams || a == b {
            return;
        }
        self.matrix[a * self.teams + b] = relation;
        self.matrix[b * self.teams + a] = relation;
    }

    pub fn team_count(&self) -> usize {
        self.teams
    }
}

impl Iff for IffTable {
    fn relation(&self, a: TeamId, b: TeamId) -> Relation {
        let (ai, bi) = (a.index(), b.index());
        if ai >= self.teams || bi >= self.teams {
            return Relation::Neutral;
        }
        self.matrix[ai * self.teams + bi]
    }
}
