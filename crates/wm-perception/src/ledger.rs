//! Attacker-count cap shared by all agents for one tick.
//!
//! Grants are handed out sequentially in ascending `AgentId` order by the
//! orchestrator: first every agent that wants to keep last tick's target
//! (sticky claims), then everyone else.  An agent may take a target only
//! while fewer agents hold it than the smallest `max_attackers` among the
//! claimant and the current holders; if refused it falls through to its
//! next candidate.  Because the order is fixed, the
//! grants never depend on how the scans were spread over threads.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use wm_core::ObjectId;

use crate::Candidate;

/// Holders of one target and the tightest cap any of them brought.
#[derive(Copy, Clone)]
struct Claim {
    holders: u32,
    cap:     u32,
}

#[derive(Default)]
pub struct AttackerLedger {
    claims: HashMap<ObjectId, Claim>,
}

impl AttackerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of agents currently holding `target`.
    pub fn holders(&self, target: ObjectId) -> u32 {
        self.claims.get(&target).map_or(0, |c| c.holders)
    }

    /// Take `target` if fewer agents hold it than both `cap` and every
    /// current holder's cap allow.
    pub fn try_claim(&mut self, target: ObjectId, cap: u32) -> bool {
        let claim = self.claims.entry(target).or_insert(Claim { holders: 0, cap });
        let limit = claim.cap.min(cap);
        if claim.holders >= limit {
            return false;
        }
        claim.holders += 1;
        claim.cap = limit;
        true
    }

    /// Sticky pass: keep the top candidate if it is last tick's target.
    pub fn claim_sticky(&mut self, candidates: &[Candidate], cap: u32) -> Option<ObjectId> {
        let first = candidates.first().filter(|c| c.sticky)?;
        self.try_claim(first.id, cap).then_some(first.id)
    }

    /// Open pass: the first candidate, in ranking order, with room left.
    pub fn claim_best(&mut self, candidates: &[Candidate], cap: u32) -> Option<ObjectId> {
        candidates.iter().map(|c| c.id).find(|&id| self.try_claim(id, cap))
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }
}
