//! Thread-safe goal submission for issuers outside the tick loop.

use std::sync::{Arc, Mutex, PoisonError};

use crate::GoalOrder;

/// Cloneable handle; every clone feeds the same buffer.
///
/// Orders are held until the orchestrator drains them at the sync point, so
/// no queue is touched while agents are being updated.
#[derive(Clone, Default)]
pub struct GoalInbox {
    pending: Arc<Mutex<Vec<GoalOrder>>>,
}

impl GoalInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, order: GoalOrder) {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).push(order);
    }

    /// Take every pending order in submission order.
    pub fn drain(&self) -> Vec<GoalOrder> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
