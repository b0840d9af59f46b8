//! `GoalSchedule` — mission orders keyed by the tick they are issued at.
//!
//! `BTreeMap` keeps the ticks ordered, so releasing everything due is a
//! walk from the front that stops at the first future tick.

use std::collections::BTreeMap;

use wm_core::Tick;

use crate::GoalOrder;

#[derive(Default)]
pub struct GoalSchedule {
    inner: BTreeMap<Tick, Vec<GoalOrder>>,
    /// Cached total order count for O(1) `len()`.
    total: usize,
}

impl GoalSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue `order` at `tick`.
    pub fn push(&mut self, tick: Tick, order: GoalOrder) {
        self.inner.entry(tick).or_default().push(order);
        self.total += 1;
    }

    /// Remove and return every order due at or before `now`, oldest tick
    /// first, push order within a tick.
    pub fn release_due(&mut self, now: Tick) -> Vec<GoalOrder> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > now {
                break;
            }
            due.extend(entry.remove());
        }
        self.total -= due.len();
        due
    }

    /// The earliest tick with at least one order, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct ticks that still have orders.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
