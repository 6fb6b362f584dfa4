#![forbid(unsafe_code)]

//! Grouped, cancelable timeouts on a logical clock.
//!
//! [`TimeoutRegistry`] stores pending events keyed by a group tag. Time never
//! advances on its own: the owner asks for [`pop_due`](TimeoutRegistry::pop_due)
//! with the current logical time and receives at most one fired entry per
//! call, so each firing can observe the effects of the previous one.
//!
//! # Invariants
//!
//! 1. Entries fire in `(due, schedule order)` order.
//! 2. A canceled or cleared entry is removed immediately and can never fire.
//! 3. An entry fires at most once.
//! 4. `next_deadline()` is the minimum `due` over live entries.
//!
//! # Failure Modes
//!
//! - Canceling an unknown or already-fired id is a no-op that returns `None`.

use std::fmt;
use std::time::Duration;

/// Handle for a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeoutId(u64);

impl TimeoutId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimeoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timeout#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry<G, E> {
    id: TimeoutId,
    group: G,
    due: Duration,
    event: E,
}

/// A fired entry handed back by [`TimeoutRegistry::pop_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<G, E> {
    pub id: TimeoutId,
    pub group: G,
    pub due: Duration,
    pub event: E,
}

/// Pending timeouts tagged with a group `G` and carrying an event `E`.
#[derive(Debug, Clone)]
pub struct TimeoutRegistry<G, E> {
    entries: Vec<Entry<G, E>>,
    next_id: u64,
}

impl<G, E> Default for TimeoutRegistry<G, E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<G: Copy + Eq, E> TimeoutRegistry<G, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at absolute logical time `due`.
    pub fn schedule(&mut self, group: G, due: Duration, event: E) -> TimeoutId {
        let id = TimeoutId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            group,
            due,
            event,
        });
        id
    }

    /// Remove one entry, returning its event if it was still pending.
    pub fn cancel(&mut self, id: TimeoutId) -> Option<E> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).event)
    }

    /// Remove every entry in `group`. Returns how many were removed.
    pub fn clear_group(&mut self, group: G) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.group != group);
        before - self.entries.len()
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    #[must_use]
    pub fn contains(&self, id: TimeoutId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Number of live entries in `group`.
    #[must_use]
    pub fn pending(&self, group: G) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.group == group)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest due time among live entries.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Remove and return the earliest entry due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<G, E>> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;
        let entry = self.entries.remove(index);
        Some(Fired {
            id: entry.id,
            group: entry.group,
            due: entry.due,
            event: entry.event,
        })
    }
}
