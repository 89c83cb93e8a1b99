use std::cmp::max;

use crossbeam_queue::{ArrayQueue, SegQueue};
use parking_lot::Mutex;

use crate::Entry;

/// A concurrent reuse pool that a [`Pool`](crate::Pool) delegates to.
///
/// Implementations give no ordering guarantee and are free to discard any
/// released entry at any time, except that they must never drop an entry that
/// is still retained (see [`Entry::is_retained`]) on their own initiative.
pub trait Recycler<T>: Send + Sync {
    /// Take an idle entry. Return `None` if there is none, in which case the
    /// pool builds a new item.
    fn acquire(&self) -> Option<Entry<T>>;

    /// Hand an entry back for reuse.
    fn release(&self, entry: Entry<T>);
}

/// The default [`Recycler`], backed by two bounded lock-free queues.
///
/// Released entries land in the primary cache. Every [`collect`](Self::collect)
/// cycle drops the unretained entries of the victim cache and demotes the
/// primary cache to be the next victim, so an idle entry survives one cycle and
/// is reclaimed on the second. Retained entries are kept across cycles, and a
/// retained entry released while both caches are full is parked in an unbounded
/// overflow queue instead of being dropped.
///
/// # Example
///
/// ```rust
/// use static_pool::{Entry, QueueRecycler, Recycler};
///
/// let recycler = QueueRecycler::new(4);
/// recycler.release(Entry::new(1u32));
/// assert_eq!(recycler.len(), 1);
/// assert_eq!(recycler.collect(), 0);
/// assert_eq!(recycler.collect(), 1);
/// assert!(recycler.acquire().is_none());
/// ```
#[derive(Debug)]
pub struct QueueRecycler<T> {
    /// Recently released entries.
    primary: ArrayQueue<Entry<T>>,
    /// Entries that survived one collection cycle.
    victim: ArrayQueue<Entry<T>>,
    /// Retained entries that did not fit in either cache.
    overflow: SegQueue<Entry<T>>,
    /// Serializes collection cycles.
    collecting: Mutex<()>,
}

impl<T> QueueRecycler<T> {
    /// Create a recycler where each cache holds up to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = max(1, capacity);
        Self {
            primary: ArrayQueue::new(capacity),
            victim: ArrayQueue::new(capacity),
            overflow: SegQueue::new(),
            collecting: Mutex::new(()),
        }
    }

    /// Capacity of each cache.
    pub fn capacity(&self) -> usize {
        self.primary.capacity()
    }

    /// Number of idle entries held.
    pub fn len(&self) -> usize {
        self.primary.len() + self.victim.len() + self.overflow.len()
    }

    /// Check if no idle entry is held.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.victim.is_empty() && self.overflow.is_empty()
    }

    /// Run one collection cycle and return how many entries were dropped.
    pub fn collect(&self) -> usize {
        let _cycle = self.collecting.lock();
        let mut reclaimed = 0;
        let mut survivors = Vec::new();

        while let Some(entry) = self.victim.pop() {
            if entry.is_retained() {
                survivors.push(entry);
            } else {
                reclaimed += 1;
            }
        }
        let idle = std::iter::from_fn(|| self.primary.pop())
            .chain(std::iter::from_fn(|| self.overflow.pop()));
        for entry in idle {
            if entry.is_retained() {
                survivors.push(entry);
            } else if self.victim.push(entry).is_err() {
                reclaimed += 1;
            }
        }
        for entry in survivors {
            self.store(entry);
        }

        if reclaimed > 0 {
            tracing::trace!(reclaimed, idle = self.len(), "collected idle entries");
        }
        reclaimed
    }

    /// Push to the primary cache, spilling into the victim cache. When both are
    /// full, unretained entries are dropped and retained ones overflow.
    fn store(&self, entry: Entry<T>) {
        let Err(entry) = self.primary.push(entry) else {
            return;
        };
        let Err(entry) = self.victim.push(entry) else {
            return;
        };
        if entry.is_retained() {
            self.overflow.push(entry);
        }
    }
}

impl<T: Send> Recycler<T> for QueueRecycler<T> {
    fn acquire(&self) -> Option<Entry<T>> {
        self.primary
            .pop()
            .or_else(|| self.victim.pop())
            .or_else(|| self.overflow.pop())
    }

    fn release(&self, entry: Entry<T>) {
        self.store(entry);
    }
}
