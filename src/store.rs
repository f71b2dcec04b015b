//! Storage for rate limit counters.
//!
//! The limiter only talks to [`RateLimitStore`], so the process-local
//! [`InMemoryStore`] can be replaced by a shared backend when the gateway runs
//! as more than one process.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::rate_limit::RateLimitEntry;

pub trait RateLimitStore: Send + Sync {
    /// Current entry for `key`, if any.
    fn get(&self, key: &str) -> Option<RateLimitEntry>;

    /// Insert or overwrite the entry for `key`.
    fn set(&self, key: &str, entry: RateLimitEntry);

    /// Run `apply` against the slot for `key` with exclusive access to it.
    ///
    /// Leaving `None` in the slot removes the entry. No other caller observes
    /// the key between the read and the write.
    fn update(&self, key: &str, apply: &mut dyn FnMut(&mut Option<RateLimitEntry>));

    fn remove(&self, key: &str) -> Option<RateLimitEntry>;

    /// Drop every entry for which `keep` returns false. Returns how many were dropped.
    fn retain(&self, keep: &mut dyn FnMut(&str, &RateLimitEntry) -> bool) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide map from client key to counter, sharded by `DashMap`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| *entry)
    }

    fn set(&self, key: &str, entry: RateLimitEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    fn update(&self, key: &str, apply: &mut dyn FnMut(&mut Option<RateLimitEntry>)) {
        // the entry guard holds the shard write lock until it drops
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let mut slot = Some(*occupied.get());
                apply(&mut slot);
                match slot {
                    Some(updated) => *occupied.get_mut() = updated,
                    None => {
                        occupied.remove();
                    }
                }
            }
            Entry::Vacant(vacant) => {
                let mut slot = None;
                apply(&mut slot);
                if let Some(created) = slot {
                    vacant.insert(created);
                }
            }
        }
    }

    fn remove(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    fn retain(&self, keep: &mut dyn FnMut(&str, &RateLimitEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| keep(key, entry));
        before.saturating_sub(self.entries.len())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
