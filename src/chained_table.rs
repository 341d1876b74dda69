//! ChainedHashTable: fixed-capacity separate chaining with an insertion-order ledger.
//!
//! Entries live in a generational arena. Each bucket is a `Vec` of arena keys in
//! the order they were chained, and the ledger is a doubly linked list threaded
//! through the arena entries themselves. Both views point at the same slot, so
//! an entry is owned exactly once and value updates are visible through either.

use crate::config::{TableConfig, DEFAULT_TABLE_CAPACITY};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use log::trace;
use slotmap::{DefaultKey, SlotMap};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("table capacity must be at least one bucket")]
    ZeroCapacity,
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was new; it now sits at the tail of the iteration order.
    Inserted,
    /// The key existed; its value was replaced in place.
    Updated,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// Ends of the insertion-order list. Links live in the entries.
#[derive(Debug, Default, Clone, Copy)]
struct Ledger {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl Ledger {
    fn push_back<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        match self.tail {
            Some(t) => {
                if let Some(e) = slots.get_mut(t) {
                    e.next = Some(k);
                }
            }
            None => self.head = Some(k),
        }
        if let Some(e) = slots.get_mut(k) {
            e.prev = self.tail;
            e.next = None;
        }
        self.tail = Some(k);
    }

    /// Splice out an entry that has already been taken from `slots`.
    fn unlink<K, V>(
        &mut self,
        slots: &mut Slots<K, V>,
        prev: Option<DefaultKey>,
        next: Option<DefaultKey>,
    ) {
        match prev {
            Some(p) => {
                if let Some(e) = slots.get_mut(p) {
                    e.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(e) = slots.get_mut(n) {
                    e.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

/// Where a key lands and what scanning its chain found.
struct Probe {
    bucket: usize,
    hit: Option<Hit>,
    visited: usize,
}

struct Hit {
    pos: usize,
    slot: DefaultKey,
}

/// Hash table with separate chaining and a fixed number of buckets.
///
/// The bucket for a key is `hash(key) % capacity`, recomputed on every call.
/// The table never grows: at high load factors chains get long and lookups
/// degrade toward a linear scan of the chain. Iteration and the `all_*`
/// snapshots follow the order in which keys were first inserted.
///
/// Keys match by exact `Eq`. Callers that want case-insensitive identifiers
/// must normalize them before every call.
pub struct ChainedHashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Box<[Vec<DefaultKey>]>,
    slots: Slots<K, V>,
    ledger: Ledger,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    /// Table with the default bucket count and hasher.
    pub fn new() -> Self {
        Self::allocate(DEFAULT_TABLE_CAPACITY, DefaultHashBuilder::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, TableError> {
        Self::with_capacity(config.capacity)
    }
}

impl<K, V> Default for ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing iterator in insertion order.
pub struct Iter<'a, K, V> {
    slots: &'a Slots<K, V>,
    cursor: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.get(self.cursor?)?;
        self.cursor = e.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V, S> ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        Ok(Self::allocate(capacity, hasher))
    }

    fn allocate(capacity: usize, hasher: S) -> Self {
        debug_assert!(capacity > 0);
        let buckets: Box<[Vec<DefaultKey>]> = (0..capacity).map(|_| Vec::new()).collect();
        Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            ledger: Ledger::default(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        (self.hasher.hash_one(q) % self.buckets.len() as u64) as usize
    }

    fn locate<Q>(&self, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self.bucket_of(q);
        let chain = &self.buckets[bucket];
        let hit = chain.iter().enumerate().find_map(|(pos, &slot)| {
            self.slots
                .get(slot)
                .filter(|e| e.key.borrow() == q)
                .map(|_| Hit { pos, slot })
        });
        let visited = hit.as_ref().map(|h| h.pos + 1).unwrap_or(chain.len());
        Probe {
            bucket,
            hit,
            visited,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets. Never changes after construction.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `len / capacity`, the expected chain length a lookup has to scan.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Upsert. A new key is appended to its chain and to the end of the
    /// iteration order; an existing key keeps both positions and only its
    /// value is replaced.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        let _g = self.reentrancy.enter();
        let probe = self.locate(&key);
        if let Some(hit) = probe.hit {
            if let Some(e) = self.slots.get_mut(hit.slot) {
                e.value = value;
            }
            return InsertOutcome::Updated;
        }

        let slot = self.slots.insert(Entry {
            key,
            value,
            prev: None,
            next: None,
        });
        self.ledger.push_back(&mut self.slots, slot);
        let chain = &mut self.buckets[probe.bucket];
        chain.push(slot);
        trace!(
            "chained new entry in bucket {} (chain length {})",
            probe.bucket,
            chain.len()
        );
        InsertOutcome::Inserted
    }

    /// Replace the value of an existing key. Absent keys are left absent.
    pub fn update<Q>(&mut self, q: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let probe = self.locate(q);
        match probe.hit.and_then(|hit| self.slots.get_mut(hit.slot)) {
            Some(e) => {
                e.value = value;
                true
            }
            None => false,
        }
    }

    /// Remove a key, returning the owned pair. Remaining entries keep their
    /// relative order both in the chain and in iteration order.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let probe = self.locate(q);
        let hit = probe.hit?;
        let entry = self.slots.remove(hit.slot)?;
        self.buckets[probe.bucket].remove(hit.pos);
        self.ledger.unlink(&mut self.slots, entry.prev, entry.next);
        trace!(
            "unchained entry from bucket {} (chain length {})",
            probe.bucket,
            self.buckets[probe.bucket].len()
        );
        Some((entry.key, entry.value))
    }

    /// `remove` without handing back the pair.
    pub fn delete<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(q).is_some()
    }

    /// Look up a key by scanning only its own chain.
    pub fn search<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let probe = self.locate(q);
        probe
            .hit
            .and_then(|hit| self.slots.get(hit.slot))
            .map(|e| &e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        self.locate(q).hit.is_some()
    }

    /// How many entries `search(q)` compares against `q`: the hit position
    /// plus one, or the whole chain on a miss.
    pub fn probe_len<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        self.locate(q).visited
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.ledger.head,
            remaining: self.slots.len(),
        }
    }

    /// Snapshot of every pair in insertion order.
    pub fn all_entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn all_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn all_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.bucket_of(q)
    }

    /// Panics if the chains and the ledger disagree about the live entries.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let chained: usize = self.buckets.iter().map(Vec::len).sum();
        assert_eq!(chained, self.slots.len(), "chain total != live entries");

        for (b, chain) in self.buckets.iter().enumerate() {
            for &slot in chain {
                let e = self.slots.get(slot).expect("chain points at a live slot");
                assert_eq!(self.bucket_of(&e.key), b, "entry chained in wrong bucket");
            }
        }

        let mut walked = 0;
        let mut prev = None;
        let mut cursor = self.ledger.head;
        while let Some(slot) = cursor {
            let e = self.slots.get(slot).expect("ledger points at a live slot");
            assert_eq!(e.prev, prev, "broken back link");
            walked += 1;
            prev = Some(slot);
            cursor = e.next;
        }
        assert_eq!(self.ledger.tail, prev, "tail does not end the ledger");
        assert_eq!(walked, self.slots.len(), "ledger length != live entries");
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> fmt::Debug for ChainedHashTable<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
