//! chained-table: a fixed-capacity hash table with separate chaining that
//! remembers insertion order, plus the small inventory layer built on it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the one piece with real data-structure content, the table,
//!   small and independently checkable, and keep everything that merely
//!   consumes it (records, categories, timing) on the outside of its API.
//! - Layers:
//!   - ChainedHashTable<K, V, S>: buckets of arena keys plus an
//!     insertion-order ledger; upsert, must-exist update, delete, bucket-local
//!     search and ordered snapshots.
//!   - ProductStore: upper-cases product ids before every table call,
//!     validates them, generates the next id and owns the category list.
//!   - PerformanceComparator: times store lookups against a linear scan of a
//!     copied `Vec`.
//!
//! Constraints
//! - Single-threaded: the table is `!Send`/`!Sync` and has no locks.
//! - Capacity is fixed at construction; zero buckets is an error. The table
//!   never rehashes, so long chains at high load are expected behavior.
//! - Bucket index is `hash(key) % capacity`, recomputed on every call and
//!   never cached in the entry.
//! - Key equality is exact; normalization belongs to the caller.
//!
//! Storage layout
//! - Entries live once in a `SlotMap`. A bucket is a `Vec` of slot keys in
//!   chain order; the ledger is a doubly linked list whose links live in the
//!   entries. Updating a value therefore updates "both views" at once, and a
//!   delete splices the ledger in O(1) after the chain scan.
//!
//! Reentrancy policy
//! - Every public table method opens a debug-only guard section. User code
//!   runs only through `K: Hash/Eq` while a chain is scanned; reaching back
//!   into the same table from there panics in debug builds. Release builds
//!   compile the guard away.
//!
//! Hasher
//! - The default hasher is hashbrown's `DefaultHashBuilder`. It carries no
//!   per-table seed, so within a process a key maps to the same bucket in
//!   every table of the same capacity. Any `BuildHasher` can be supplied.
//!
//! Notes and non-goals
//! - No persistence; everything is memory-resident.
//! - No automatic resizing.
//! - No interactive menus or terminal output; callers render `Product` via
//!   its `Display` row.

pub mod categories;
pub mod chained_table;
mod chained_table_proptest;
pub mod comparator;
pub mod config;
pub mod product;
mod reentrancy;
pub mod store;

// Public surface
pub use categories::CategoryRegistry;
pub use chained_table::{ChainedHashTable, InsertOutcome, Iter, TableError};
pub use comparator::{ComparisonReport, PerformanceComparator};
pub use config::{StoreConfig, TableConfig};
pub use product::{Product, ProductDraft};
pub use store::{ProductStore, StoreError};
