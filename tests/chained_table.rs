// ChainedHashTable integration tests.
//
// Exercises the public contract only:
// - Round-trip and upsert: insert/search agree, re-insert replaces in place.
// - Order law: iteration and snapshots follow first-insertion order.
// - Deletion law: delete removes from lookup and from order, survivors keep
//   their relative order; deleting a missing key changes nothing.
// - Collision scenario: keys sharing a bucket stay independently reachable.
// - Cost: average probe length tracks the load factor, well under a scan.
mod common;

use chained_table::{ChainedHashTable, InsertOutcome, TableConfig, TableError};
use common::init_test_logger;
use std::hash::{BuildHasher, Hasher};

// Hashes a string to its last ASCII digit, so "BP001" and "BP011" both land
// in bucket 1 of a 10-bucket table while "BP002" lands in bucket 2.
#[derive(Clone, Default)]
struct LastDigitBuildHasher;
#[derive(Default)]
struct LastDigitHasher(u64);
impl BuildHasher for LastDigitBuildHasher {
    type Hasher = LastDigitHasher;
    fn build_hasher(&self) -> Self::Hasher {
        LastDigitHasher::default()
    }
}
impl Hasher for LastDigitHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes.iter().filter(|b| b.is_ascii_digit()) {
            self.0 = u64::from(b - b'0');
        }
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

fn strings(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn colliding_product_ids_stay_reachable() {
    init_test_logger();
    let mut t: ChainedHashTable<String, &str, LastDigitBuildHasher> =
        ChainedHashTable::with_capacity_and_hasher(10, LastDigitBuildHasher).unwrap();
    assert_eq!(t.insert("BP001".into(), "Milk"), InsertOutcome::Inserted);
    assert_eq!(t.insert("BP002".into(), "Diapers"), InsertOutcome::Inserted);
    assert_eq!(t.insert("BP011".into(), "Wipes"), InsertOutcome::Inserted);

    // BP011 sits behind BP001 in the same chain.
    assert_eq!(t.probe_len("BP001"), 1);
    assert_eq!(t.probe_len("BP011"), 2);
    assert_eq!(t.probe_len("BP002"), 1);

    assert_eq!(t.search("BP001"), Some(&"Milk"));
    assert_eq!(t.search("BP011"), Some(&"Wipes"));
    assert_eq!(t.search("BP002"), Some(&"Diapers"));
    assert_eq!(t.all_keys(), strings(&["BP001", "BP002", "BP011"]));

    // Removing the chain head leaves its neighbour reachable.
    assert!(t.delete("BP001"));
    assert_eq!(t.search("BP011"), Some(&"Wipes"));
    assert_eq!(t.probe_len("BP011"), 1);
}

#[test]
fn round_trip_and_upsert() {
    let mut t = ChainedHashTable::with_capacity(10).unwrap();
    t.insert("k".to_string(), 1);
    assert_eq!(t.search("k"), Some(&1));
    assert_eq!(t.insert("k".to_string(), 2), InsertOutcome::Updated);
    assert_eq!(t.search("k"), Some(&2));
    assert_eq!(t.len(), 1);
}

#[test]
fn keys_match_exactly() {
    let mut t = ChainedHashTable::with_capacity(10).unwrap();
    t.insert("BP001".to_string(), ());
    assert!(t.search("bp001").is_none());
    assert!(t.search("BP001 ").is_none());
    assert!(!t.delete("Bp001"));
    assert_eq!(t.len(), 1);
}

#[test]
fn order_law_survives_updates() {
    let mut t = ChainedHashTable::with_capacity(2).unwrap();
    for (i, k) in ["K1", "K2", "K3"].iter().enumerate() {
        t.insert(k.to_string(), i);
    }
    assert!(t.update("K2", 20));
    assert_eq!(t.insert("K1".to_string(), 10), InsertOutcome::Updated);
    assert_eq!(t.all_keys(), strings(&["K1", "K2", "K3"]));
    assert_eq!(t.all_values(), vec![10, 20, 2]);
    assert_eq!(
        t.all_entries(),
        vec![
            ("K1".to_string(), 10),
            ("K2".to_string(), 20),
            ("K3".to_string(), 2)
        ]
    );
    let via_iter: Vec<_> = t.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(via_iter, vec![("K1", 10), ("K2", 20), ("K3", 2)]);
}

#[test]
fn deletion_law() {
    let mut t = ChainedHashTable::with_capacity(3).unwrap();
    for k in ["a", "b", "c", "d"] {
        t.insert(k.to_string(), k.len());
    }
    let before = t.len();
    assert!(t.delete("b"));
    assert!(t.search("b").is_none());
    assert_eq!(t.len(), before - 1);
    assert_eq!(t.all_keys(), strings(&["a", "c", "d"]));

    // Missing key: no change at all.
    assert!(!t.delete("b"));
    assert!(!t.update("b", 9));
    assert_eq!(t.len(), before - 1);
    assert_eq!(t.all_keys(), strings(&["a", "c", "d"]));
}

#[test]
fn construction_rejects_zero_buckets() {
    assert_eq!(
        ChainedHashTable::<String, u8>::with_capacity(0).err(),
        Some(TableError::ZeroCapacity)
    );
    let t = ChainedHashTable::<String, u8>::from_config(&TableConfig::default()).unwrap();
    assert_eq!(t.capacity(), 100);
    assert!(t.is_empty());
}

#[test]
fn probe_length_tracks_load_factor() {
    const N: usize = 2_000;
    const C: usize = 100;

    let mut t = ChainedHashTable::with_capacity(C).unwrap();
    let keys: Vec<String> = (0..N).map(|i| format!("BP{:06}", i)).collect();
    for (i, k) in keys.iter().enumerate() {
        t.insert(k.clone(), i);
    }
    let lf = t.load_factor();
    assert!((lf - (N / C) as f64).abs() < f64::EPSILON);

    let hit_avg =
        keys.iter().map(|k| t.probe_len(k.as_str())).sum::<usize>() as f64 / N as f64;
    let miss_avg = (0..N)
        .map(|i| t.probe_len(format!("XX{:06}", i).as_str()))
        .sum::<usize>() as f64
        / N as f64;
    // A linear scan finds key i after i + 1 comparisons.
    let linear_avg = (1..=N).sum::<usize>() as f64 / N as f64;

    assert!(hit_avg <= lf + 1.0, "hit average {hit_avg} vs load {lf}");
    assert!(
        miss_avg > lf * 0.5 && miss_avg < lf * 1.5,
        "miss average {miss_avg} vs load {lf}"
    );
    assert!(hit_avg * 10.0 < linear_avg);
}
