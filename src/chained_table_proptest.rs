#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so they can call
// the internal consistency check.

use crate::chained_table::{ChainedHashTable, InsertOutcome};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and shorter
// op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Update(usize, i32),
    Delete(usize),
    Search(usize),
    SearchStr(String),
    Snapshot,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=16, proptest::collection::vec("[a-z]{0,4}", 1..=10)).prop_flat_map(
        |(capacity, pool)| {
            let idx = proptest::sample::select((0..pool.len()).collect::<Vec<_>>());
            let op = prop_oneof![
                3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Update(i, v)),
                2 => idx.clone().prop_map(Op::Delete),
                1 => idx.clone().prop_map(Op::Search),
                1 => "[a-z]{0,4}".prop_map(Op::SearchStr),
                1 => Just(Op::Snapshot),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

fn model_pos(model: &[(Key, i32)], k: &Key) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

// State-machine equivalence against an ordered Vec model. After every op:
// - `len` equals the number of distinct live keys and `all_keys().len()`.
// - `all_entries` equals the model exactly, so order is first-insertion order
//   and updates never move a key.
// - chains and ledger agree (`assert_consistent`).
fn run_scenario<S: BuildHasher>(
    mut sut: ChainedHashTable<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(Key, i32)> = Vec::new();
    let capacity = sut.capacity();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = Key(pool[i].clone());
                let expected = match model_pos(&model, &k) {
                    Some(p) => {
                        model[p].1 = v;
                        InsertOutcome::Updated
                    }
                    None => {
                        model.push((k.clone(), v));
                        InsertOutcome::Inserted
                    }
                };
                prop_assert_eq!(sut.insert(k.clone(), v), expected);
                prop_assert_eq!(sut.search(&k), Some(&v));
            }
            Op::Update(i, v) => {
                let k = Key(pool[i].clone());
                let present = match model_pos(&model, &k) {
                    Some(p) => {
                        model[p].1 = v;
                        true
                    }
                    None => false,
                };
                prop_assert_eq!(sut.update(pool[i].as_str(), v), present);
            }
            Op::Delete(i) => {
                let k = Key(pool[i].clone());
                let present = match model_pos(&model, &k) {
                    Some(p) => {
                        model.remove(p);
                        true
                    }
                    None => false,
                };
                prop_assert_eq!(sut.delete(&k), present);
                prop_assert!(sut.search(&k).is_none());
            }
            Op::Search(i) => {
                let k = Key(pool[i].clone());
                let expected = model_pos(&model, &k).map(|p| model[p].1);
                prop_assert_eq!(sut.search(&k).copied(), expected);
                prop_assert_eq!(sut.contains_key(&k), expected.is_some());
            }
            Op::SearchStr(s) => {
                let expected = model.iter().find(|(k, _)| k.0 == s).map(|(_, v)| *v);
                prop_assert_eq!(sut.search(s.as_str()).copied(), expected);
            }
            Op::Snapshot => {
                let keys: Vec<Key> = model.iter().map(|(k, _)| k.clone()).collect();
                let values: Vec<i32> = model.iter().map(|(_, v)| *v).collect();
                prop_assert_eq!(sut.all_keys(), keys);
                prop_assert_eq!(sut.all_values(), values);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.all_keys().len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(&sut.all_entries(), &model);
        prop_assert_eq!(sut.capacity(), capacity);
        sut.assert_consistent();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashTable::with_capacity(capacity).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Constant hasher: every key shares bucket 0, so each chain scan has to tell
// keys apart by equality alone.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashTable::with_capacity_and_hasher(capacity, ConstBuildHasher).unwrap();
        run_scenario(sut, &pool, ops)?;
    }

    // Under total collision a hit costs its chain position and a miss costs
    // the whole chain, which is every live entry.
    #[test]
    fn prop_probe_len_under_collisions(pool in proptest::collection::hash_set("[a-z]{1,4}", 1..20)) {
        let mut sut = ChainedHashTable::with_capacity_and_hasher(7, ConstBuildHasher).unwrap();
        let keys: Vec<String> = pool.into_iter().collect();
        for (i, k) in keys.iter().enumerate() {
            sut.insert(Key(k.clone()), i as i32);
        }
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(sut.probe_len(k.as_str()), i + 1);
        }
        prop_assert_eq!(sut.probe_len("0"), keys.len());
    }
}
