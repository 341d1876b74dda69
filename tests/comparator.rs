// PerformanceComparator integration tests. Timing values are machine
// dependent, so only structure and consistency are asserted.
mod common;

use chained_table::{PerformanceComparator, ProductDraft, ProductStore, StoreConfig};
use common::init_test_logger;

fn large_store(n: u64, capacity: usize) -> ProductStore {
    let mut s = ProductStore::new(StoreConfig::default().with_capacity(capacity)).unwrap();
    for i in 1..=n {
        s.add_product(
            &format!("BP{:03}", i),
            ProductDraft::new(format!("Item {i}"), "Care", 1.0, 1),
        )
        .unwrap();
    }
    s
}

#[test]
fn both_strategies_agree_on_sample_data() {
    init_test_logger();
    let store = ProductStore::with_sample_data(StoreConfig::default()).unwrap();
    let mut c = PerformanceComparator::new(&store);
    assert_eq!(c.load(), 7);
    assert_eq!(c.records(), 7);

    for id in ["BP001", "BP007", "BP555"] {
        assert_eq!(
            c.table_search(id).map(|p| &p.id),
            c.linear_search(id).map(|p| &p.id)
        );
    }

    let report = c.compare(1_000, 0xC0FFEE);
    assert_eq!(report.searches, 1_000);
    assert_eq!(report.records, 7);
    assert!(report.consistent);
}

#[test]
fn random_queries_can_hit_stored_ids() {
    // Ids BP100..BP999 overlap the random query range, so random queries hit too.
    init_test_logger();
    let store = large_store(1_500, 100);
    let mut c = PerformanceComparator::new(&store);
    assert_eq!(c.load(), 1_500);
    let report = c.compare(5_000, 11);
    assert!(report.consistent);
    assert_eq!(report.records, 1_500);
}

#[test]
fn load_reflects_store_at_call_time() {
    let mut store = large_store(10, 10);
    store.delete_product("BP005").unwrap();
    let mut c = PerformanceComparator::new(&store);
    assert_eq!(c.load(), 9);
    assert!(c.linear_search("BP005").is_none());
    assert!(c.table_search("bp006").is_some());
}
