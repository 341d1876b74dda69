//! Search timing: hash-table lookups against a linear scan over the same
//! products.

use crate::product::Product;
use crate::store::ProductStore;
use core::fmt;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Share of generated queries drawn from ids known to be loaded.
const EXISTING_QUERY_PERCENT: u64 = 80;

/// Range of the numeric suffix used for random, probably-missing queries.
const RANDOM_ID_RANGE: core::ops::RangeInclusive<u64> = 100..=999;

/// Small deterministic generator so a seed always yields the same queries.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    pub searches: usize,
    pub records: usize,
    pub table_time: Duration,
    pub linear_time: Duration,
    /// Both search paths found the same product (or nothing) for every query.
    pub consistent: bool,
}

impl ComparisonReport {
    /// How many times faster the table search was. `None` when the table
    /// pass was too fast to measure.
    pub fn speedup(&self) -> Option<f64> {
        let table = self.table_time.as_secs_f64();
        (table > 0.0).then(|| self.linear_time.as_secs_f64() / table)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} searches over {} products: table {:.6}s, linear {:.6}s",
            self.searches,
            self.records,
            self.table_time.as_secs_f64(),
            self.linear_time.as_secs_f64()
        )?;
        if let Some(x) = self.speedup() {
            write!(f, ", {:.2}x faster", x)?;
        }
        write!(f, ", consistent: {}", self.consistent)
    }
}

/// Holds a `Vec` copy of a store's products so both search strategies see
/// the same records. Table lookups go through `ProductStore::get_product`.
pub struct PerformanceComparator<'a> {
    store: &'a ProductStore,
    linear: Vec<Product>,
    ids: Vec<String>,
}

impl<'a> PerformanceComparator<'a> {
    pub fn new(store: &'a ProductStore) -> Self {
        Self {
            store,
            linear: Vec::new(),
            ids: Vec::new(),
        }
    }

    /// Copy the store's current products into the linear side. Returns the
    /// number of records loaded.
    pub fn load(&mut self) -> usize {
        self.linear = self.store.all_products();
        self.ids = self.linear.iter().map(|p| p.id.clone()).collect();
        debug!("loaded {} products for comparison", self.linear.len());
        self.linear.len()
    }

    pub fn records(&self) -> usize {
        self.linear.len()
    }

    pub fn table_search(&self, id: &str) -> Option<&'a Product> {
        self.store.get_product(id)
    }

    pub fn linear_search(&self, id: &str) -> Option<&Product> {
        self.linear.iter().find(|p| p.id == id)
    }

    /// Deterministic query mix for `seed`: mostly loaded ids, the rest random
    /// ids in the `BP100`..`BP999` range.
    pub fn generate_queries(&self, count: usize, seed: u64) -> Vec<String> {
        let mut rng = Lcg(seed);
        (0..count)
            .map(|_| {
                let from_loaded = rng.below(100) < EXISTING_QUERY_PERCENT;
                if from_loaded && !self.ids.is_empty() {
                    self.ids[rng.below(self.ids.len() as u64) as usize].clone()
                } else {
                    let span = RANDOM_ID_RANGE.end() - RANDOM_ID_RANGE.start() + 1;
                    format!(
                        "{}{}",
                        self.store.config().id_prefix,
                        RANDOM_ID_RANGE.start() + rng.below(span)
                    )
                }
            })
            .collect()
    }

    /// Time `searches` lookups through each strategy with the same queries.
    pub fn compare(&self, searches: usize, seed: u64) -> ComparisonReport {
        let queries = self.generate_queries(searches, seed);

        let start = Instant::now();
        let table_hits: Vec<Option<&str>> = queries
            .iter()
            .map(|q| self.table_search(q).map(|p| p.id.as_str()))
            .collect();
        let table_time = start.elapsed();

        let start = Instant::now();
        let linear_hits: Vec<Option<&str>> = queries
            .iter()
            .map(|q| self.linear_search(q).map(|p| p.id.as_str()))
            .collect();
        let linear_time = start.elapsed();

        let report = ComparisonReport {
            searches,
            records: self.linear.len(),
            table_time,
            linear_time,
            consistent: table_hits == linear_hits,
        };
        info!("{}", report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn queries_are_deterministic_per_seed() {
        let store = ProductStore::with_sample_data(StoreConfig::default()).unwrap();
        let mut c = PerformanceComparator::new(&store);
        assert_eq!(c.load(), 7);
        let a = c.generate_queries(200, 42);
        let b = c.generate_queries(200, 42);
        assert_eq!(a, b);
        assert_ne!(a, c.generate_queries(200, 43));

        let loaded = a.iter().filter(|q| store.get_product(q).is_some()).count();
        // Roughly 80% come from loaded ids; leave room for LCG variance.
        assert!(loaded > 120, "only {loaded} of 200 queries hit");
    }

    #[test]
    fn empty_store_only_generates_random_ids() {
        let store = ProductStore::new(StoreConfig::default()).unwrap();
        let mut c = PerformanceComparator::new(&store);
        assert_eq!(c.load(), 0);
        for q in c.generate_queries(50, 7) {
            let n: u64 = q.strip_prefix("BP").unwrap().parse().unwrap();
            assert!(RANDOM_ID_RANGE.contains(&n));
        }
        let report = c.compare(50, 7);
        assert!(report.consistent);
        assert_eq!(report.records, 0);
    }

    #[test]
    fn speedup_needs_a_measurable_table_time() {
        let mut r = ComparisonReport {
            searches: 1,
            records: 1,
            table_time: Duration::ZERO,
            linear_time: Duration::from_millis(4),
            consistent: true,
        };
        assert_eq!(r.speedup(), None);
        r.table_time = Duration::from_millis(2);
        assert_eq!(r.speedup(), Some(2.0));
        assert!(r.to_string().contains("2.00x faster"));
    }
}
