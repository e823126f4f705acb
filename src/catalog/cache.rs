use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::types::candidate::CatalogCandidate;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Time-bounded cache of catalog search results, keyed by query phrasing.
///
/// Owned by whoever builds the pipeline and shared through an `Arc`; there is
/// no process-wide instance. Only successful searches are stored.
#[derive(Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Vec<CatalogCandidate>)>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, query: &str) -> Option<Vec<CatalogCandidate>> {
        let key = normalize_key(query);
        let mut entries = self.entries.lock().ok()?;
        match entries.get(&key) {
            Some((inserted_at, candidates)) if inserted_at.elapsed() < self.ttl => {
                Some(candidates.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, query: &str, candidates: Vec<CatalogCandidate>) {
        let key = normalize_key(query);
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, (inserted_at, _)| inserted_at.elapsed() < ttl);
            entries.insert(key, (Instant::now(), candidates));
        }
    }

    /// Number of entries that have not yet expired.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .values()
                    .filter(|(inserted_at, _)| inserted_at.elapsed() < self.ttl)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

fn normalize_key(query: &str) -> String {
    query.trim().to_lowercase()
}
