//! Bounded, in-memory search history.
//!
//! The store is the only stateful piece of the service. Every operation takes
//! the same lock, so appends, clears and the derived views are serialized
//! against each other. Nothing in here performs I/O.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    clock::{Clock, SystemClock},
    model::{HistoryPage, HistoryStats, PopularCity, SearchRecord, WeatherSnapshot},
};

/// Maximum number of records retained.
pub const HISTORY_CAPACITY: usize = 100;

/// Number of entries `/popular` reports.
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

const RECENT_WINDOW_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Default)]
struct Inner {
    /// Most recent first.
    records: Vec<SearchRecord>,
    next_id: u64,
}

#[derive(Debug)]
pub struct HistoryStore {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner { records: Vec::new(), next_id: 1 }),
            clock,
        }
    }

    /// Record a lookup and return the stored record.
    pub fn append(&self, city: impl Into<String>, weather: WeatherSnapshot) -> SearchRecord {
        let mut inner = self.inner.lock();

        let record = SearchRecord {
            id: inner.next_id,
            city: city.into(),
            timestamp: self.clock.now(),
            weather,
        };
        inner.next_id += 1;

        inner.records.insert(0, record.clone());

        if inner.records.len() > HISTORY_CAPACITY {
            let evicted = inner.records.len() - HISTORY_CAPACITY;
            inner.records.truncate(HISTORY_CAPACITY);
            tracing::debug!(evicted, "Search history over capacity, dropped oldest records");
        }

        record
    }

    /// Return the first `limit` records matching `city_filter`, with the total number of matches.
    ///
    /// The filter is a case-insensitive substring match on the stored city name.
    pub fn list(&self, limit: usize, city_filter: Option<&str>) -> HistoryPage {
        let inner = self.inner.lock();

        match city_filter {
            Some(filter) => {
                let needle = filter.to_lowercase();
                let matching: Vec<&SearchRecord> = inner
                    .records
                    .iter()
                    .filter(|r| r.city.to_lowercase().contains(&needle))
                    .collect();

                HistoryPage {
                    total: matching.len(),
                    items: matching.into_iter().take(limit).cloned().collect(),
                }
            }
            None => HistoryPage {
                total: inner.records.len(),
                items: inner.records.iter().take(limit).cloned().collect(),
            },
        }
    }

    /// Rank lowercased city names by number of searches.
    ///
    /// Equal counts keep the order in which each city is first met walking the
    /// history from newest to oldest.
    pub fn popular(&self, top_n: usize) -> Vec<PopularCity> {
        let inner = self.inner.lock();

        let mut ranking: Vec<PopularCity> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in &inner.records {
            let city = record.city.to_lowercase();
            match index.get(&city) {
                Some(&i) => ranking[i].search_count += 1,
                None => {
                    index.insert(city.clone(), ranking.len());
                    ranking.push(PopularCity { city, search_count: 1 });
                }
            }
        }

        // stable
        ranking.sort_by(|a, b| b.search_count.cmp(&a.search_count));
        ranking.truncate(top_n);
        ranking
    }

    pub fn stats(&self) -> HistoryStats {
        let inner = self.inner.lock();
        let now = self.clock.now();

        let total_searches = inner.records.len();
        let unique_cities =
            inner.records.iter().map(|r| r.city.to_lowercase()).collect::<HashSet<_>>().len();
        let searches_last_24_hours = inner
            .records
            .iter()
            .filter(|r| now.signed_duration_since(r.timestamp) < Duration::seconds(RECENT_WINDOW_SECS))
            .count();

        let average_searches_per_day = match inner.records.last() {
            Some(oldest) => total_searches as f64 / days_since(oldest.timestamp, now) as f64,
            None => 0.0,
        };

        HistoryStats {
            total_searches,
            unique_cities,
            searches_last_24_hours,
            average_searches_per_day,
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.records.clear();
        inner.next_id = 1;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whole days between `since` and `now`, rounded up, never less than one.
fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = RECENT_WINDOW_SECS * 1000;

    let elapsed_ms = now.signed_duration_since(since).num_milliseconds().abs();
    let days = (elapsed_ms + DAY_MS - 1) / DAY_MS;
    days.max(1)
}
