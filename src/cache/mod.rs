// Memoization of generated sales histories, keyed by generation parameters

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::metrics;
use crate::ml::SeriesKey;
use crate::models::sales_history::HistoricalSeries;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Storage for generated series.
///
/// Series are immutable and shared behind `Arc`, so implementations hand out
/// clones of the handle rather than copies of the data.
pub trait SeriesCache: Send + Sync {
    fn get(&self, key: &SeriesKey) -> Result<Option<Arc<HistoricalSeries>>, CacheError>;
    fn insert(&self, key: SeriesKey, series: Arc<HistoricalSeries>) -> Result<(), CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
    fn len(&self) -> Result<usize, CacheError>;
}

// In-memory cache implementation
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesCache {
    store: Arc<RwLock<HashMap<SeriesKey, Arc<HistoricalSeries>>>>,
}

impl InMemorySeriesCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeriesCache for InMemorySeriesCache {
    fn get(&self, key: &SeriesKey) -> Result<Option<Arc<HistoricalSeries>>, CacheError> {
        let store = self.store.read().map_err(|_| CacheError::Poisoned)?;
        let hit = store.get(key).cloned();
        metrics::record_cache_lookup(hit.is_some());
        Ok(hit)
    }

    fn insert(&self, key: SeriesKey, series: Arc<HistoricalSeries>) -> Result<(), CacheError> {
        let mut store = self.store.write().map_err(|_| CacheError::Poisoned)?;
        // First writer wins; every series for a key is identical.
        store.entry(key).or_insert(series);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut store = self.store.write().map_err(|_| CacheError::Poisoned)?;
        store.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        let store = self.store.read().map_err(|_| CacheError::Poisoned)?;
        Ok(store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{generate_series, SimulationConfig};

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            horizon_days: 10,
            ..Default::default()
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = InMemorySeriesCache::new();
        let config = small_config(1);
        let key = config.series_key();

        assert!(cache.get(&key).unwrap().is_none());

        let series = Arc::new(generate_series(&config).unwrap());
        cache.insert(key, series.clone()).unwrap();

        let cached = cache.get(&key).unwrap().expect("series should be cached");
        assert!(Arc::ptr_eq(&cached, &series));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn keys_are_distinct_per_configuration() {
        let cache = InMemorySeriesCache::new();
        for seed in [1, 2] {
            let config = small_config(seed);
            cache
                .insert(
                    config.series_key(),
                    Arc::new(generate_series(&config).unwrap()),
                )
                .unwrap();
        }
        assert_eq!(cache.len().unwrap(), 2);

        cache.clear().unwrap();
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[test]
    fn first_insert_wins() {
        let cache = InMemorySeriesCache::new();
        let config = small_config(3);
        let key = config.series_key();
        let first = Arc::new(generate_series(&config).unwrap());
        let second = Arc::new(generate_series(&config).unwrap());

        cache.insert(key, first.clone()).unwrap();
        cache.insert(key, second).unwrap();

        assert!(Arc::ptr_eq(&cache.get(&key).unwrap().unwrap(), &first));
    }

    #[test]
    fn clones_share_storage() {
        let cache = InMemorySeriesCache::new();
        let handle = cache.clone();
        let config = small_config(4);
        handle
            .insert(
                config.series_key(),
                Arc::new(generate_series(&config).unwrap()),
            )
            .unwrap();
        assert_eq!(cache.len().unwrap(), 1);
    }
}
