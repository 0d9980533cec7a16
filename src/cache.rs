//! Explicit time-bounded cache around the dataset loader.
//!
//! The TTL is declared at construction and staleness is measured against an
//! injected `Instant`, so freshness is an observable property rather than an
//! implicit memoization detail. `invalidate` and `refresh` give callers a
//! manual escape hatch.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use log::debug;

use crate::model::Dataset;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    loaded_at: Instant,
    dataset: Arc<Dataset>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a cached dataset would still be served at `now`.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| now.duration_since(entry.loaded_at) < self.ttl)
    }

    /// Serve the cached dataset while fresh; otherwise run the loader and
    /// cache its result. A failed load leaves the cache empty rather than
    /// keeping a stale entry visible.
    pub fn get_or_load<F>(&mut self, loader: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        self.get_or_load_at(Instant::now(), loader)
    }

    pub fn get_or_load_at<F>(&mut self, now: Instant, loader: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if self.is_fresh_at(now) {
            if let Some(entry) = &self.entry {
                debug!("Serving cached dataset");
                return Ok(Arc::clone(&entry.dataset));
            }
        }
        self.entry = None;
        let dataset = Arc::new(loader()?);
        self.entry = Some(CacheEntry {
            loaded_at: now,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop any cached dataset; the next access reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Invalidate and reload in one step.
    pub fn refresh<F>(&mut self, loader: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        self.invalidate();
        self.get_or_load(loader)
    }
}
