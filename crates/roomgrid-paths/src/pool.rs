//! A pool of reusable [`PathFinder`]s for searching from several threads.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SearchError;
use crate::finder::{PathFinder, SearchResult};
use crate::options::SearchRequest;
use crate::room::RoomSource;
use crate::terrain::TerrainStore;

/// Hands out idle finders over one shared [`TerrainStore`].
///
/// A finder is created when none is idle, and returned to the pool after
/// the search unless the pool already keeps `max_idle` of them.
pub struct FinderPool {
    store: Arc<TerrainStore>,
    idle: Mutex<Vec<PathFinder>>,
    max_idle: usize,
}

impl FinderPool {
    pub fn new(store: Arc<TerrainStore>, max_idle: usize) -> Self {
        Self {
            store,
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
        }
    }

    /// Run one search on an idle finder.
    pub fn search(
        &self,
        request: &SearchRequest,
        source: &mut dyn RoomSource,
    ) -> Result<SearchResult, SearchError> {
        let mut finder = self.checkout();
        let result = finder.search(request, source);
        self.checkin(finder);
        result
    }

    /// Number of finders waiting for work.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    fn checkout(&self) -> PathFinder {
        let mut idle = self.lock();
        while let Some(finder) = idle.pop() {
            if !finder.is_in_use() {
                return finder;
            }
            log::warn!("discarding path finder left in use");
        }
        drop(idle);
        log::debug!("creating path finder");
        PathFinder::new(Arc::clone(&self.store))
    }

    fn checkin(&self, finder: PathFinder) {
        if finder.is_in_use() {
            return;
        }
        let mut idle = self.lock();
        if idle.len() < self.max_idle {
            idle.push(finder);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PathFinder>> {
        // The idle list stays consistent even if a holder panicked.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::SearchStatus;
    use crate::options::Algorithm;
    use crate::room::NoOverrides;
    use crate::testutil::*;

    #[test]
    fn reuses_finders() {
        let pool = FinderPool::new(Arc::new(TerrainStore::new()), 2);
        assert_eq!(pool.idle(), 0);
        let req = request(HOME.tile(5, 5), HOME.tile(20, 30), Algorithm::JumpPoint);
        let first = pool.search(&req, &mut NoOverrides).unwrap();
        assert_eq!(pool.idle(), 1);
        let second = pool.search(&req, &mut NoOverrides).unwrap();
        assert_eq!(pool.idle(), 1);
        assert_eq!(first, second);
        assert_eq!(first.status, SearchStatus::Found);
    }

    #[test]
    fn searches_from_several_threads() {
        let origin = HOME.tile(3, 3);
        let goal = HOME.tile(45, 41);
        let store = random_store(5, &[HOME], 0.15, &[origin, goal]);
        let pool = FinderPool::new(Arc::new(store), 4);
        let req = request(origin, goal, Algorithm::AStar);
        let expected = pool.search(&req, &mut NoOverrides).unwrap();

        let results: Vec<SearchResult> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| pool.search(&req, &mut NoOverrides).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for r in results {
            assert_eq!(r.cost, expected.cost);
            assert_eq!(r.status, expected.status);
        }
        assert!(pool.idle() <= 4);
    }
}
