use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// How the run-wide dedup sets resolve concurrent discoveries of the same candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Check and insert inside one write-locked critical section.
    #[default]
    Locked,
    /// Check under a read lock, then insert under a separate write lock.
    /// Two workers may both see a candidate as new and both report it.
    Racy,
}

/// Shared set of already-reported strings using parking_lot RwLock.
#[derive(Debug, Clone)]
pub struct DedupSet {
    seen: Arc<RwLock<ahash::AHashSet<String>>>,
    mode: DedupMode,
}

impl DedupSet {
    pub fn new(mode: DedupMode) -> Self {
        Self {
            seen: Arc::new(RwLock::new(ahash::AHashSet::new())),
            mode,
        }
    }

    /// Record `candidate`; returns true if the caller should report it as new.
    pub fn claim(&self, candidate: &str) -> bool {
        match self.mode {
            DedupMode::Locked => {
                let mut seen = self.seen.write();
                if seen.contains(candidate) {
                    return false;
                }
                seen.insert(candidate.to_string())
            }
            DedupMode::Racy => {
                if self.seen.read().contains(candidate) {
                    return false;
                }
                // only widens the gap between check and insert so the race can be observed
                std::thread::yield_now();
                self.seen.write().insert(candidate.to_string());
                true
            }
        }
    }

    /// Forget `candidate` so a later document can claim it again.
    pub fn release(&self, candidate: &str) -> bool {
        self.seen.write().remove(candidate)
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.seen.read().contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }
}

/// Run-scoped discovery state: created empty, grows monotonically, dropped at exit.
#[derive(Debug, Clone)]
pub struct AggregationState {
    pub endpoints: DedupSet,
    pub parameters: DedupSet,
}

impl AggregationState {
    pub fn new(mode: DedupMode) -> Self {
        Self {
            endpoints: DedupSet::new(mode),
            parameters: DedupSet::new(mode),
        }
    }
}

impl Default for AggregationState {
    fn default() -> Self {
        Self::new(DedupMode::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub completed: usize,
    pub panicked: usize,
}

/// Fixed-size worker pool: `workers` tasks drain one shared queue of items.
pub struct WorkerPool {
    workers: usize,
    completed: Arc<AtomicUsize>,
    panicked: Arc<AtomicUsize>,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            completed: Arc::new(AtomicUsize::new(0)),
            panicked: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task_fn` once per item. Each worker handles one item at a time;
    /// outputs come back in completion order and a panicked item yields `None`.
    pub async fn execute<T, F, Fut>(&self, items: Vec<T>, task_fn: F) -> Vec<Option<Fut::Output>>
    where
        F: Fn(T) -> Fut + Clone + Send + 'static,
        Fut: std::future::Future + Send + 'static,
        Fut::Output: Send + 'static,
        T: Send + 'static,
    {
        let total = items.len();
        let queue = Arc::new(Mutex::new(VecDeque::from(items)));
        let mut workers = JoinSet::new();

        for _ in 0..self.workers.min(total.max(1)) {
            let queue = queue.clone();
            let task_fn = task_fn.clone();
            let completed = self.completed.clone();
            let panicked = self.panicked.clone();

            workers.spawn(async move {
                let mut outputs = Vec::new();
                loop {
                    let next = queue.lock().pop_front();
                    let Some(item) = next else { break };
                    // spawned so a panic costs one item, not the whole worker
                    match tokio::spawn(task_fn(item)).await {
                        Ok(output) => {
                            completed.fetch_add(1, Ordering::Relaxed);
                            outputs.push(Some(output));
                        }
                        Err(e) => {
                            tracing::error!(error=%e, "worker task failed");
                            panicked.fetch_add(1, Ordering::Relaxed);
                            outputs.push(None);
                        }
                    }
                }
                outputs
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(outputs) => results.extend(outputs),
                Err(e) => tracing::error!(error=%e, "worker stopped"),
            }
        }
        results
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            completed: self.completed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_locked_claim_once() {
        let set = DedupSet::new(DedupMode::Locked);
        assert!(set.claim("/login"));
        assert!(!set.claim("/login"));
        assert!(set.claim("/logout"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_release_allows_reclaim() {
        let set = DedupSet::new(DedupMode::Locked);
        assert!(set.claim("token"));
        assert!(set.release("token"));
        assert!(!set.contains("token"));
        assert!(set.claim("token"));
        assert!(!set.release("missing"));
    }

    #[test]
    fn test_racy_claim_sequential_is_still_unique() {
        let set = DedupSet::new(DedupMode::Racy);
        assert!(set.claim("token"));
        assert!(!set.claim("token"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_clones_share_contents() {
        let set = DedupSet::new(DedupMode::Locked);
        let other = set.clone();
        assert!(set.claim("id"));
        assert!(other.contains("id"));
        assert!(!other.claim("id"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_bounds_concurrency() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = pool
            .execute((0..8).collect(), {
                let running = running.clone();
                let peak = peak.clone();
                move |i: usize| {
                    let running = running.clone();
                    let peak = peak.clone();
                    async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        i
                    }
                }
            })
            .await;

        assert_eq!(results.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.stats(), PoolStats { completed: 8, panicked: 0 });
    }

    #[tokio::test]
    async fn test_pool_survives_panicking_item() {
        let pool = WorkerPool::new(2);
        let results = pool
            .execute(vec![1_u32, 2, 3], |i: u32| async move {
                if i == 2 {
                    panic!("boom");
                }
                i
            })
            .await;
        let mut ok: Vec<u32> = results.iter().flatten().copied().collect();
        ok.sort();
        assert_eq!(ok, vec![1, 3]);
        assert_eq!(pool.stats(), PoolStats { completed: 2, panicked: 1 });
    }

    #[test]
    fn test_zero_workers_is_sequential() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }
}
