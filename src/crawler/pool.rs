use crate::crawler::frontier::WorkerId;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Fixed-size pool of worker slots on the tokio runtime
///
/// Every running task holds one semaphore permit and one slot id. `submit`
/// waits for a free permit, so at most `size` tasks exist at any time.
#[derive(Debug)]
pub struct WorkerPool {
    size: usize,
    permits: Arc<Semaphore>,
    free_slots: Arc<Mutex<Vec<WorkerId>>>,
    tasks: JoinSet<()>,
}

/// Returns the slot to the pool before the permit is released
struct SlotGuard {
    slot: WorkerId,
    free_slots: Arc<Mutex<Vec<WorkerId>>>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.free_slots.lock().push(self.slot);
    }
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            permits: Arc::new(Semaphore::new(size)),
            free_slots: Arc::new(Mutex::new((0..size).rev().collect())),
            tasks: JoinSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of slots currently running a task
    pub fn live_workers(&self) -> usize {
        self.size - self.permits.available_permits()
    }

    /// Waits for a free slot and runs `task` on it
    ///
    /// `task` receives the slot id, which stays reserved until its future
    /// completes (or panics).
    pub async fn submit<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(WorkerId) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.reap();

        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                tracing::error!("Worker pool semaphore closed");
                return;
            }
        };

        let Some(slot) = self.free_slots.lock().pop() else {
            tracing::error!("Worker pool has a permit but no free slot");
            return;
        };

        let guard = SlotGuard {
            slot,
            free_slots: Arc::clone(&self.free_slots),
            _permit: permit,
        };
        let fut = task(slot);
        self.tasks.spawn(async move {
            let _guard = guard;
            fut.await;
        });
    }

    /// Waits for every submitted task; returns how many panicked
    pub async fn join(&mut self) -> usize {
        let mut failed = 0;
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Worker task failed: {}", e);
                failed += 1;
            }
        }
        failed
    }

    /// Drops the results of tasks that already completed
    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                tracing::error!("Worker task failed: {}", e);
            }
        }
    }
}
