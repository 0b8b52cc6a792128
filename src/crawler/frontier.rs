//! Crawl frontier shared by all workers
//!
//! The frontier owns the FIFO of pages still to fetch and the idle flag of
//! every worker. Both live under one lock: a worker that finds the queue
//! empty marks itself idle in the same step, so the crawl is over exactly
//! when the queue is empty and every worker is idle.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Slot index of a pool worker
pub type WorkerId = usize;

/// A page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    /// Page the link was found on; `None` for the seed
    pub referer: Option<String>,
    /// Link distance from the seed
    pub depth: u32,
}

/// Answer to [`Frontier::next_for`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// Work for the asking worker, which is now marked active
    Entry(FrontierEntry),
    /// Nothing queued but other workers may still add pages
    Idle,
    /// Queue empty and every worker idle, or the crawl was shut down
    Finished,
}

#[derive(Debug)]
struct State {
    queue: VecDeque<FrontierEntry>,
    high_water: usize,
    idle: Vec<bool>,
    idle_count: usize,
    finished: bool,
}

/// Thread-safe FIFO of [`FrontierEntry`] with completion detection
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<State>,
    notify: Notify,
}

impl Frontier {
    /// Creates an empty frontier for `workers` pool slots, all idle
    pub fn new(workers: usize) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                high_water: 0,
                idle: vec![true; workers],
                idle_count: workers,
                finished: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Appends a page and wakes idle workers
    pub fn enqueue(&self, url: impl Into<String>, referer: Option<String>, depth: u32) {
        {
            let mut state = self.state.lock();
            if state.finished {
                tracing::trace!("Frontier finished, dropping new entry");
                return;
            }
            state.queue.push_back(FrontierEntry {
                url: url.into(),
                referer,
                depth,
            });
            state.high_water = state.high_water.max(state.queue.len());
        }
        self.notify.notify_waiters();
    }

    /// Takes the oldest entry without touching the idle set
    pub fn dequeue(&self) -> Option<FrontierEntry> {
        self.state.lock().queue.pop_front()
    }

    /// Number of queued entries
    pub fn count(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Largest queue length seen so far
    pub fn high_water(&self) -> usize {
        self.state.lock().high_water
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Hands `worker` its next entry, updating its idle flag in the same step
    pub fn next_for(&self, worker: WorkerId) -> Poll {
        let mut state = self.state.lock();
        if state.finished {
            return Poll::Finished;
        }

        if let Some(entry) = state.queue.pop_front() {
            if state.idle.get(worker).copied().unwrap_or(false) {
                state.idle[worker] = false;
                state.idle_count -= 1;
            }
            return Poll::Entry(entry);
        }

        if let Some(flag) = state.idle.get_mut(worker) {
            if !*flag {
                *flag = true;
                state.idle_count += 1;
            }
        }

        if state.idle_count == state.idle.len() {
            state.finished = true;
            drop(state);
            tracing::debug!("Frontier drained and all workers idle");
            self.notify.notify_waiters();
            return Poll::Finished;
        }

        Poll::Idle
    }

    /// Marks the crawl finished and wakes every waiter
    pub fn shutdown(&self) {
        self.state.lock().finished = true;
        self.notify.notify_waiters();
    }

    /// Resolves once an entry is queued or the frontier has finished
    pub async fn wait_for_work(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // register before checking so an enqueue in between is not missed
        notified.as_mut().enable();

        {
            let state = self.state.lock();
            if state.finished || !state.queue.is_empty() {
                return;
            }
        }

        notified.await;
    }
}
