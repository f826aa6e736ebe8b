//! Cancellable one-shot timers.
//!
//! The debouncer is written against the `Scheduler` trait so it can run on
//! tokio timers in the application and on a simulated clock in tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use shopscout_core::error::ShopscoutError;

use crate::lock;

/// Identifies a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Work to run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Schedules callbacks after a delay.
///
/// A timer fires at most once. Once `cancel` returns, the callback of that
/// timer will not run.
pub trait Scheduler: Send + Sync {
    /// Run `callback` after `delay`.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// already cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

// =============================================================================
// Tokio
// =============================================================================

/// Scheduler backed by `tokio::time::sleep` tasks.
pub struct TokioScheduler {
    handle: Handle,
    next_id: AtomicU64,
    timers: Arc<Mutex<HashMap<TimerId, AbortHandle>>>,
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl TokioScheduler {
    /// Create a scheduler on the runtime the caller is running in.
    pub fn new() -> Result<Self, ShopscoutError> {
        let handle = Handle::try_current()
            .map_err(|e| ShopscoutError::Scheduler(format!("no tokio runtime: {}", e)))?;
        Ok(Self::with_handle(handle))
    }

    /// Create a scheduler that spawns its timers on `handle`.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            next_id: AtomicU64::new(1),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.timers).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let timers = Arc::clone(&self.timers);

        // Held across spawn so the task cannot look itself up before it is registered.
        let mut registry = lock(&self.timers);
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let due = lock(&timers).remove(&id).is_some();
            if due {
                callback();
            }
        });
        registry.insert(id, task.abort_handle());
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        match lock(&self.timers).remove(&id) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in lock(&self.timers).drain() {
            task.abort();
        }
    }
}

// =============================================================================
// Simulated clock
// =============================================================================

struct ManualTimer {
    id: TimerId,
    due: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    timers: Vec<ManualTimer>,
}

/// Scheduler driven by an explicit virtual clock.
///
/// Nothing fires until `advance` moves the clock past a timer's due time.
/// Timers due at the same instant fire in scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        lock(&self.state).now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        lock(&self.state).timers.len()
    }

    /// Move the clock forward, firing every timer that becomes due.
    ///
    /// Callbacks run without the scheduler lock held, so they may schedule or
    /// cancel further timers; those are honoured within the same advance.
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = lock(&self.state).now + by;
        let mut fired = 0;
        loop {
            let next = {
                let mut state = lock(&self.state);
                let position = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                match position {
                    Some(i) => {
                        let timer = state.timers.remove(i);
                        state.now = timer.due;
                        Some(timer)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };
            match next {
                Some(timer) => {
                    (timer.callback)();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = TimerId(state.next_id);
        let due = state.now + delay;
        state.timers.push(ManualTimer { id, due, callback });
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut state = lock(&self.state);
        let before = state.timers.len();
        state.timers.retain(|t| t.id != id);
        state.timers.len() != before
    }
}
