//! Trailing-edge debounce of raw query input.
//!
//! Every pushed value restarts the quiet period; only the last value of a
//! burst is emitted. After `teardown` nothing is emitted.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::lock;
use crate::scheduler::{Scheduler, TimerId};

/// Receives committed values.
pub type EmitFn<T> = Arc<dyn Fn(T) + Send + Sync>;

struct PendingEmit<T> {
    timer: TimerId,
    seq: u64,
    value: T,
}

struct DebounceState<T> {
    seq: u64,
    pending: Option<PendingEmit<T>>,
    closed: bool,
}

/// Single-input, single-output debouncer.
pub struct Debouncer<T> {
    scheduler: Arc<dyn Scheduler>,
    quiet_period: Duration,
    state: Arc<Mutex<DebounceState<T>>>,
    emit: EmitFn<T>,
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Debouncer")
            .field("quiet_period", &self.quiet_period)
            .field("pending", &state.pending.is_some())
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T> Debouncer<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(scheduler: Arc<dyn Scheduler>, quiet_period: Duration, emit: EmitFn<T>) -> Self {
        Self {
            scheduler,
            quiet_period,
            state: Arc::new(Mutex::new(DebounceState {
                seq: 0,
                pending: None,
                closed: false,
            })),
            emit,
        }
    }

    /// Feed a raw value, cancelling any emission still waiting for the
    /// previous one. Returns `false` once torn down.
    pub fn push(&self, value: T) -> bool {
        let mut state = lock(&self.state);
        if state.closed {
            return false;
        }
        if let Some(previous) = state.pending.take() {
            self.scheduler.cancel(previous.timer);
        }

        state.seq += 1;
        let seq = state.seq;
        let shared = Arc::clone(&self.state);
        let emit = Arc::clone(&self.emit);
        let timer = self.scheduler.schedule(
            self.quiet_period,
            Box::new(move || {
                let fired = {
                    let mut state = lock(&shared);
                    match state.pending.take() {
                        Some(p) if p.seq == seq && !state.closed => Some(p.value),
                        other => {
                            state.pending = other;
                            None
                        }
                    }
                };
                if let Some(value) = fired {
                    emit(value);
                }
            }),
        );
        state.pending = Some(PendingEmit { timer, seq, value });
        true
    }

    /// The value waiting to be committed, if any.
    pub fn pending_value(&self) -> Option<T> {
        lock(&self.state).pending.as_ref().map(|p| p.value.clone())
    }
}

impl<T> Debouncer<T> {
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Cancel any pending emission and stop accepting input.
    pub fn teardown(&self) {
        let mut state = lock(&self.state);
        state.closed = true;
        if let Some(pending) = state.pending.take() {
            self.scheduler.cancel(pending.timer);
            tracing::debug!(timer = %pending.timer, "Debounce timer cancelled on teardown");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        lock(&self.state).closed
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
