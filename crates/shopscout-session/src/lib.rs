//! Interaction orchestration for the Shopscout storefront screen.
//!
//! Decides when a search fires, reconciles overlapping filter edits into the
//! latest request, applies results in trigger order, and runs a single-flight
//! assistant chat alongside.

pub mod chat;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod scheduler;
pub mod screen;
pub mod search;
pub mod sink;

#[cfg(test)]
mod testing;

pub use chat::{ChatSession, ChatSessionManager, ChatState, SendOutcome};
pub use debounce::Debouncer;
pub use error::ChatError;
pub use filters::FilterStore;
pub use scheduler::{ManualScheduler, Scheduler, TimerCallback, TimerId, TokioScheduler};
pub use screen::StorefrontScreen;
pub use search::{ResultsView, SearchCoordinator, SearchOutcome, SearchTicket};
pub use sink::{ChannelSink, NullSink, ViewSink};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
