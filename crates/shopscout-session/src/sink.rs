//! Outbound seam to whatever renders the screen.

use tokio::sync::mpsc;

use shopscout_core::events::ViewEvent;

/// Consumer of view updates.
///
/// `publish` is called while the orchestration state is locked so events
/// arrive in the order they were applied. Implementations must not block or
/// call back into the screen.
pub trait ViewSink: Send + Sync {
    fn publish(&self, event: ViewEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ViewSink for NullSink {
    fn publish(&self, _event: ViewEvent) {}
}

/// Forwards events into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ViewEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ViewEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ViewSink for ChannelSink {
    fn publish(&self, event: ViewEvent) {
        let kind = event.kind();
        if self.tx.send(event).is_err() {
            tracing::trace!(kind, "View receiver dropped; event discarded");
        }
    }
}
