use serde::{Deserialize, Serialize};

use crate::types::{ChatTurn, Product};

/// Updates pushed from the orchestration layer to whatever renders the screen.
///
/// Consumers receive these in the order the state changes were applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViewEvent {
    // =========================================================================
    // Search
    // =========================================================================
    /// A debounced query value settled.
    QueryCommitted { query: String },

    /// The displayed product list was replaced by the response to `generation`.
    /// The first product is the top pick.
    ResultsReplaced {
        generation: u64,
        products: Vec<Product>,
    },

    /// The displayed product list was emptied because the query is too short.
    ResultsCleared,

    /// The search loading indicator changed.
    SearchLoading { loading: bool },

    // =========================================================================
    // Chat
    // =========================================================================
    /// A turn was appended to the transcript.
    TurnAppended { turn: ChatTurn },

    /// The chat pending indicator changed.
    ChatPending { pending: bool },
}

impl ViewEvent {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ViewEvent::QueryCommitted { .. } => "query_committed",
            ViewEvent::ResultsReplaced { .. } => "results_replaced",
            ViewEvent::ResultsCleared => "results_cleared",
            ViewEvent::SearchLoading { .. } => "search_loading",
            ViewEvent::TurnAppended { .. } => "turn_appended",
            ViewEvent::ChatPending { .. } => "chat_pending",
        }
    }
}
