//! The backend seam the orchestration layer is written against.

use async_trait::async_trait;

use shopscout_core::types::Product;

use crate::error::ClientError;
use crate::types::{ChatReply, ChatRequest, SearchRequest};

/// Remote catalog and assistant.
///
/// Calls are best-effort and never retried by the caller. Implementations
/// may resolve concurrent calls in any order.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Run a filtered search. Products come back in rank order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Product>, ClientError>;

    /// Ask the assistant a question.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError>;
}
