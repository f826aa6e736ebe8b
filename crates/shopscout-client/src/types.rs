//! Request and response bodies of the backend endpoints.

use serde::{Deserialize, Serialize};

use shopscout_core::types::{Category, FilterState, Product};

/// Body of `POST /search`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub min_price: u64,
    pub max_price: u64,
    pub category: Category,
}

impl SearchRequest {
    /// Build a request from the filters as they are right now, with
    /// `query` as the committed query text.
    pub fn from_filters(query: &str, filters: &FilterState) -> Self {
        Self {
            query: query.to_string(),
            min_price: filters.price.min,
            max_price: filters.price.max,
            category: filters.category,
        }
    }
}

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response of `POST /chat`. Only `response` is required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_match: Option<Product>,
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            product_id: None,
            best_match: None,
        }
    }
}
