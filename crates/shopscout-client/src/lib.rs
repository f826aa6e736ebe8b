//! HTTP contract between the Shopscout client and the catalog backend.
//!
//! The orchestration layer depends only on the `CatalogBackend` trait;
//! `HttpBackend` is the production implementation over `POST /search` and
//! `POST /chat`.

pub mod backend;
pub mod error;
pub mod http;
pub mod types;

pub use backend::CatalogBackend;
pub use error::ClientError;
pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest, SearchRequest};
