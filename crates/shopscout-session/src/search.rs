//! Search request coordination.
//!
//! Every issued search is tagged with a monotonically increasing generation.
//! A response is applied only if its generation is still the latest one, so
//! the displayed results always belong to the request issued last, whatever
//! order the responses arrive in. Superseded requests are left to finish on
//! their own and their responses are dropped on arrival.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, warn};

use shopscout_client::{CatalogBackend, ClientError, SearchRequest};
use shopscout_core::events::ViewEvent;
use shopscout_core::types::{query_len, FilterState, Product};

use crate::lock;
use crate::sink::ViewSink;

/// What the screen currently shows for search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultsView {
    /// Products in rank order.
    pub products: Vec<Product>,
    /// Whether the latest issued search is still outstanding.
    pub loading: bool,
    /// Generation of the most recently issued search (or clear).
    pub generation: u64,
}

impl ResultsView {
    /// The highest-ranked product.
    pub fn top_pick(&self) -> Option<&Product> {
        self.products.first()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Result of starting a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTicket {
    /// The query was too short; results were emptied and nothing was sent.
    Cleared { generation: u64 },
    /// A request must be sent and its response settled under `generation`.
    Issued {
        generation: u64,
        request: SearchRequest,
    },
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Cleared,
    /// The response replaced the displayed results.
    Applied { generation: u64, count: usize },
    /// A newer search was issued meanwhile; the response was dropped.
    Stale { generation: u64, latest: u64 },
    /// The request failed; the previous results were kept.
    Failed { generation: u64, error: String },
}

/// Turns committed filter state into backend searches and applies the
/// responses that are still current.
pub struct SearchCoordinator {
    backend: Arc<dyn CatalogBackend>,
    sink: Arc<dyn ViewSink>,
    min_query_chars: usize,
    view: Mutex<ResultsView>,
}

impl SearchCoordinator {
    pub fn new(
        backend: Arc<dyn CatalogBackend>,
        sink: Arc<dyn ViewSink>,
        min_query_chars: usize,
    ) -> Self {
        Self {
            backend,
            sink,
            min_query_chars,
            view: Mutex::new(ResultsView::default()),
        }
    }

    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    /// Whether `query` is long enough to be sent.
    pub fn is_searchable(&self, query: &str) -> bool {
        query_len(query) >= self.min_query_chars
    }

    pub fn view(&self) -> ResultsView {
        lock(&self.view).clone()
    }

    pub fn latest_generation(&self) -> u64 {
        lock(&self.view).generation
    }

    /// Start a search for `query` under `filters` as they are right now.
    ///
    /// Short queries empty the results instead of issuing a request. Either
    /// way the generation advances, so any response still in flight is
    /// stale from here on.
    pub fn begin(&self, query: &str, filters: &FilterState) -> SearchTicket {
        let mut view = lock(&self.view);
        view.generation += 1;
        let generation = view.generation;

        if !self.is_searchable(query) {
            debug!(generation, "Query below minimum length; clearing results");
            view.products.clear();
            self.sink.publish(ViewEvent::ResultsCleared);
            if view.loading {
                view.loading = false;
                self.sink.publish(ViewEvent::SearchLoading { loading: false });
            }
            return SearchTicket::Cleared { generation };
        }

        let request = SearchRequest::from_filters(query, filters);
        info!(
            generation,
            query = %request.query,
            category = %request.category,
            min_price = request.min_price,
            max_price = request.max_price,
            "Issuing search"
        );
        if !view.loading {
            view.loading = true;
            self.sink.publish(ViewEvent::SearchLoading { loading: true });
        }
        SearchTicket::Issued {
            generation,
            request,
        }
    }

    /// Apply the response for `generation` if it is still the latest.
    pub fn settle(
        &self,
        generation: u64,
        result: Result<Vec<Product>, ClientError>,
    ) -> SearchOutcome {
        let mut view = lock(&self.view);
        if generation != view.generation {
            debug!(
                generation,
                latest = view.generation,
                "Discarding stale search response"
            );
            return SearchOutcome::Stale {
                generation,
                latest: view.generation,
            };
        }

        let outcome = match result {
            Ok(products) => {
                let count = products.len();
                view.products = products.clone();
                self.sink.publish(ViewEvent::ResultsReplaced {
                    generation,
                    products,
                });
                info!(generation, count, "Search results applied");
                SearchOutcome::Applied { generation, count }
            }
            Err(e) => {
                warn!(generation, error = %e, "Search failed; keeping previous results");
                SearchOutcome::Failed {
                    generation,
                    error: e.to_string(),
                }
            }
        };

        view.loading = false;
        self.sink.publish(ViewEvent::SearchLoading { loading: false });
        outcome
    }

    /// Send an issued request and settle its response.
    pub async fn execute(&self, generation: u64, request: SearchRequest) -> SearchOutcome {
        let result = self.backend.search(&request).await;
        self.settle(generation, result)
    }

    /// `begin` followed by `execute` when a request was issued.
    pub async fn search(&self, query: &str, filters: &FilterState) -> SearchOutcome {
        match self.begin(query, filters) {
            SearchTicket::Cleared { .. } => SearchOutcome::Cleared,
            SearchTicket::Issued {
                generation,
                request,
            } => self.execute(generation, request).await,
        }
    }
}
