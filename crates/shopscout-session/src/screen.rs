//! The storefront screen: filter store, debounced query, search and chat
//! wired together.
//!
//! Trigger rules:
//! 1. Raw query edits go to the filter store and the debouncer.
//! 2. A committed query that differs from the last one starts a search,
//!    or clears the results when it is too short.
//! 3. Category and price edits start a search only while the committed
//!    query is long enough.
//!
//! Everything up to the backend call runs synchronously inside the
//! triggering call. Only the call itself and its settlement are spawned,
//! so generations are assigned in trigger order.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use shopscout_client::CatalogBackend;
use shopscout_core::config::ShopscoutConfig;
use shopscout_core::error::ShopscoutError;
use shopscout_core::events::ViewEvent;
use shopscout_core::types::{Category, ChatTurn, FilterState, PriceRange};

use crate::chat::{ChatSessionManager, SendOutcome};
use crate::debounce::Debouncer;
use crate::error::ChatError;
use crate::filters::FilterStore;
use crate::lock;
use crate::scheduler::Scheduler;
use crate::search::{ResultsView, SearchCoordinator, SearchOutcome, SearchTicket};
use crate::sink::ViewSink;

/// Counts spawned backend calls so callers can wait for quiescence.
#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

struct ScreenInner {
    runtime: Handle,
    sink: Arc<dyn ViewSink>,
    filters: Mutex<FilterStore>,
    committed: Mutex<String>,
    search: Arc<SearchCoordinator>,
    chat: Arc<ChatSessionManager>,
    in_flight: Arc<InFlight>,
}

impl ScreenInner {
    /// Debouncer output: the query the user settled on.
    fn commit_query(&self, query: String) {
        {
            let mut committed = lock(&self.committed);
            if *committed == query {
                debug!(query = %query, "Committed query unchanged");
                return;
            }
            committed.clone_from(&query);
        }
        self.sink.publish(ViewEvent::QueryCommitted {
            query: query.clone(),
        });
        self.start_search(&query);
    }

    fn refine(&self) -> Option<JoinHandle<SearchOutcome>> {
        let query = lock(&self.committed).clone();
        if !self.search.is_searchable(&query) {
            debug!("Filter changed without a searchable query");
            return None;
        }
        self.start_search(&query)
    }

    fn start_search(&self, query: &str) -> Option<JoinHandle<SearchOutcome>> {
        let filters = lock(&self.filters).snapshot();
        match self.search.begin(query, &filters) {
            SearchTicket::Cleared { .. } => None,
            SearchTicket::Issued {
                generation,
                request,
            } => {
                let search = Arc::clone(&self.search);
                Some(self.spawn_tracked(async move { search.execute(generation, request).await }))
            }
        }
    }

    fn spawn_tracked<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.in_flight.count.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        self.runtime.spawn(async move {
            let _guard = guard;
            future.await
        })
    }
}

/// Orchestration root for one storefront screen.
pub struct StorefrontScreen {
    inner: Arc<ScreenInner>,
    debouncer: Debouncer<String>,
}

impl StorefrontScreen {
    /// Build a screen on the current tokio runtime.
    pub fn new(
        config: &ShopscoutConfig,
        backend: Arc<dyn CatalogBackend>,
        sink: Arc<dyn ViewSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, ShopscoutError> {
        let runtime = Handle::try_current()
            .map_err(|e| ShopscoutError::Scheduler(format!("no tokio runtime: {}", e)))?;

        let search = Arc::new(SearchCoordinator::new(
            Arc::clone(&backend),
            Arc::clone(&sink),
            config.search.min_query_chars,
        ));
        let chat = Arc::new(ChatSessionManager::new(
            backend,
            Arc::clone(&sink),
            config.chat.clone(),
        ));

        let inner = Arc::new(ScreenInner {
            runtime,
            sink,
            filters: Mutex::new(FilterStore::new(config.search.default_price_range())),
            committed: Mutex::new(String::new()),
            search,
            chat,
            in_flight: Arc::new(InFlight::default()),
        });

        let on_commit = Arc::clone(&inner);
        let debouncer = Debouncer::new(
            scheduler,
            Duration::from_millis(config.search.debounce_ms),
            Arc::new(move |query: String| on_commit.commit_query(query)),
        );

        info!(
            debounce_ms = config.search.debounce_ms,
            min_query_chars = config.search.min_query_chars,
            "Storefront screen ready"
        );
        Ok(Self { inner, debouncer })
    }

    // =========================================================================
    // Search inputs
    // =========================================================================

    /// Raw text from the search box.
    pub fn on_query_input(&self, raw: &str) {
        lock(&self.inner.filters).set_query(raw);
        self.debouncer.push(raw.to_string());
    }

    /// Select a category. Searches if the committed query is long enough.
    pub fn set_category(&self, category: Category) -> Option<JoinHandle<SearchOutcome>> {
        if !lock(&self.inner.filters).set_category(category) {
            return None;
        }
        debug!(category = %category, "Category changed");
        self.inner.refine()
    }

    /// Move the price slider. Searches if the committed query is long enough.
    pub fn set_price_range(&self, price: PriceRange) -> Option<JoinHandle<SearchOutcome>> {
        if !lock(&self.inner.filters).set_price_range(price) {
            return None;
        }
        debug!(min = price.min, max = price.max, "Price range changed");
        self.inner.refine()
    }

    pub fn filters(&self) -> FilterState {
        lock(&self.inner.filters).snapshot()
    }

    pub fn committed_query(&self) -> String {
        lock(&self.inner.committed).clone()
    }

    pub fn results(&self) -> ResultsView {
        self.inner.search.view()
    }

    // =========================================================================
    // Chat
    // =========================================================================

    pub fn set_chat_input(&self, text: &str) {
        self.inner.chat.set_input(text);
    }

    pub fn chat_input(&self) -> String {
        self.inner.chat.input()
    }

    /// Send a chat message. The user turn is in the transcript when this
    /// returns; the assistant turn follows when the returned task completes.
    pub fn send_chat(&self, text: &str) -> Result<JoinHandle<SendOutcome>, ChatError> {
        let request = self.inner.chat.begin_send(text)?;
        let chat = Arc::clone(&self.inner.chat);
        Ok(self
            .inner
            .spawn_tracked(async move { chat.complete(request).await }))
    }

    /// Send whatever is in the chat input buffer.
    pub fn send_chat_input(&self) -> Result<JoinHandle<SendOutcome>, ChatError> {
        let text = self.inner.chat.input();
        self.send_chat(&text)
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.inner.chat.transcript()
    }

    pub fn is_chat_pending(&self) -> bool {
        self.inner.chat.is_pending()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Wait until no backend call started by this screen is outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.inner.in_flight.idle.notified();
            if self.inner.in_flight.count.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Cancel any pending debounce. Requests already sent still settle.
    pub fn teardown(&self) {
        self.debouncer.teardown();
        info!("Storefront screen torn down");
    }
}
