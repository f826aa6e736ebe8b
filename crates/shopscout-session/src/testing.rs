//! Scripted collaborators shared by the unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use shopscout_client::{CatalogBackend, ChatReply, ChatRequest, ClientError, SearchRequest};
use shopscout_core::events::ViewEvent;
use shopscout_core::types::{Category, Product};

use crate::sink::ViewSink;

type SearchResult = Result<Vec<Product>, ClientError>;
type ChatResult = Result<ChatReply, ClientError>;

enum Reply<T> {
    Ready(T),
    Gated(oneshot::Receiver<T>),
}

impl<T> Reply<T> {
    async fn resolve(self, dropped: impl FnOnce() -> T) -> T {
        match self {
            Reply::Ready(value) => value,
            Reply::Gated(rx) => rx.await.unwrap_or_else(|_| dropped()),
        }
    }
}

/// Backend whose replies are scripted per request.
///
/// Requests without a script get an empty product list or an "ok" reply.
#[derive(Default)]
pub struct ScriptedBackend {
    searches: Mutex<Vec<SearchRequest>>,
    chats: Mutex<Vec<ChatRequest>>,
    search_script: Mutex<Vec<(SearchRequest, Reply<SearchResult>)>>,
    chat_script: Mutex<Vec<(String, Reply<ChatResult>)>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_search(&self, request: SearchRequest, result: SearchResult) {
        self.search_script
            .lock()
            .unwrap()
            .push((request, Reply::Ready(result)));
    }

    /// The request will wait until the returned sender fires.
    pub fn gate_search(&self, request: SearchRequest) -> oneshot::Sender<SearchResult> {
        let (tx, rx) = oneshot::channel();
        self.search_script
            .lock()
            .unwrap()
            .push((request, Reply::Gated(rx)));
        tx
    }

    pub fn reply_chat(&self, message: &str, result: ChatResult) {
        self.chat_script
            .lock()
            .unwrap()
            .push((message.to_string(), Reply::Ready(result)));
    }

    pub fn gate_chat(&self, message: &str) -> oneshot::Sender<ChatResult> {
        let (tx, rx) = oneshot::channel();
        self.chat_script
            .lock()
            .unwrap()
            .push((message.to_string(), Reply::Gated(rx)));
        tx
    }

    pub fn search_calls(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }

    pub fn chat_calls(&self) -> Vec<ChatRequest> {
        self.chats.lock().unwrap().clone()
    }

    /// Wait until at least `n` search requests have arrived.
    pub async fn wait_for_searches(&self, n: usize) {
        wait_until(|| self.searches.lock().unwrap().len() >= n).await;
    }

    /// Wait until at least `n` chat requests have arrived.
    pub async fn wait_for_chats(&self, n: usize) {
        wait_until(|| self.chats.lock().unwrap().len() >= n).await;
    }
}

async fn wait_until(mut done: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[async_trait]
impl CatalogBackend for ScriptedBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Product>, ClientError> {
        let reply = {
            self.searches.lock().unwrap().push(request.clone());
            let mut script = self.search_script.lock().unwrap();
            script
                .iter()
                .position(|(r, _)| r == request)
                .map(|i| script.remove(i).1)
        };
        match reply {
            Some(reply) => {
                reply
                    .resolve(|| Err(ClientError::Transport("gate dropped".to_string())))
                    .await
            }
            None => Ok(Vec::new()),
        }
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let reply = {
            self.chats.lock().unwrap().push(request.clone());
            let mut script = self.chat_script.lock().unwrap();
            script
                .iter()
                .position(|(m, _)| *m == request.message)
                .map(|i| script.remove(i).1)
        };
        match reply {
            Some(reply) => {
                reply
                    .resolve(|| Err(ClientError::Transport("gate dropped".to_string())))
                    .await
            }
            None => Ok(ChatReply::text("ok")),
        }
    }
}

/// Sink that keeps every event for inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl ViewSink for RecordingSink {
    fn publish(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn product(id: i64, name: &str) -> Product {
    Product {
        product_id: id,
        product_name: name.to_string(),
        category: Category::Electronics,
        price: 1_000.0 * id as f64,
        rating: 4.0,
        specifications: vec!["spec".to_string()],
        score: Some(1.0),
    }
}
