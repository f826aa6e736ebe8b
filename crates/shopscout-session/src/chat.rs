//! Assistant chat session with single-flight sends.
//!
//! Lifecycle of a send:
//! - Idle -> Sending (user turn appended, request issued)
//! - Sending -> Idle (assistant reply or fallback appended)
//!
//! A send attempted while Sending is refused with `ChatError::Busy`.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shopscout_client::{CatalogBackend, ChatReply, ChatRequest, ClientError};
use shopscout_core::config::ChatConfig;
use shopscout_core::events::ViewEvent;
use shopscout_core::types::{query_len, ChatTurn};

use crate::error::ChatError;
use crate::lock;
use crate::sink::ViewSink;

/// Whether a chat request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChatState {
    Idle,
    Sending,
}

impl fmt::Display for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatState::Idle => write!(f, "Idle"),
            ChatState::Sending => write!(f, "Sending"),
        }
    }
}

impl ChatState {
    pub fn can_transition_to(&self, target: &ChatState) -> bool {
        matches!(
            (self, target),
            (ChatState::Idle, ChatState::Sending) | (ChatState::Sending, ChatState::Idle)
        )
    }
}

/// Ordered, append-only transcript plus the draft input buffer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub turns: Vec<ChatTurn>,
    pub state: ChatState,
    pub input: String,
}

impl ChatSession {
    /// New session seeded with the assistant's greeting.
    pub fn new(greeting: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: vec![ChatTurn::assistant(greeting)],
            state: ChatState::Idle,
            input: String::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == ChatState::Sending
    }

    fn transition(&mut self, target: ChatState) {
        if self.state.can_transition_to(&target) {
            debug!("Chat state: {} -> {}", self.state, target);
        } else {
            warn!("Unexpected chat state transition: {} -> {}", self.state, target);
        }
        self.state = target;
    }
}

/// How a send ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The assistant's reply was appended.
    Replied(ChatTurn),
    /// The request failed and the fallback turn was appended.
    FellBack { turn: ChatTurn, error: String },
    /// Nothing was appended and no request was made.
    Rejected(ChatError),
}

/// Owns the transcript and mediates one outstanding chat request at a time.
pub struct ChatSessionManager {
    backend: Arc<dyn CatalogBackend>,
    sink: Arc<dyn ViewSink>,
    config: ChatConfig,
    session: Mutex<ChatSession>,
}

impl ChatSessionManager {
    /// Start a session. The greeting is published as the first turn.
    pub fn new(
        backend: Arc<dyn CatalogBackend>,
        sink: Arc<dyn ViewSink>,
        config: ChatConfig,
    ) -> Self {
        let session = ChatSession::new(&config.greeting);
        info!(session_id = %session.id, "Chat session started");
        for turn in &session.turns {
            sink.publish(ViewEvent::TurnAppended { turn: turn.clone() });
        }
        Self {
            backend,
            sink,
            config,
            session: Mutex::new(session),
        }
    }

    pub fn session(&self) -> ChatSession {
        lock(&self.session).clone()
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        lock(&self.session).turns.clone()
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.session).is_pending()
    }

    pub fn input(&self) -> String {
        lock(&self.session).input.clone()
    }

    /// Replace the draft input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        lock(&self.session).input = text.into();
    }

    /// Validate `text`, append it as a user turn, clear the input buffer and
    /// mark the session pending. Returns the request to send.
    pub fn begin_send(&self, text: &str) -> Result<ChatRequest, ChatError> {
        if text.trim().is_empty() {
            debug!("Ignoring empty chat message");
            return Err(ChatError::EmptyMessage);
        }
        if query_len(text) > self.config.max_message_chars {
            warn!(
                chars = query_len(text),
                max = self.config.max_message_chars,
                "Chat message too long"
            );
            return Err(ChatError::MessageTooLong(self.config.max_message_chars));
        }

        let mut session = lock(&self.session);
        if session.is_pending() {
            debug!("Chat send refused; request already in flight");
            return Err(ChatError::Busy);
        }

        let turn = ChatTurn::user(text);
        session.turns.push(turn.clone());
        session.input.clear();
        session.transition(ChatState::Sending);
        self.sink.publish(ViewEvent::TurnAppended { turn });
        self.sink.publish(ViewEvent::ChatPending { pending: true });

        Ok(ChatRequest {
            message: text.to_string(),
        })
    }

    /// Append the assistant's answer, or the fallback on failure, and return
    /// to idle.
    pub fn finish_send(&self, result: Result<ChatReply, ClientError>) -> SendOutcome {
        let (turn, outcome) = match result {
            Ok(reply) if !reply.response.trim().is_empty() => {
                let turn =
                    ChatTurn::assistant(reply.response).with_recommendation(reply.best_match);
                (turn.clone(), SendOutcome::Replied(turn))
            }
            Ok(_) => {
                warn!("Chat reply was empty; using fallback");
                self.fallback("empty reply".to_string())
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed; using fallback");
                self.fallback(e.to_string())
            }
        };

        let mut session = lock(&self.session);
        session.turns.push(turn.clone());
        session.transition(ChatState::Idle);
        self.sink.publish(ViewEvent::TurnAppended { turn });
        self.sink.publish(ViewEvent::ChatPending { pending: false });
        outcome
    }

    fn fallback(&self, error: String) -> (ChatTurn, SendOutcome) {
        let turn = ChatTurn::assistant(self.config.fallback_reply.as_str());
        (turn.clone(), SendOutcome::FellBack { turn, error })
    }

    /// Send `text` and wait for the assistant's turn.
    ///
    /// The user turn is in the transcript before the request goes out.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let request = match self.begin_send(text) {
            Ok(request) => request,
            Err(e) => return SendOutcome::Rejected(e),
        };
        self.complete(request).await
    }

    /// Send a request produced by `begin_send` and append the answer.
    pub async fn complete(&self, request: ChatRequest) -> SendOutcome {
        let result = self.backend.chat(&request).await;
        self.finish_send(result)
    }

    /// Send whatever is in the input buffer.
    pub async fn send_input(&self) -> SendOutcome {
        let text = self.input();
        self.send(&text).await
    }
}
