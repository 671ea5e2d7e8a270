//! Per-user chat log with a delayed canned reply.
//!
//! The log is persisted whole under `chat_<identifier>` after every append.
//! Replies are produced by a timer task that reports back over a channel and
//! never touches storage itself.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::{chat_key, load_json, save_json, Storage};

/// Text of every counterpart reply
pub const COUNTERPART_REPLY: &str = "Recebido! 👍 Continuamos amanhã às 9h.";

/// Delay before the counterpart answers
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Counterpart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn counterpart() -> Self {
        Self {
            sender: Sender::Counterpart,
            text: COUNTERPART_REPLY.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// A reply produced by the timer task, addressed to one chat log
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub key: String,
    pub message: ChatMessage,
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    key: String,
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    /// Load the history for `owner` (anonymous when `None`). Unreadable
    /// history starts empty.
    pub fn load(storage: &dyn Storage, owner: Option<&str>) -> Self {
        let key = chat_key(owner);
        let messages = match load_json::<Vec<ChatMessage>>(storage, &key) {
            Ok(messages) => messages.unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "Discarding unreadable chat history");
                Vec::new()
            }
        };
        debug!(key = %key, count = messages.len(), "Chat history loaded");
        Self { key, messages }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append and persist the whole sequence. The message stays in memory
    /// even if the write fails.
    pub fn push(&mut self, storage: &mut dyn Storage, message: ChatMessage) -> Result<(), StorageError> {
        self.messages.push(message);
        save_json(storage, &self.key, &self.messages)
    }

    /// Append a user message. Blank input is skipped and returns `false`.
    pub fn send(&mut self, storage: &mut dyn Storage, text: &str) -> Result<bool, StorageError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.push(storage, ChatMessage::user(text))?;
        Ok(true)
    }

    /// Append a reply if it belongs to this log. Returns whether it was taken.
    pub fn accept_reply(&mut self, storage: &mut dyn Storage, reply: PendingReply) -> Result<bool, StorageError> {
        if reply.key != self.key {
            debug!(expected = %self.key, got = %reply.key, "Dropping reply for another chat");
            return Ok(false);
        }
        self.push(storage, reply.message)?;
        Ok(true)
    }

    /// Start the counterpart reply timer for this log
    pub fn schedule_reply(
        &self,
        delay: Duration,
        token: CancellationToken,
        tx: mpsc::Sender<PendingReply>,
    ) -> JoinHandle<()> {
        spawn_reply(self.key.clone(), delay, token, tx)
    }
}

/// After `delay`, send one counterpart message for `key` unless `token` is
/// cancelled first.
pub fn spawn_reply(
    key: String,
    delay: Duration,
    token: CancellationToken,
    tx: mpsc::Sender<PendingReply>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(key = %key, "Pending chat reply cancelled");
            }
            () = tokio::time::sleep(delay) => {
                let reply = PendingReply { key, message: ChatMessage::counterpart() };
                if tx.send(reply).await.is_err() {
                    warn!("Chat reply receiver dropped");
                }
            }
        }
    })
}
