//! Gateway abstraction for fetching updates and sending replies.
//!
//! [`Gateway`] is transport-agnostic; `rbot-telegram` implements it via teloxide and tests
//! substitute in-memory implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Message, Update};

/// The two remote operations the dispatch pipeline consumes.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetches updates with `sequence_id >= offset`, in ascending order. An empty vec means no activity.
    async fn fetch_updates(&self, offset: i64) -> Result<Vec<Update>>;

    /// Sends a text message to the given chat. Best effort.
    async fn send_text(&self, destination: i64, text: &str) -> Result<()>;

    /// Sends `text` to the chat the message came from.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_text(message.destination(), text).await
    }
}
