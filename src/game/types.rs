//! Core domain types for the counting game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a chat channel.
pub type ChannelId = String;

/// Unique identifier for a chat user.
pub type UserId = String;

/// Unique identifier for a chat message.
pub type MessageId = String;

/// Complete state of one channel's counting game.
///
/// Exactly one instance exists per channel with an active game. The record
/// is replaced wholesale on every accepted submission, so any clone is a
/// consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Channel this game is bound to.
    channel_id: ChannelId,
    /// Last accepted number; 0 before any successful submission.
    current_count: u64,
    /// Author of `current_count`, or `None` before the first submission.
    last_author_id: Option<UserId>,
    /// When the game was started.
    created_at: DateTime<Utc>,
    /// Changes only on accepted submissions.
    updated_at: DateTime<Utc>,
}

impl GameState {
    /// Creates the state of a freshly started game.
    pub fn new(channel_id: ChannelId, started_at: DateTime<Utc>) -> Self {
        Self {
            channel_id,
            current_count: 0,
            last_author_id: None,
            created_at: started_at,
            updated_at: started_at,
        }
    }

    /// Reassembles a state from its stored parts.
    pub fn from_parts(
        channel_id: ChannelId,
        current_count: u64,
        last_author_id: Option<UserId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_id,
            current_count,
            last_author_id,
            created_at,
            updated_at,
        }
    }

    /// Returns the state after accepting a submission.
    ///
    /// The full record is rebuilt so callers can swap it in as a single
    /// atomic write.
    pub fn advanced(&self, next_count: u64, next_author: UserId, at: DateTime<Utc>) -> Self {
        Self {
            channel_id: self.channel_id.clone(),
            current_count: next_count,
            last_author_id: Some(next_author),
            created_at: self.created_at,
            updated_at: at,
        }
    }

    /// Returns the channel this game is bound to.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Returns the last accepted number (0 before any submission).
    pub fn current_count(&self) -> u64 {
        self.current_count
    }

    /// Returns the author of the current count, if any submission has been
    /// accepted yet.
    pub fn last_author_id(&self) -> Option<&str> {
        self.last_author_id.as_deref()
    }

    /// Returns when the game was started.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the last submission was accepted.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
