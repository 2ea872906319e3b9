//! Submission handling: the end-to-end path for one inbound message.

use chrono::Utc;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::GameConfig;
use crate::db::{DbError, GameRepository};
use crate::game::{self, ChannelId, Claim, MessageId, Outcome, UserId, Violation};
use crate::store::GameStore;

/// One posted chat message, as delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct InboundMessage {
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Author of the message.
    pub author_id: UserId,
    /// Message identifier, used for reactions and deletion.
    pub message_id: MessageId,
    /// Raw message text.
    pub text: String,
}

/// Result of processing one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// Not a participation attempt; no state was read or written and no
    /// feedback is owed.
    Ignored,
    /// The submission advanced the count.
    Success {
        /// The new current count.
        count: u64,
        /// Whether the count is a configured milestone.
        milestone: bool,
    },
    /// The submission violated a rule; state is unchanged. The caller owes
    /// the offending message a deletion and a transient notice.
    Rejected(Violation),
}

/// Orchestrates submissions against the game store.
///
/// Submissions to the same channel are strictly serialized by the channel
/// slot lock; submissions to different channels proceed concurrently.
#[derive(Debug, Clone)]
pub struct GameEngine {
    store: GameStore,
    repository: GameRepository,
    config: GameConfig,
}

impl GameEngine {
    /// Creates an engine over a store and its durable backing table.
    #[instrument(skip(store, repository, config))]
    pub fn new(store: GameStore, repository: GameRepository, config: GameConfig) -> Self {
        info!("Creating game engine");
        Self {
            store,
            repository,
            config,
        }
    }

    /// Processes one inbound chat message end to end.
    ///
    /// Non-claims and messages in channels without an active game return
    /// [`SubmissionOutcome::Ignored`] without touching any state. For a
    /// claim, the channel's critical section is held across validate and
    /// commit: the durable row is written first, then the in-memory record
    /// is swapped wholesale, so no reader ever sees a half-applied
    /// submission and a crash cannot leave the two halves disagreeing on an
    /// accepted count.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the durable write fails; the in-memory count
    /// is left unchanged so the next submission retries from the same
    /// value.
    #[instrument(skip(self, message), fields(
        channel_id = %message.channel_id,
        author_id = %message.author_id,
    ))]
    pub fn submit(&self, message: &InboundMessage) -> Result<SubmissionOutcome, DbError> {
        let Some(claim) = Claim::parse(&message.author_id, &message.text) else {
            debug!("Message is not a claim");
            return Ok(SubmissionOutcome::Ignored);
        };

        let Some(slot) = self.store.slot(&message.channel_id) else {
            debug!("No game has ever been bound to this channel");
            return Ok(SubmissionOutcome::Ignored);
        };

        let mut guard = slot.lock().unwrap();
        let Some(state) = guard.as_ref() else {
            debug!("Game was stopped before this submission");
            return Ok(SubmissionOutcome::Ignored);
        };

        match game::evaluate(state, &claim) {
            Outcome::Accept {
                next_count,
                next_author,
            } => {
                let next = state.advanced(next_count, next_author, Utc::now());
                self.repository.update_game(&next)?;

                let milestone = self.config.is_milestone(next_count);
                *guard = Some(next);

                info!(count = next_count, milestone, "Submission accepted");
                Ok(SubmissionOutcome::Success {
                    count: next_count,
                    milestone,
                })
            }
            Outcome::Reject(violation) => {
                warn!(violation = violation.kind().as_ref(), "Submission rejected");
                Ok(SubmissionOutcome::Rejected(violation))
            }
        }
    }

    /// Returns the current count of a channel's game, if one is active.
    ///
    /// Reads a consistent snapshot; never observes a partially written
    /// record.
    #[instrument(skip(self))]
    pub fn score(&self, channel_id: &str) -> Option<u64> {
        self.store.snapshot(channel_id).map(|s| s.current_count())
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
