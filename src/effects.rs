//! Outbound effects: the requests this subsystem makes of the chat layer.
//!
//! The engine classifies; the chat layer reacts, posts, and deletes. The
//! bridge between the two is a planned list of [`Effect`] values plus an
//! async dispatcher over the gateway's [`ChatSink`]. Nothing here holds any
//! engine lock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::config::GameConfig;
use crate::engine::{InboundMessage, SubmissionOutcome};
use crate::game::{ChannelId, MessageId};

/// A single request for the chat layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Attach a positive acknowledgement marker to an accepted submission.
    Acknowledge {
        /// The accepted message.
        message_id: MessageId,
    },

    /// Post a celebratory announcement for a milestone count.
    AnnounceMilestone {
        /// The channel to announce in.
        channel_id: ChannelId,
        /// The milestone value.
        count: u64,
    },

    /// Delete the offending message of a rejected submission.
    RemoveMessage {
        /// The offending message.
        message_id: MessageId,
    },

    /// Post a violation notice that is removed again after `ttl`.
    PostTransient {
        /// The channel to post in.
        channel_id: ChannelId,
        /// The violation-specific notice text.
        text: String,
        /// How long the notice stays visible.
        ttl: Duration,
    },

    /// Report the final count of a stopped game.
    ReportFinalCount {
        /// The channel whose game ended.
        channel_id: ChannelId,
        /// The count at the moment the game stopped.
        count: u64,
    },
}

/// Plans the chat-layer effects for one processed message.
///
/// Ignored messages plan nothing. Successes plan an acknowledgement and,
/// on a milestone, an announcement. Rejections plan the offending message's
/// removal plus a transient notice carrying the violation text, to be
/// removed after the configured TTL.
#[instrument(skip(message, outcome, config), fields(channel_id = %message.channel_id))]
pub fn plan(
    message: &InboundMessage,
    outcome: &SubmissionOutcome,
    config: &GameConfig,
) -> Vec<Effect> {
    match outcome {
        SubmissionOutcome::Ignored => Vec::new(),
        SubmissionOutcome::Success { count, milestone } => {
            let mut effects = vec![Effect::Acknowledge {
                message_id: message.message_id.clone(),
            }];
            if *milestone {
                effects.push(Effect::AnnounceMilestone {
                    channel_id: message.channel_id.clone(),
                    count: *count,
                });
            }
            effects
        }
        SubmissionOutcome::Rejected(violation) => vec![
            Effect::RemoveMessage {
                message_id: message.message_id.clone(),
            },
            Effect::PostTransient {
                channel_id: message.channel_id.clone(),
                text: violation.to_string(),
                ttl: config.notice_ttl(),
            },
        ],
    }
}

/// Plans the report for a stopped game.
pub fn plan_stop(channel_id: &str, final_count: u64) -> Vec<Effect> {
    vec![Effect::ReportFinalCount {
        channel_id: channel_id.to_owned(),
        count: final_count,
    }]
}

/// Chat delivery error with location tracking.
///
/// Delivery failures are logged and tolerated; they never affect game
/// state.
#[derive(Debug, Clone, Display, Error)]
#[display("Chat delivery error: {} at {}:{}", message, file, line)]
pub struct SinkError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl SinkError {
    /// Creates a new chat delivery error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The chat operations this subsystem needs from the gateway.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Attaches the acknowledgement reaction to a message.
    async fn react(&self, message_id: &str) -> Result<(), SinkError>;

    /// Posts a message to a channel, returning the posted message's id.
    async fn post(&self, channel_id: &str, text: &str) -> Result<MessageId, SinkError>;

    /// Deletes a message.
    async fn delete(&self, message_id: &str) -> Result<(), SinkError>;
}

/// Performs planned effects against the chat layer.
///
/// Transient notices are posted immediately; each removal runs on a
/// detached task after the notice's TTL and tolerates the notice already
/// being gone. The returned handles cover those scheduled removals, so
/// callers that care (tests, shutdown paths) can await them; production
/// callers may drop them.
#[instrument(skip(sink, effects), fields(effects = effects.len()))]
pub async fn dispatch(sink: &Arc<dyn ChatSink>, effects: Vec<Effect>) -> Vec<JoinHandle<()>> {
    let mut cleanups = Vec::new();

    for effect in effects {
        match effect {
            Effect::Acknowledge { message_id } => {
                if let Err(e) = sink.react(&message_id).await {
                    warn!(%message_id, error = %e, "Failed to acknowledge submission");
                }
            }
            Effect::AnnounceMilestone { channel_id, count } => {
                let text = format!("Milestone reached: {}!", count);
                if let Err(e) = sink.post(&channel_id, &text).await {
                    warn!(%channel_id, count, error = %e, "Failed to announce milestone");
                }
            }
            Effect::RemoveMessage { message_id } => {
                if let Err(e) = sink.delete(&message_id).await {
                    warn!(%message_id, error = %e, "Failed to remove offending message");
                }
            }
            Effect::PostTransient {
                channel_id,
                text,
                ttl,
            } => match sink.post(&channel_id, &text).await {
                Ok(notice_id) => {
                    let sink = Arc::clone(sink);
                    cleanups.push(tokio::spawn(async move {
                        tokio::time::sleep(ttl).await;
                        if let Err(e) = sink.delete(&notice_id).await {
                            debug!(%notice_id, error = %e, "Transient notice already gone");
                        }
                    }));
                }
                Err(e) => {
                    warn!(%channel_id, error = %e, "Failed to post violation notice");
                }
            },
            Effect::ReportFinalCount { channel_id, count } => {
                let text = format!("Game over! Final count: {}", count);
                if let Err(e) = sink.post(&channel_id, &text).await {
                    warn!(%channel_id, count, error = %e, "Failed to report final count");
                }
            }
        }
    }

    cleanups
}
