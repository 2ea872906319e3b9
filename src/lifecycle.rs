//! Game lifecycle: binding a channel and reporting the final count.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::db::{DbError, GameRepository};
use crate::game::{ChannelId, GameState};
use crate::store::GameStore;

/// Error from start/stop administration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LifecycleError {
    /// A game is already bound to the channel.
    #[display("A counting game is already active in channel {}", channel_id)]
    AlreadyActive {
        /// The channel with the existing game.
        channel_id: ChannelId,
    },

    /// No game is bound to the channel.
    #[display("No counting game is active in channel {}", channel_id)]
    NotActive {
        /// The channel without a game.
        channel_id: ChannelId,
    },

    /// The durable store rejected the transition.
    #[display("{}", _0)]
    Persistence(DbError),
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbError> for LifecycleError {
    fn from(err: DbError) -> Self {
        LifecycleError::Persistence(err)
    }
}

/// Creates and terminates games, one per channel.
///
/// Shares the per-channel slot lock with the engine, so a stop is mutually
/// exclusive with any in-flight submission on the same channel and the
/// reported final count is never stale.
#[derive(Debug, Clone)]
pub struct LifecycleManager {
    store: GameStore,
    repository: GameRepository,
}

impl LifecycleManager {
    /// Creates a lifecycle manager over a store and its durable backing
    /// table.
    #[instrument(skip(store, repository))]
    pub fn new(store: GameStore, repository: GameRepository) -> Self {
        info!("Creating lifecycle manager");
        Self { store, repository }
    }

    /// Binds a channel: creates a game with count 0 and no last author.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyActive`] if the channel already has
    /// a game, or [`LifecycleError::Persistence`] if the durable insert
    /// fails (no game is created in that case).
    #[instrument(skip(self))]
    pub fn start(&self, channel_id: &str) -> Result<(), LifecycleError> {
        let slot = self.store.slot_or_insert(channel_id);
        let mut guard = slot.lock().unwrap();

        if guard.is_some() {
            warn!(channel_id = %channel_id, "Start rejected: game already active");
            return Err(LifecycleError::AlreadyActive {
                channel_id: channel_id.to_owned(),
            });
        }

        let state = GameState::new(channel_id.to_owned(), Utc::now());
        self.repository.insert_game(&state)?;
        *guard = Some(state);

        info!(channel_id = %channel_id, "Counting game started");
        Ok(())
    }

    /// Unbinds a channel and returns the final count.
    ///
    /// The next submission to the channel is ignored until a new game is
    /// explicitly started; a stopped game never resurrects on its own.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotActive`] if the channel has no game, or
    /// [`LifecycleError::Persistence`] if the durable delete fails (the
    /// game stays active in that case).
    #[instrument(skip(self))]
    pub fn stop(&self, channel_id: &str) -> Result<u64, LifecycleError> {
        let Some(slot) = self.store.slot(channel_id) else {
            warn!(channel_id = %channel_id, "Stop rejected: no game bound");
            return Err(LifecycleError::NotActive {
                channel_id: channel_id.to_owned(),
            });
        };

        let mut guard = slot.lock().unwrap();
        let Some(state) = guard.as_ref() else {
            warn!(channel_id = %channel_id, "Stop rejected: game already stopped");
            return Err(LifecycleError::NotActive {
                channel_id: channel_id.to_owned(),
            });
        };

        let final_count = state.current_count();
        self.repository.delete_game(channel_id)?;
        *guard = None;

        info!(channel_id = %channel_id, final_count, "Counting game stopped");
        Ok(final_count)
    }
}
