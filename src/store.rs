//! Keyed in-memory store: one game slot per channel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRepository};
use crate::game::{ChannelId, GameState};

/// Handle to one channel's slot. Locking it is the per-channel critical
/// section shared by submissions, start, and stop.
pub(crate) type ChannelSlot = Arc<Mutex<Option<GameState>>>;

/// In-memory store of every channel's game.
///
/// The outer mutex guards only map lookup and insertion; all state reads
/// and writes go through the per-channel slot lock, so submissions to
/// different channels never contend. A slot holding `None` belongs to a
/// channel whose game was stopped; the slot stays in the map so a handle
/// acquired before the stop observes the termination instead of reviving
/// stale state. Lock order is always outer before inner.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    slots: Arc<Mutex<HashMap<ChannelId, ChannelSlot>>>,
}

impl GameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game store");
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Rebuilds the store from the durable game table, so a restarted
    /// process resumes every active game with its exact count and last
    /// author.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if loading from the database fails.
    #[instrument(skip(repository))]
    pub fn hydrate(repository: &GameRepository) -> Result<Self, DbError> {
        let states = repository.load_games()?;
        let mut slots = HashMap::new();
        for state in states {
            slots.insert(
                state.channel_id().to_owned(),
                Arc::new(Mutex::new(Some(state))),
            );
        }

        info!(channels = slots.len(), "Game store hydrated");
        Ok(Self {
            slots: Arc::new(Mutex::new(slots)),
        })
    }

    /// Returns the slot for a channel, if one was ever created.
    pub(crate) fn slot(&self, channel_id: &str) -> Option<ChannelSlot> {
        let slots = self.slots.lock().unwrap();
        slots.get(channel_id).cloned()
    }

    /// Returns the slot for a channel, creating an empty one if needed.
    pub(crate) fn slot_or_insert(&self, channel_id: &str) -> ChannelSlot {
        let mut slots = self.slots.lock().unwrap();
        slots
            .entry(channel_id.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Returns a consistent snapshot of a channel's game, if one is active.
    ///
    /// The full record is cloned under the channel lock, so a reader never
    /// observes a partially written record.
    #[instrument(skip(self))]
    pub fn snapshot(&self, channel_id: &str) -> Option<GameState> {
        let slot = self.slot(channel_id)?;
        let state = slot.lock().unwrap().clone();

        if state.is_none() {
            debug!(channel_id = %channel_id, "No active game");
        }

        state
    }

    /// Lists the channels with an active game.
    #[instrument(skip(self))]
    pub fn active_channels(&self) -> Vec<ChannelId> {
        let slots = self.slots.lock().unwrap();
        let channels: Vec<_> = slots
            .iter()
            .filter(|(_, slot)| slot.lock().unwrap().is_some())
            .map(|(channel_id, _)| channel_id.clone())
            .collect();

        debug!(count = channels.len(), "Listed active channels");
        channels
    }
}
