//! Database models for persisted game state.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;
use crate::game::GameState;

/// Persisted game row, one per channel with an active game.
///
/// An absent row means no active game for that channel.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(primary_key(channel_id))]
pub struct GameRecord {
    channel_id: String,
    current_count: i64,
    last_author_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRecord {
    /// Converts the stored row back into domain state.
    pub fn into_state(self) -> GameState {
        GameState::from_parts(
            self.channel_id,
            self.current_count as u64,
            self.last_author_id,
            self.created_at.and_utc(),
            self.updated_at.and_utc(),
        )
    }
}

/// Insertable game row for newly started games.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    channel_id: String,
    current_count: i64,
    last_author_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewGameRecord {
    /// Builds an insertable row from domain state.
    pub fn from_state(state: &GameState) -> Self {
        Self::new(
            state.channel_id().to_owned(),
            state.current_count() as i64,
            state.last_author_id().map(str::to_owned),
            state.created_at().naive_utc(),
            state.updated_at().naive_utc(),
        )
    }
}
