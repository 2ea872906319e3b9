//! Database repository for the persisted game table.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRecord, NewGameRecord, schema};
use crate::game::GameState;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Repository for the durable per-channel game table.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository backed by the database at the given path.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn new(db_path: impl AsRef<str>) -> Self {
        info!("Creating GameRepository");
        Self {
            db_path: db_path.as_ref().to_owned(),
        }
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails to apply.
    #[instrument(skip(self))]
    pub fn apply_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Applied pending migrations");
        Ok(())
    }

    /// Inserts the row for a newly started game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a row already exists for the channel or a
    /// database error occurs.
    #[instrument(skip(self, state), fields(channel_id = %state.channel_id()))]
    pub fn insert_game(&self, state: &GameState) -> Result<(), DbError> {
        debug!("Inserting game row");
        let mut conn = self.connection()?;

        diesel::insert_into(schema::games::table)
            .values(NewGameRecord::from_state(state))
            .execute(&mut conn)?;

        info!(channel_id = %state.channel_id(), "Game row inserted");
        Ok(())
    }

    /// Writes the full record of an accepted submission.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if no row exists for the channel or a database
    /// error occurs.
    #[instrument(skip(self, state), fields(channel_id = %state.channel_id(), count = state.current_count()))]
    pub fn update_game(&self, state: &GameState) -> Result<(), DbError> {
        debug!("Updating game row");
        let mut conn = self.connection()?;

        let affected = diesel::update(schema::games::table.find(state.channel_id()))
            .set((
                schema::games::current_count.eq(state.current_count() as i64),
                schema::games::last_author_id.eq(state.last_author_id().map(str::to_owned)),
                schema::games::updated_at.eq(state.updated_at().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(DbError::new(format!(
                "No game row for channel '{}'",
                state.channel_id()
            )));
        }

        debug!(count = state.current_count(), "Game row updated");
        Ok(())
    }

    /// Deletes the row of a stopped game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_game(&self, channel_id: &str) -> Result<(), DbError> {
        debug!(channel_id = %channel_id, "Deleting game row");
        let mut conn = self.connection()?;

        diesel::delete(schema::games::table.find(channel_id)).execute(&mut conn)?;

        info!(channel_id = %channel_id, "Game row deleted");
        Ok(())
    }

    /// Loads the game for a channel. Returns `None` if no game is active.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_game(&self, channel_id: &str) -> Result<Option<GameState>, DbError> {
        debug!(channel_id = %channel_id, "Loading game row");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .find(channel_id)
            .first::<GameRecord>(&mut conn)
            .optional()?;

        Ok(record.map(GameRecord::into_state))
    }

    /// Loads every active game, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_games(&self) -> Result<Vec<GameState>, DbError> {
        debug!("Loading all game rows");
        let mut conn = self.connection()?;

        let records = schema::games::table
            .order(schema::games::created_at.asc())
            .load::<GameRecord>(&mut conn)?;

        info!(count = records.len(), "Game rows loaded");
        Ok(records.into_iter().map(GameRecord::into_state).collect())
    }
}
