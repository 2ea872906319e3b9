//! Counting game engine for chat channels.
//!
//! Participants take turns posting the next integer in sequence. This crate
//! verifies each submission, advances a per-channel count under a
//! per-channel critical section, persists the result, and tells the chat
//! layer which reactions, announcements, deletions, and transient notices
//! to perform. The gateway connection itself is the caller's concern.
//!
//! # Architecture
//!
//! - **Store**: keyed in-memory state with a durable SQLite backing table
//! - **Rules**: pure validation of claims against a state snapshot
//! - **Engine**: per-channel serialized submission handling
//! - **Lifecycle**: start/stop administration and final-count reporting
//! - **Effects**: outbound requests for the chat gateway, with timed cleanup
//!
//! # Example
//!
//! ```no_run
//! use counting_game::{
//!     GameConfig, GameEngine, GameRepository, GameStore, InboundMessage, LifecycleManager,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GameConfig::default();
//! let repository = GameRepository::new(config.db_path());
//! repository.apply_migrations()?;
//!
//! let store = GameStore::hydrate(&repository)?;
//! let engine = GameEngine::new(store.clone(), repository.clone(), config.clone());
//! let lifecycle = LifecycleManager::new(store, repository);
//!
//! lifecycle.start("lobby")?;
//! let message = InboundMessage::new(
//!     "lobby".to_string(),
//!     "alice".to_string(),
//!     "m1".to_string(),
//!     "1".to_string(),
//! );
//! let outcome = engine.submit(&message)?;
//! let effects = counting_game::plan(&message, &outcome, engine.config());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod effects;
mod engine;
mod game;
mod lifecycle;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Persistence
pub use db::{DbError, GameRecord, GameRepository, NewGameRecord};

// Crate-level exports - Domain types and rules
pub use game::{
    ChannelId, Claim, GameState, MessageId, Outcome, UserId, Violation, ViolationKind, evaluate,
};

// Crate-level exports - Invariants
pub use game::invariants;

// Crate-level exports - Engine
pub use engine::{GameEngine, InboundMessage, SubmissionOutcome};

// Crate-level exports - Lifecycle
pub use lifecycle::{LifecycleError, LifecycleManager};

// Crate-level exports - Store
pub use store::GameStore;

// Crate-level exports - Outbound effects
pub use effects::{ChatSink, Effect, SinkError, dispatch, plan, plan_stop};
