//! Domain layer: claims, game state, and validation rules.

mod claim;
mod rules;
mod types;

pub mod invariants;

pub use claim::Claim;
pub use rules::{Outcome, Violation, ViolationKind, evaluate};
pub use types::{ChannelId, GameState, MessageId, UserId};
