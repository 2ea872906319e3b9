//! Validation rules for counting submissions.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::claim::Claim;
use super::types::{GameState, UserId};

/// Violation kind, used as a stable label in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
pub enum ViolationKind {
    /// The posted number was not the expected next value.
    WrongNumber,
    /// The author of the current count counted again.
    DoubleCounting,
}

/// A rejected submission, carrying its user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Violation {
    /// The numeric value does not match the expected next value.
    #[display("Expected {}, got {}", expected, got)]
    WrongNumber {
        /// The value that would have advanced the count.
        expected: u64,
        /// The value actually posted.
        got: u64,
    },

    /// The number was correct but the author just counted.
    #[display("No double counting! {} must wait for someone else to count", author_id)]
    DoubleCounting {
        /// The offending author.
        author_id: UserId,
    },
}

impl Violation {
    /// Returns the kind label for this violation.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::WrongNumber { .. } => ViolationKind::WrongNumber,
            Violation::DoubleCounting { .. } => ViolationKind::DoubleCounting,
        }
    }
}

/// Result of evaluating one claim against a state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The claim advances the game.
    Accept {
        /// The new count to commit.
        next_count: u64,
        /// The author who becomes `last_author_id`.
        next_author: UserId,
    },
    /// The claim is rejected; state must not change.
    Reject(Violation),
}

/// Evaluates a claim against the current game state.
///
/// Number correctness is checked before turn alternation, so a wrong number
/// is always reported as [`Violation::WrongNumber`] even when the author
/// also just counted. The very first submission of a game has no
/// predecessor author to compare against.
///
/// Pure: performs no I/O and never mutates the state.
#[instrument(skip(state, claim), fields(
    channel_id = %state.channel_id(),
    author_id = %claim.author_id(),
    number = claim.number(),
))]
pub fn evaluate(state: &GameState, claim: &Claim) -> Outcome {
    let expected = state.current_count() + 1;

    if claim.number() != expected {
        return Outcome::Reject(Violation::WrongNumber {
            expected,
            got: claim.number(),
        });
    }

    if state.last_author_id() == Some(claim.author_id()) {
        return Outcome::Reject(Violation::DoubleCounting {
            author_id: claim.author_id().to_owned(),
        });
    }

    Outcome::Accept {
        next_count: expected,
        next_author: claim.author_id().to_owned(),
    }
}
