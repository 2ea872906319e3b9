//! First-class invariants for the counting game.
//!
//! Invariants are logical properties that must hold over every sequence of
//! accepted submissions. They are testable independently and serve as
//! documentation of system guarantees.

use serde::{Deserialize, Serialize};

use super::types::UserId;

/// One accepted submission as observed by a caller of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedSubmission {
    /// The count this submission advanced the game to.
    pub count: u64,
    /// The author whose claim was accepted.
    pub author_id: UserId,
}

impl AcceptedSubmission {
    /// Creates a new accepted-submission record.
    pub fn new(count: u64, author_id: impl Into<UserId>) -> Self {
        Self {
            count,
            author_id: author_id.into(),
        }
    }
}

/// Ordered log of every accepted submission since a game started.
pub type SubmissionLog = [AcceptedSubmission];

/// A logical property that must hold for a given state.
pub trait Invariant<S: ?Sized> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S: ?Sized> {
    /// Checks all invariants in the set.
    ///
    /// Returns `Ok(())` if all invariants hold, or `Err` with the list of
    /// violations otherwise.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S: ?Sized, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod alternating_author;
pub mod monotonic_count;

pub use alternating_author::AlternatingAuthorInvariant;
pub use monotonic_count::MonotonicCountInvariant;

/// All counting-game invariants as a composable set.
pub type CountingInvariants = (MonotonicCountInvariant, AlternatingAuthorInvariant);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_set_holds_for_empty_log() {
        let log: Vec<AcceptedSubmission> = Vec::new();
        assert!(CountingInvariants::check_all(log.as_slice()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_for_alternating_sequence() {
        let log = vec![
            AcceptedSubmission::new(1, "alice"),
            AcceptedSubmission::new(2, "bob"),
            AcceptedSubmission::new(3, "alice"),
        ];
        assert!(CountingInvariants::check_all(log.as_slice()).is_ok());
    }

    #[test]
    fn test_invariant_set_collects_all_violations() {
        // Skipped count AND repeated author.
        let log = vec![
            AcceptedSubmission::new(1, "alice"),
            AcceptedSubmission::new(3, "alice"),
        ];
        let violations = CountingInvariants::check_all(log.as_slice()).unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
