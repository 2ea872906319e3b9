//! First-class claim type for counting submissions.
//!
//! A claim is one user's attempt to post the next number. Extraction is the
//! explicit parse-then-classify step: a message either yields a typed claim
//! or it is not a participation attempt at all.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::types::UserId;

/// A parsed integer plus its author, extracted from one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// The user making the claim.
    author_id: UserId,
    /// The number the user posted.
    number: u64,
}

impl Claim {
    /// Creates a new claim.
    pub fn new(author_id: UserId, number: u64) -> Self {
        Self { author_id, number }
    }

    /// Extracts a claim from raw message text.
    ///
    /// Only messages consisting of a bare non-negative integer, optionally
    /// surrounded by whitespace, participate in the game; anything else is
    /// not a claim and must trigger no game reaction. Digit strings too
    /// large for `u64` can never be the next count and are not claims
    /// either.
    #[instrument(skip(author_id, text), fields(author_id = %author_id))]
    pub fn parse(author_id: &str, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number = trimmed.parse::<u64>().ok()?;
        Some(Self {
            author_id: author_id.to_owned(),
            number,
        })
    }

    /// Returns the user making this claim.
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// Returns the claimed number.
    pub fn number(&self) -> u64 {
        self.number
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.author_id, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_integer() {
        let claim = Claim::parse("alice", "42").expect("Should parse");
        assert_eq!(claim.author_id(), "alice");
        assert_eq!(claim.number(), 42);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let claim = Claim::parse("alice", "  7\n").expect("Should parse");
        assert_eq!(claim.number(), 7);
    }

    #[test]
    fn test_parse_zero() {
        let claim = Claim::parse("alice", "0").expect("Should parse");
        assert_eq!(claim.number(), 0);
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(Claim::parse("alice", "hello").is_none());
    }

    #[test]
    fn test_parse_rejects_mixed_content() {
        assert!(Claim::parse("alice", "12a").is_none());
        assert!(Claim::parse("alice", "4 5").is_none());
    }

    #[test]
    fn test_parse_rejects_signs() {
        assert!(Claim::parse("alice", "-3").is_none());
        assert!(Claim::parse("alice", "+3").is_none());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(Claim::parse("alice", "").is_none());
        assert!(Claim::parse("alice", "   ").is_none());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(Claim::parse("alice", "99999999999999999999999999").is_none());
    }
}
