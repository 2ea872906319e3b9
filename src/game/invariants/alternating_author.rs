//! Alternating author invariant: no two consecutive accepted submissions
//! share an author.

use super::{Invariant, SubmissionLog};

/// Invariant: consecutive accepted submissions come from different authors.
///
/// The very first submission has no predecessor to compare against.
pub struct AlternatingAuthorInvariant;

impl Invariant<SubmissionLog> for AlternatingAuthorInvariant {
    fn holds(log: &SubmissionLog) -> bool {
        log.windows(2)
            .all(|pair| pair[0].author_id != pair[1].author_id)
    }

    fn description() -> &'static str {
        "No two consecutive accepted submissions share an author"
    }
}
